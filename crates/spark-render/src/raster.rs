//! CPU raster canvas: affine transform stack, alpha blending and anti-aliased primitives

use glam::Affine2;
use image::{ImageResult, Rgba, RgbaImage};
use spark_core::{Canvas, Color, ImageId, Vec2};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Strength of the glow halo relative to the glow color's alpha
const GLOW_INTENSITY: f32 = 0.6;

#[derive(Clone, Copy, Debug)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
    glow: Option<(Color, f32)>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
            glow: None,
        }
    }
}

/// An RGBA pixel buffer that particles can draw into
pub struct Raster {
    image: RgbaImage,
    state: DrawState,
    stack: Vec<DrawState>,
    images: HashMap<ImageId, RgbaImage>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            state: DrawState::default(),
            stack: Vec::new(),
            images: HashMap::new(),
        }
    }

    pub fn with_background(width: u32, height: u32, background: Color) -> Self {
        let mut raster = Self::new(width, height);
        raster.clear(background);
        raster
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fill every pixel and reset the draw state
    pub fn clear(&mut self, color: Color) {
        let pixel = Rgba(color.to_rgba8());
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
        self.state = DrawState::default();
        self.stack.clear();
    }

    /// Make an already-decoded image available to `draw_image`
    pub fn register_image(&mut self, id: ImageId, image: RgbaImage) {
        self.images.insert(id, image);
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    fn scale(&self) -> f32 {
        self.state.transform.matrix2.x_axis.length()
    }

    /// Shade every pixel whose center lies in the device-space box `min..max`.
    /// `shade` gets the pixel center and returns a color with coverage folded into alpha.
    fn paint(&mut self, min: Vec2, max: Vec2, mut shade: impl FnMut(Vec2) -> Option<Color>) {
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        let x0 = min.x.floor().clamp(0.0, w) as u32;
        let y0 = min.y.floor().clamp(0.0, h) as u32;
        let x1 = max.x.ceil().clamp(0.0, w) as u32;
        let y1 = max.y.ceil().clamp(0.0, h) as u32;
        let alpha = self.state.alpha;

        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(color) = shade(center) {
                    blend(self.image.get_pixel_mut(x, y), color.fade(alpha));
                }
            }
        }
    }

    /// Soft halo around a shape given its device-space distance function
    fn halo(&mut self, min: Vec2, max: Vec2, distance: impl Fn(Vec2) -> f32) {
        let Some((color, blur)) = self.state.glow else {
            return;
        };
        let blur = blur * self.scale();
        let pad = Vec2::splat(blur);
        self.paint(min - pad, max + pad, |p| {
            let d = distance(p);
            if d <= 0.0 || d >= blur {
                return None;
            }
            let falloff = 1.0 - d / blur;
            Some(color.fade(falloff * falloff * GLOW_INTENSITY))
        });
    }
}

/// Source-over blend of a straight-alpha color onto an 8-bit pixel
fn blend(pixel: &mut Rgba<u8>, src: Color) {
    let sa = src.a.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let [dr, dg, db, da] = pixel.0.map(|c| c as f32 / 255.0);
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
    *pixel = Rgba(
        Color::new(mix(src.r, dr), mix(src.g, dg), mix(src.b, db), out_a).to_rgba8(),
    );
}

/// Pixel coverage of an edge at signed distance `d` (negative inside)
fn coverage(d: f32) -> f32 {
    (0.5 - d).clamp(0.0, 1.0)
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let l = |x: f32, y: f32| x + (y - x) * t;
    Color::new(l(a.r, b.r), l(a.g, b.g), l(a.b, b.b), l(a.a, b.a))
}

impl Canvas for Raster {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.state.transform = self.state.transform * Affine2::from_translation(offset);
    }

    fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(angle);
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        self.state.glow = (blur > 0.0 && color.a > 0.0).then_some((color, blur));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let c = self.state.transform.transform_point2(center);
        let r = radius * self.scale();
        if r <= 0.0 {
            return;
        }
        let extent = Vec2::splat(r + 1.0);
        self.halo(c - extent, c + extent, |p| p.distance(c) - r);
        self.paint(c - extent, c + extent, |p| {
            let cov = coverage(p.distance(c) - r);
            (cov > 0.0).then(|| color.fade(cov))
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Color, outer: Color) {
        let c = self.state.transform.transform_point2(center);
        let r = radius * self.scale();
        if r <= 0.0 {
            return;
        }
        let extent = Vec2::splat(r + 1.0);
        self.halo(c - extent, c + extent, |p| p.distance(c) - r);
        self.paint(c - extent, c + extent, |p| {
            let d = p.distance(c);
            let cov = coverage(d - r);
            (cov > 0.0).then(|| lerp_color(inner, outer, (d / r).min(1.0)).fade(cov))
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let a = self.state.transform.transform_point2(from);
        let b = self.state.transform.transform_point2(to);
        let half = (width * self.scale() / 2.0).max(0.5);
        let pad = Vec2::splat(half + 1.0);
        let (min, max) = (a.min(b) - pad, a.max(b) + pad);
        self.halo(min, max, |p| segment_distance(p, a, b) - half);
        self.paint(min, max, |p| {
            let cov = coverage(segment_distance(p, a, b) - half);
            (cov > 0.0).then(|| color.fade(cov))
        });
    }

    fn draw_image(&mut self, image: &ImageId, origin: Vec2, size: Vec2) {
        let Some(texture) = self.images.get(image) else {
            debug!(%image, "image not registered, skipping");
            return;
        };
        if size.x <= 0.0 || size.y <= 0.0 || texture.width() == 0 || texture.height() == 0 {
            return;
        }
        let transform = self.state.transform;
        let inverse = transform.inverse();
        let corners = [
            origin,
            origin + Vec2::new(size.x, 0.0),
            origin + Vec2::new(0.0, size.y),
            origin + size,
        ]
        .map(|p| transform.transform_point2(p));
        let min = corners.iter().fold(Vec2::splat(f32::MAX), |m, p| m.min(*p));
        let max = corners.iter().fold(Vec2::splat(f32::MIN), |m, p| m.max(*p));

        // Sampling borrows the registry while `paint` borrows the target
        let texture = texture.clone();
        let texel_size = Vec2::new(texture.width() as f32, texture.height() as f32);
        self.paint(min, max, |p| {
            let uv = (inverse.transform_point2(p) - origin) / size;
            if !(0.0..1.0).contains(&uv.x) || !(0.0..1.0).contains(&uv.y) {
                return None;
            }
            let texel = (uv * texel_size).floor();
            let [r, g, b, a] = texture.get_pixel(texel.x as u32, texel.y as u32).0;
            Some(Color::new(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
                a as f32 / 255.0,
            ))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(actual: [u8; 4], expected: [u8; 4]) -> bool {
        actual
            .iter()
            .zip(expected.iter())
            .all(|(a, e)| (*a as i32 - *e as i32).abs() <= 2)
    }

    #[test]
    fn clear_fills_background() {
        let raster = Raster::with_background(4, 3, Color::BLUE);
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.pixel(3, 2), [0, 0, 255, 255]);
    }

    #[test]
    fn circle_covers_its_center_only() {
        let mut raster = Raster::with_background(32, 32, Color::BLACK);
        raster.fill_circle(Vec2::new(16.0, 16.0), 4.0, Color::RED);
        assert_eq!(raster.pixel(16, 16), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(2, 2), [0, 0, 0, 255]);
        assert_eq!(raster.pixel(16, 24), [0, 0, 0, 255]);
    }

    #[test]
    fn translate_is_undone_by_restore() {
        let mut raster = Raster::with_background(32, 32, Color::BLACK);
        raster.save();
        raster.translate(Vec2::new(8.0, 8.0));
        raster.fill_circle(Vec2::ZERO, 2.0, Color::WHITE);
        raster.restore();
        raster.fill_circle(Vec2::new(24.0, 24.0), 2.0, Color::GREEN);

        assert_eq!(raster.pixel(8, 8), [255, 255, 255, 255]);
        assert_eq!(raster.pixel(24, 24), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn global_alpha_blends_over_background() {
        let mut raster = Raster::with_background(8, 8, Color::BLACK);
        raster.set_global_alpha(0.5);
        raster.fill_circle(Vec2::new(4.0, 4.0), 3.0, Color::WHITE);
        assert!(close(raster.pixel(4, 4), [128, 128, 128, 255]));
    }

    #[test]
    fn radial_gradient_fades_outward() {
        let mut raster = Raster::with_background(32, 32, Color::BLACK);
        raster.fill_radial_gradient(Vec2::new(16.0, 16.0), 10.0, Color::WHITE, Color::TRANSPARENT);
        let center = raster.pixel(16, 16)[0];
        let rim = raster.pixel(24, 16)[0];
        assert!(center > 200);
        assert!(rim < center / 2);
    }

    #[test]
    fn rotated_line_runs_vertically() {
        let mut raster = Raster::with_background(32, 32, Color::BLACK);
        raster.translate(Vec2::new(16.0, 16.0));
        raster.rotate(FRAC_PI_2);
        raster.stroke_line(Vec2::new(-8.0, 0.0), Vec2::new(8.0, 0.0), 2.0, Color::WHITE);

        assert_eq!(raster.pixel(16, 10)[0], 255);
        assert_eq!(raster.pixel(16, 21)[0], 255);
        assert_eq!(raster.pixel(10, 16)[0], 0);
    }

    #[test]
    fn glow_spreads_past_the_shape() {
        let mut raster = Raster::with_background(32, 32, Color::BLACK);
        raster.fill_circle(Vec2::new(16.0, 16.0), 3.0, Color::WHITE);
        assert_eq!(raster.pixel(16, 21)[0], 0);

        let mut glowing = Raster::with_background(32, 32, Color::BLACK);
        glowing.set_glow(Color::WHITE, 6.0);
        glowing.fill_circle(Vec2::new(16.0, 16.0), 3.0, Color::WHITE);
        assert!(glowing.pixel(16, 21)[0] > 0);

        glowing.set_glow(Color::TRANSPARENT, 0.0);
        glowing.fill_circle(Vec2::new(4.0, 4.0), 1.0, Color::WHITE);
        assert_eq!(glowing.pixel(4, 8)[0], 0);
    }

    #[test]
    fn registered_images_are_scaled_into_place() {
        let mut raster = Raster::with_background(16, 16, Color::BLACK);
        let mut sprite = RgbaImage::new(2, 2);
        sprite.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        sprite.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        sprite.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        sprite.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        raster.register_image(ImageId::new("quad"), sprite);

        raster.draw_image(&ImageId::new("quad"), Vec2::new(4.0, 4.0), Vec2::new(8.0, 8.0));
        assert_eq!(raster.pixel(5, 5), [255, 0, 0, 255]);
        assert_eq!(raster.pixel(10, 5), [0, 255, 0, 255]);
        assert_eq!(raster.pixel(5, 10), [0, 0, 255, 255]);
        assert_eq!(raster.pixel(2, 2), [0, 0, 0, 255]);

        raster.draw_image(&ImageId::new("missing"), Vec2::ZERO, Vec2::splat(16.0));
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut raster = Raster::with_background(4, 4, Color::BLACK);
        raster.restore();
        raster.fill_circle(Vec2::new(2.0, 2.0), 3.0, Color::WHITE);
        assert_eq!(raster.pixel(2, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn saves_png() {
        let raster = Raster::with_background(3, 3, Color::RED);
        let path = std::env::temp_dir().join("spark_render_saves_png.png");
        raster.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
        let _ = std::fs::remove_file(path);
    }
}
