//! Static collision geometry with impulse-based bounce and friction
//!
//! Colliders have no lifetime: they model level geometry that lives as long as
//! the system holding them.

use crate::particle::Particle;
use spark_core::{rotate, ParticleRng, Result, SparkError, Vec2};
use std::f32::consts::PI;

#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32 },
    /// Centered on the collider position, rotated by `rotation` radians
    Rectangle { size: Vec2, rotation: f32 },
    /// Vertices relative to the collider position
    Polygon { vertices: Vec<Vec2> },
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Whether a circle at `center` with `radius` can touch the box
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius >= self.min.x
            && center.x - radius <= self.max.x
            && center.y + radius >= self.min.y
            && center.y - radius <= self.max.y
    }
}

/// Narrow-phase result. `normal` points out of the collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub normal: Vec2,
    pub penetration: f32,
}

#[derive(Clone, Debug)]
pub struct Collider {
    pub position: Vec2,
    pub shape: ColliderShape,
    /// 1 = elastic, 0 = the normal component is removed
    pub restitution: f32,
    /// Fraction of tangential velocity removed on contact
    pub friction: f32,
    /// Random deflection, as a fraction of +/- PI
    pub randomness: f32,
    pub id: Option<String>,
}

impl Collider {
    pub fn new(position: Vec2, shape: ColliderShape) -> Self {
        Self {
            position,
            shape,
            restitution: 0.5,
            friction: 0.0,
            randomness: 0.0,
            id: None,
        }
    }

    pub fn circle(position: Vec2, radius: f32) -> Self {
        Self::new(position, ColliderShape::Circle { radius })
    }

    pub fn rectangle(position: Vec2, size: Vec2) -> Self {
        Self::new(position, ColliderShape::Rectangle { size, rotation: 0.0 })
    }

    pub fn polygon(position: Vec2, vertices: Vec<Vec2>) -> Self {
        Self::new(position, ColliderShape::Polygon { vertices })
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_randomness(mut self, randomness: f32) -> Self {
        self.randomness = randomness;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Reject shapes that can never produce a contact
    pub fn validate(&self) -> Result<()> {
        match &self.shape {
            ColliderShape::Circle { radius } if *radius <= 0.0 => Err(SparkError::InvalidGeometry(
                format!("circle radius must be positive, got {radius}"),
            )),
            ColliderShape::Rectangle { size, .. } if size.x <= 0.0 || size.y <= 0.0 => Err(
                SparkError::InvalidGeometry(format!("rectangle size must be positive, got {size}")),
            ),
            ColliderShape::Polygon { vertices } if vertices.len() < 3 => Err(SparkError::InvalidGeometry(
                format!("polygon needs at least 3 vertices, got {}", vertices.len()),
            )),
            _ => Ok(()),
        }
    }

    /// World-space bounds, or `None` for degenerate polygons
    pub fn bounds(&self) -> Option<Aabb> {
        match &self.shape {
            ColliderShape::Circle { radius } => Some(Aabb {
                min: self.position - Vec2::splat(*radius),
                max: self.position + Vec2::splat(*radius),
            }),
            ColliderShape::Rectangle { size, rotation } => {
                let (sin, cos) = rotation.sin_cos();
                let half = *size / 2.0;
                let extent = Vec2::new(
                    cos.abs() * half.x + sin.abs() * half.y,
                    sin.abs() * half.x + cos.abs() * half.y,
                );
                Some(Aabb {
                    min: self.position - extent,
                    max: self.position + extent,
                })
            }
            ColliderShape::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return None;
                }
                let (min, max) = vertices.iter().fold(
                    (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                    |(min, max), v| (min.min(*v), max.max(*v)),
                );
                Some(Aabb {
                    min: self.position + min,
                    max: self.position + max,
                })
            }
        }
    }

    /// Exact test of a circle (radius may be zero) against the shape
    pub fn contact(&self, center: Vec2, radius: f32) -> Option<Contact> {
        let local = center - self.position;
        match &self.shape {
            ColliderShape::Circle { radius: r } => circle_contact(local, *r, radius),
            ColliderShape::Rectangle { size, rotation } => {
                let contact = box_contact(rotate(local, -rotation), *size / 2.0, radius)?;
                Some(Contact {
                    normal: rotate(contact.normal, *rotation),
                    ..contact
                })
            }
            ColliderShape::Polygon { vertices } => polygon_contact(local, vertices, radius),
        }
    }

    /// Bounce `particle` off this collider if they touch. Returns true on response.
    pub fn handle_collision(&self, particle: &mut Particle, rng: &mut ParticleRng) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        let radius = particle.radius();
        if !bounds.overlaps_circle(particle.position, radius) {
            return false;
        }
        let Some(contact) = self.contact(particle.position, radius) else {
            return false;
        };

        let normal = contact.normal;
        let normal_speed = particle.velocity.dot(normal);
        if normal_speed >= 0.0 {
            // Already separating
            return false;
        }

        let mut velocity = particle.velocity - normal * normal_speed * (1.0 + self.restitution);
        let tangential = velocity - normal * velocity.dot(normal);
        velocity -= tangential * self.friction.clamp(0.0, 1.0);

        if self.randomness > 0.0 {
            let spread = PI * self.randomness;
            velocity = rotate(velocity, rng.range(-spread, spread));
        }

        particle.velocity = velocity;
        particle.position += normal * contact.penetration;
        true
    }
}

fn circle_contact(local: Vec2, collider_radius: f32, radius: f32) -> Option<Contact> {
    let distance = local.length();
    let reach = collider_radius + radius;
    if distance >= reach {
        return None;
    }
    Some(Contact {
        normal: local.try_normalize().unwrap_or(Vec2::Y),
        penetration: reach - distance,
    })
}

fn box_contact(local: Vec2, half: Vec2, radius: f32) -> Option<Contact> {
    let inside = local.x.abs() <= half.x && local.y.abs() <= half.y;
    if inside {
        // Push out through the nearest face
        let depth_x = half.x - local.x.abs();
        let depth_y = half.y - local.y.abs();
        let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
        return Some(if depth_x <= depth_y {
            Contact {
                normal: Vec2::new(sign(local.x), 0.0),
                penetration: depth_x + radius,
            }
        } else {
            Contact {
                normal: Vec2::new(0.0, sign(local.y)),
                penetration: depth_y + radius,
            }
        });
    }

    let closest = local.clamp(-half, half);
    let offset = local - closest;
    let distance = offset.length();
    if distance >= radius {
        return None;
    }
    Some(Contact {
        normal: offset / distance,
        penetration: radius - distance,
    })
}

fn polygon_contact(local: Vec2, vertices: &[Vec2], radius: f32) -> Option<Contact> {
    if vertices.len() < 3 {
        return None;
    }

    let mut closest = vertices[0];
    let mut best = f32::INFINITY;
    let mut best_edge = (vertices[0], vertices[1]);
    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let point = closest_on_segment(local, a, b);
        let d = point.distance_squared(local);
        if d < best {
            best = d;
            closest = point;
            best_edge = (a, b);
        }
    }
    let distance = best.sqrt();

    if point_in_polygon(local, vertices) {
        let normal = (closest - local)
            .try_normalize()
            .unwrap_or_else(|| outward_edge_normal(best_edge, vertices));
        return Some(Contact {
            normal,
            penetration: distance + radius,
        });
    }

    if distance >= radius {
        return None;
    }
    Some(Contact {
        normal: (local - closest)
            .try_normalize()
            .unwrap_or_else(|| outward_edge_normal(best_edge, vertices)),
        penetration: radius - distance,
    })
}

fn closest_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Even-odd rule
fn point_in_polygon(p: Vec2, vertices: &[Vec2]) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn outward_edge_normal((a, b): (Vec2, Vec2), vertices: &[Vec2]) -> Vec2 {
    let centroid = vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32;
    let normal = (b - a).perp().normalize_or_zero();
    if normal.dot((a + b) / 2.0 - centroid) < 0.0 {
        -normal
    } else {
        normal
    }
}
