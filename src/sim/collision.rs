//! Collision detection and response for circles against static segments

use glam::Vec2;

use super::body::Color;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the segment (if hit)
    pub point: Vec2,
    /// Surface normal at contact, pointing toward the circle center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// A static wall: a segment from `a` to `b` with rounded thickness `radius`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f32,
    pub elasticity: f32,
    pub color: Color,
}

impl Wall {
    pub fn new(a: Vec2, b: Vec2, radius: f32) -> Self {
        Self {
            a,
            b,
            radius,
            elasticity: 0.0,
            color: [0.4, 0.4, 0.5, 1.0],
        }
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let line_vec = self.b - self.a;
        let line_len_sq = line_vec.length_squared();
        if line_len_sq < 0.0001 {
            return self.a; // Degenerate segment
        }
        let t = ((p - self.a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
        self.a + line_vec * t
    }
}

/// Check collision between a circle and a wall segment
pub fn circle_wall_collision(center: Vec2, radius: f32, wall: &Wall) -> CollisionResult {
    let closest = wall.closest_point(center);
    let offset = center - closest;
    let dist = offset.length();
    let reach = radius + wall.radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Center sits on the segment - use the segment's left-hand perpendicular
        (wall.b - wall.a).perp().normalize_or_zero()
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: reach - dist,
    }
}

/// Normal impulse that resolves an approaching contact with restitution `e`.
///
/// Returns zero when the body is already separating along `normal`.
pub fn contact_impulse(velocity: Vec2, normal: Vec2, mass: f32, e: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return Vec2::ZERO;
    }
    normal * (-(1.0 + e) * vn * mass)
}
