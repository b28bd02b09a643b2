//! Dynamic bodies, their circle shapes, and velocity-override rules

use glam::Vec2;

/// Debug colour for a shape (linear RGBA)
pub type Color = [f32; 4];

/// Hook the world invokes once per sub-step to rewrite a body's velocity.
///
/// Installing a rule replaces the default velocity integration (gravity and
/// damping) for that body.
pub trait VelocityRule {
    fn apply(&self, velocity: Vec2) -> Vec2;
}

impl<F> VelocityRule for F
where
    F: Fn(Vec2) -> Vec2,
{
    fn apply(&self, velocity: Vec2) -> Vec2 {
        self(velocity)
    }
}

/// Keeps the direction of travel and forces the magnitude to `speed`.
///
/// A zero velocity has no direction and stays zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSpeed {
    pub speed: f32,
}

impl ConstantSpeed {
    pub const fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl VelocityRule for ConstantSpeed {
    fn apply(&self, velocity: Vec2) -> Vec2 {
        velocity.normalize_or_zero() * self.speed
    }
}

/// Circle collision shape attached to a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleShape {
    pub radius: f32,
    /// Restitution; contact response uses the product with the other shape's
    pub elasticity: f32,
    pub color: Color,
}

impl CircleShape {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            elasticity: 0.0,
            color: [0.8, 0.8, 0.8, 1.0],
        }
    }
}

/// A dynamic rigid body with a single circle shape
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    /// Moment of inertia; `f32::INFINITY` means the body never rotates
    pub moment: f32,
    pub angle: f32,
    pub angular_vel: f32,
    pub shape: CircleShape,
    velocity_rule: Option<Box<dyn VelocityRule>>,
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("pos", &self.pos)
            .field("vel", &self.vel)
            .field("mass", &self.mass)
            .field("moment", &self.moment)
            .field("angle", &self.angle)
            .field("shape", &self.shape)
            .field("has_velocity_rule", &self.velocity_rule.is_some())
            .finish()
    }
}

impl Body {
    pub fn new(mass: f32, moment: f32, shape: CircleShape) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            mass,
            moment,
            angle: 0.0,
            angular_vel: 0.0,
            shape,
            velocity_rule: None,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_velocity_rule(mut self, rule: impl VelocityRule + 'static) -> Self {
        self.velocity_rule = Some(Box::new(rule));
        self
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Apply an impulse at a world-space point
    pub fn apply_impulse_at(&mut self, impulse: Vec2, point: Vec2) {
        self.vel += impulse / self.mass;
        // Infinite moment gives zero here
        let r = point - self.pos;
        self.angular_vel += r.perp_dot(impulse) / self.moment;
    }

    pub(crate) fn integrate_position(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.angle += self.angular_vel * dt;
    }

    pub(crate) fn integrate_velocity(&mut self, gravity: Vec2, damping: f32, dt: f32) {
        self.vel = match &self.velocity_rule {
            Some(rule) => rule.apply(self.vel),
            None => self.vel * damping + gravity * dt,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_constant_speed_keeps_direction() {
        let rule = ConstantSpeed::new(400.0);
        let v = rule.apply(Vec2::new(3.0, 4.0));
        assert!((v.length() - 400.0).abs() < 1e-3);
        assert!((v.x - 240.0).abs() < 1e-3);
        assert!((v.y - 320.0).abs() < 1e-3);
    }

    #[test]
    fn test_constant_speed_zero_stays_zero() {
        let rule = ConstantSpeed::new(400.0);
        assert_eq!(rule.apply(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_closure_rule() {
        let mut body = Body::new(1.0, 1.0, CircleShape::new(1.0))
            .with_velocity(Vec2::new(1.0, 0.0))
            .with_velocity_rule(|v: Vec2| v * 2.0);
        body.integrate_velocity(Vec2::ZERO, 1.0, 0.01);
        assert_eq!(body.vel, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_default_integration_uses_gravity_and_damping() {
        let mut body =
            Body::new(1.0, 1.0, CircleShape::new(1.0)).with_velocity(Vec2::new(10.0, 0.0));
        body.integrate_velocity(Vec2::new(0.0, 100.0), 0.5, 0.1);
        assert_eq!(body.vel, Vec2::new(5.0, 10.0));
    }

    #[test]
    fn test_infinite_moment_never_spins() {
        let mut body = Body::new(1.0, f32::INFINITY, CircleShape::new(10.0));
        body.apply_impulse_at(Vec2::new(0.0, 5.0), Vec2::new(10.0, 0.0));
        assert_eq!(body.angular_vel, 0.0);
        assert_eq!(body.vel, Vec2::new(0.0, 5.0));
    }

    proptest! {
        #[test]
        fn prop_constant_speed_magnitude(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4) {
            prop_assume!(Vec2::new(x, y).length() > 1e-3);
            let v = ConstantSpeed::new(400.0).apply(Vec2::new(x, y));
            prop_assert!((v.length() - 400.0).abs() < 1e-2);
        }
    }
}
