//! Scenario setup: the constant-speed ball and the arena walls

use glam::Vec2;

use super::body::{Body, CircleShape, ConstantSpeed};
use super::collision::Wall;
use super::world::{BodyHandle, World};
use crate::consts::{BALL_ELASTICITY, BALL_MASS, BALL_RADIUS, BALL_SPEED};

/// Debug colour of the ball
pub const BALL_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

/// Ball parameters; `Default` is the demo's ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallParams {
    pub radius: f32,
    pub speed: f32,
    /// Initial velocity before the first sub-step (renormalised to `speed`)
    pub initial_velocity: Vec2,
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            radius: BALL_RADIUS,
            speed: BALL_SPEED,
            initial_velocity: Vec2::ZERO,
        }
    }
}

impl BallParams {
    /// Start moving at `speed` along `heading_deg` (screen space, y down)
    pub fn with_heading_deg(mut self, heading_deg: f32) -> Self {
        let theta = heading_deg.to_radians();
        self.initial_velocity = Vec2::new(theta.cos(), theta.sin()) * self.speed;
        self
    }
}

/// Create the demo ball at `position` and register it in `world`.
///
/// Mass 1, infinite moment, perfectly elastic circle, velocity forced to
/// `params.speed` on every sub-step.
pub fn spawn_ball(world: &mut World, position: Vec2, params: BallParams) -> BodyHandle {
    let shape = CircleShape {
        radius: params.radius,
        elasticity: BALL_ELASTICITY,
        color: BALL_COLOR,
    };
    let body = Body::new(BALL_MASS, f32::INFINITY, shape)
        .with_position(position)
        .with_velocity(params.initial_velocity)
        .with_velocity_rule(ConstantSpeed::new(params.speed));

    let handle = world.add_body(body);
    log::debug!("Spawned ball at ({:.1}, {:.1})", position.x, position.y);
    handle
}

/// Enclose the rectangle (0,0)-(width,height) with four elastic walls
pub fn spawn_walls(world: &mut World, width: f32, height: f32) {
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(width, 0.0),
        Vec2::new(width, height),
        Vec2::new(0.0, height),
    ];
    for i in 0..corners.len() {
        let mut wall = Wall::new(corners[i], corners[(i + 1) % corners.len()], 0.0);
        wall.elasticity = 1.0;
        world.add_wall(wall);
    }
}
