//! Simulated world: bodies, static walls, fixed sub-step integration

use glam::Vec2;

use super::body::{Body, Color};
use super::collision::{Wall, circle_wall_collision, contact_impulse};

/// Index of a body inside its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

/// Drawable primitive for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    /// Circle with an angle indicator from the center to the rim
    Circle {
        center: Vec2,
        radius: f32,
        angle: f32,
        color: Color,
    },
    /// Thick segment
    Segment {
        a: Vec2,
        b: Vec2,
        radius: f32,
        color: Color,
    },
}

/// Physics space holding every body and wall
#[derive(Debug)]
pub struct World {
    pub gravity: Vec2,
    /// Velocity multiplier per sub-step for bodies without a velocity rule
    pub damping: f32,
    bodies: Vec<Body>,
    walls: Vec<Wall>,
    /// Completed sub-steps since creation
    pub steps: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            gravity: Vec2::ZERO,
            damping: 1.0,
            bodies: Vec::new(),
            walls: Vec::new(),
            steps: 0,
        }
    }

    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        self.bodies.push(body);
        BodyHandle(self.bodies.len() - 1)
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Advance the world by one fixed sub-step.
    ///
    /// Order: integrate positions, resolve wall contacts, then update
    /// velocities. Velocity rules run last so their output is what the body
    /// carries out of the step.
    pub fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.integrate_position(dt);

            for wall in &self.walls {
                let contact = circle_wall_collision(body.pos, body.shape.radius, wall);
                if !contact.hit {
                    continue;
                }
                body.pos += contact.normal * contact.penetration;
                let e = body.shape.elasticity * wall.elasticity;
                let impulse = contact_impulse(body.vel, contact.normal, body.mass, e);
                if impulse != Vec2::ZERO {
                    body.apply_impulse_at(impulse, contact.point);
                }
            }

            body.integrate_velocity(self.gravity, self.damping, dt);
        }
        self.steps += 1;
    }

    /// Raw collision geometry for the debug overlay
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        let walls = self.walls.iter().map(|w| DebugShape::Segment {
            a: w.a,
            b: w.b,
            radius: w.radius,
            color: w.color,
        });
        let bodies = self.bodies.iter().map(|b| DebugShape::Circle {
            center: b.pos,
            radius: b.shape.radius,
            angle: b.angle,
            color: b.shape.color,
        });
        walls.chain(bodies).collect()
    }
}
