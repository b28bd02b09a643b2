//! Deterministic physics module
//!
//! The simulated world the frame loop steps:
//! - Fixed timestep only
//! - Stable iteration order (by insertion)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod spawn;
pub mod world;

pub use body::{Body, CircleShape, ConstantSpeed, VelocityRule};
pub use collision::{CollisionResult, Wall, circle_wall_collision};
pub use spawn::{BallParams, spawn_ball, spawn_walls};
pub use world::{BodyHandle, DebugShape, World};
