//! Pasta Bounce - a constant-speed ball over a zoomable background
//!
//! Core modules:
//! - `sim`: Deterministic physics world (bodies, walls, velocity rules)
//! - `app`: Fixed-timestep frame loop, run states, input and zoom handling
//! - `renderer`: wgpu presentation surface (debug shapes + background sprite)
//! - `platform`: winit window and event pump
//! - `asset`: Background image decoding
//! - `settings`: JSON-backed configuration

pub mod app;
pub mod asset;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{DemoError, DemoResult};
pub use settings::Settings;

/// Demo configuration constants (defaults for `Settings`)
pub mod consts {
    /// Fixed simulation timestep (120 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Physics sub-steps per rendered frame at normal speed
    pub const SUBSTEPS_NORMAL: u32 = 2;
    /// Physics sub-steps per rendered frame in slow motion
    pub const SUBSTEPS_SLOW: u32 = 1;
    /// Render frame-rate cap
    pub const TARGET_FPS: u32 = 60;

    /// Initial window size
    pub const WINDOW_WIDTH: u32 = 1280;
    pub const WINDOW_HEIGHT: u32 = 720;

    /// Ball defaults
    pub const BALL_MASS: f32 = 1.0;
    pub const BALL_RADIUS: f32 = 50.0;
    pub const BALL_SPEED: f32 = 400.0;
    pub const BALL_ELASTICITY: f32 = 1.0;
    /// Initial heading, degrees clockwise from +x (screen space, y down)
    pub const BALL_HEADING_DEG: f32 = 30.0;

    /// Clear colour behind the background image
    pub const CLEAR_COLOR: [u8; 3] = [225, 225, 225];

    /// Background image, relative to the working directory
    pub const ASSET_PATH: &str = "spaghetti.png";
}
