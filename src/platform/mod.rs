//! Platform abstraction layer
//!
//! Native desktop window via winit:
//! - Window creation
//! - Input events, pumped once per frame

pub mod window;

pub use window::WinitPlatform;
