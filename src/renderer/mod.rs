//! wgpu rendering module
//!
//! Implements the loop's `Presenter`: debug geometry as flat triangles, the
//! background as a textured quad scaled on the GPU.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
