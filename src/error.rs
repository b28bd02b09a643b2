//! Error type shared by startup, the frame loop and the GPU backend.

use std::path::PathBuf;

use thiserror::Error;

pub type DemoResult<T> = Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("cannot open background image {path}: {source}")]
    StartupAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("background image decode failed: {0}")]
    AssetDecode(#[from] png::DecodingError),

    #[error("unsupported background image: {0}")]
    UnsupportedImage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("window error: {0}")]
    Window(String),

    #[error("render backend error: {0}")]
    RenderBackend(String),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("cannot scale image to {width}x{height}")]
    InvalidImageSize { width: i32, height: i32 },
}

impl From<winit::error::EventLoopError> for DemoError {
    fn from(e: winit::error::EventLoopError) -> Self {
        Self::Window(e.to_string())
    }
}

impl From<winit::error::OsError> for DemoError {
    fn from(e: winit::error::OsError) -> Self {
        Self::Window(e.to_string())
    }
}
