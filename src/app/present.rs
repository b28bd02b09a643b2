//! Presentation surface seam

use glam::Vec2;

use super::zoom::DisplayImage;
use crate::error::DemoResult;
use crate::sim::DebugShape;

/// Per-frame drawing target. Calls between `clear` and `flip` are drawn in
/// order, later calls on top.
pub trait Presenter {
    /// Start a frame filled with `color`
    fn clear(&mut self, color: [u8; 3]);
    /// Draw the world's raw collision geometry
    fn draw_debug(&mut self, shapes: &[DebugShape]);
    /// Draw the background at its current scaled size with its top-left at `origin`
    fn blit(&mut self, image: &DisplayImage, origin: Vec2);
    /// Show the frame
    fn flip(&mut self) -> DemoResult<()>;
    fn set_caption(&mut self, caption: &str);
    /// The window's client area changed size
    fn resize(&mut self, width: u32, height: u32);
}
