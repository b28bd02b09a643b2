//! Background zoom: per-frame deltas and the scaled display image

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::asset::BackgroundImage;
use crate::error::{DemoError, DemoResult};

/// Size deltas applied to the display image this frame.
///
/// Never latched: the loop resets it before draining each event batch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomState {
    pub dx: f32,
    pub dy: f32,
}

impl ZoomState {
    pub const NONE: Self = Self { dx: 0.0, dy: 0.0 };

    /// Shrink step, from the asset's aspect ratios
    pub fn zoom_out(original: (u32, u32)) -> Self {
        let (w, h) = (original.0 as f32, original.1 as f32);
        Self {
            dx: -(h / w),
            dy: -(w / h),
        }
    }

    /// Grow step, twice the shrink step in magnitude
    pub fn zoom_in(original: (u32, u32)) -> Self {
        let (w, h) = (original.0 as f32, original.1 as f32);
        Self {
            dx: 2.0 * (h / w),
            dy: 2.0 * (w / h),
        }
    }
}

/// Which size the update step checks before rescaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeGuard {
    /// Check the size before the delta; a negative result is an error
    CurrentSize,
    /// Check the size after the delta; a negative result skips the resize
    #[default]
    ProjectedSize,
}

impl ResizeGuard {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeGuard::CurrentSize => "current_size",
            ResizeGuard::ProjectedSize => "projected_size",
        }
    }
}

/// The background as drawn: the original asset at a scaled size
#[derive(Debug, Clone)]
pub struct DisplayImage {
    original: Arc<BackgroundImage>,
    width: i32,
    height: i32,
}

impl DisplayImage {
    pub fn new(original: Arc<BackgroundImage>) -> Self {
        let width = i32::try_from(original.width).unwrap_or(i32::MAX);
        let height = i32::try_from(original.height).unwrap_or(i32::MAX);
        Self {
            original,
            width,
            height,
        }
    }

    pub fn original(&self) -> &Arc<BackgroundImage> {
        &self.original
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Nothing to draw at zero width or height
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Size after applying `zoom`, truncated to whole pixels
    pub fn projected_size(&self, zoom: ZoomState) -> (i32, i32) {
        (
            (self.width as f32 + zoom.dx) as i32,
            (self.height as f32 + zoom.dy) as i32,
        )
    }

    /// Rescale from the original by `zoom`, subject to `guard`.
    ///
    /// Returns whether the size changed.
    pub fn apply_zoom(&mut self, zoom: ZoomState, guard: ResizeGuard) -> DemoResult<bool> {
        let (width, height) = self.projected_size(zoom);
        let allowed = match guard {
            ResizeGuard::CurrentSize => self.width >= 0 && self.height >= 0,
            ResizeGuard::ProjectedSize => width >= 0 && height >= 0,
        };
        if !allowed {
            return Ok(false);
        }
        if width < 0 || height < 0 {
            return Err(DemoError::InvalidImageSize { width, height });
        }
        if (width, height) == self.size() {
            return Ok(false);
        }
        self.width = width;
        self.height = height;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u32, h: u32) -> DisplayImage {
        DisplayImage::new(Arc::new(BackgroundImage {
            width: w,
            height: h,
            rgba: vec![0; (w * h * 4) as usize],
        }))
    }

    #[test]
    fn test_zoom_steps_use_aspect_ratios() {
        let out = ZoomState::zoom_out((1000, 500));
        assert_eq!(out, ZoomState { dx: -0.5, dy: -2.0 });
        let zin = ZoomState::zoom_in((1000, 500));
        assert_eq!(zin, ZoomState { dx: 1.0, dy: 4.0 });
    }

    #[test]
    fn test_zoom_in_grows() {
        let mut img = image(1000, 500);
        let changed = img
            .apply_zoom(ZoomState::zoom_in((1000, 500)), ResizeGuard::default())
            .unwrap();
        assert!(changed);
        assert_eq!(img.size(), (1001, 504));
    }

    #[test]
    fn test_fractional_delta_truncates_toward_zero() {
        let mut img = image(1000, 500);
        img.apply_zoom(ZoomState::zoom_out((1000, 500)), ResizeGuard::default())
            .unwrap();
        // 999.5 -> 999, 498.0 -> 498
        assert_eq!(img.size(), (999, 498));
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut img = image(10, 10);
        assert!(!img.apply_zoom(ZoomState::NONE, ResizeGuard::default()).unwrap());
        assert_eq!(img.size(), (10, 10));
    }

    #[test]
    fn test_projected_guard_skips_negative_resize() {
        let mut img = image(10, 10);
        let zoom = ZoomState { dx: -15.0, dy: -15.0 };
        assert_eq!(img.projected_size(zoom), (-5, -5));
        let changed = img.apply_zoom(zoom, ResizeGuard::ProjectedSize).unwrap();
        assert!(!changed);
        assert_eq!(img.size(), (10, 10));
    }

    #[test]
    fn test_current_guard_lets_negative_resize_through_as_error() {
        let mut img = image(10, 10);
        let zoom = ZoomState { dx: -15.0, dy: -15.0 };
        let err = img.apply_zoom(zoom, ResizeGuard::CurrentSize).unwrap_err();
        assert!(matches!(err, DemoError::InvalidImageSize { width: -5, height: -5 }));
        assert_eq!(img.size(), (10, 10));
    }

    #[test]
    fn test_default_guard_is_projected() {
        assert_eq!(ResizeGuard::default(), ResizeGuard::ProjectedSize);
        assert_eq!(ResizeGuard::default().as_str(), "projected_size");
    }

    #[test]
    fn test_shrink_to_zero_is_allowed() {
        let mut img = image(1, 1);
        img.apply_zoom(ZoomState { dx: -1.0, dy: -1.0 }, ResizeGuard::ProjectedSize)
            .unwrap();
        assert_eq!(img.size(), (0, 0));
        assert!(img.is_empty());
        // Sub-pixel shrink from zero truncates back to zero
        img.apply_zoom(ZoomState { dx: -0.5, dy: -0.5 }, ResizeGuard::CurrentSize)
            .unwrap();
        assert_eq!(img.size(), (0, 0));
    }
}
