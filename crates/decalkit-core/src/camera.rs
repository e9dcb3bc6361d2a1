//! Camera module for pan/magnification transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Magnification change per wheel notch.
pub const ZOOM_STEP: f64 = 0.1;
/// Smallest magnification.
pub const MIN_ZOOM: f64 = 0.5;
/// Largest magnification.
pub const MAX_ZOOM: f64 = 2.0;

/// Camera manages the view transform for the surface.
///
/// It handles panning (translation) and magnification (scaling), converting
/// between surface coordinates and scene coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in surface pixels.
    pub offset: Vec2,
    /// Current magnification.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts scene coordinates to surface coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a surface point to scene coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a scene point to surface coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in surface coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Drop any accumulated pan.
    pub fn reset_pan(&mut self) {
        self.offset = Vec2::ZERO;
    }

    /// Apply one wheel event. Positive `delta_y` (wheel down) zooms out.
    ///
    /// Deltas smaller than one notch are ignored. Returns true if the
    /// magnification changed.
    pub fn step_zoom(&mut self, delta_y: f64) -> bool {
        let step = if delta_y >= 1.0 {
            -ZOOM_STEP
        } else if delta_y <= -1.0 {
            ZOOM_STEP
        } else {
            return false;
        };

        // Round to whole steps so repeated notches do not drift.
        let new_zoom = (((self.zoom + step) / ZOOM_STEP).round() * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        self.zoom = new_zoom;
        true
    }
}
