//! 2D drawing surface abstraction.

use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use std::ops::{Deref, DerefMut};

/// Trait for drawing backends.
///
/// Mirrors an immediate-mode 2D context: a transform stack with
/// save/restore, plus the handful of primitives the overlay draws.
/// Coordinates passed to the primitives are in the current transform's
/// space.
pub trait Surface {
    /// Decoded image handle drawable by this surface.
    type Image;

    /// Surface size in pixels.
    fn size(&self) -> Size;

    /// Position of the surface's top-left corner in client coordinates.
    fn origin(&self) -> Point {
        Point::ZERO
    }

    /// Push the current transform and style state.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    /// Multiply the current transform by `affine`.
    fn transform(&mut self, affine: Affine);

    /// Clear a region given in surface pixels, ignoring the current transform.
    fn clear_rect(&mut self, rect: Rect);

    /// Clear the whole surface.
    fn clear(&mut self) {
        let size = self.size();
        self.clear_rect(size.to_rect());
    }

    /// Draw a single line of text with its top-left at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color);

    /// Blit an image scaled into `rect`.
    fn draw_image(&mut self, image: &Self::Image, rect: Rect);

    /// Stroke the outline of a rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    /// Route pointer move/up events to this surface while a gesture is live.
    fn set_pointer_capture(&mut self, _captured: bool) {}

    /// Save state and return a guard that restores it when dropped.
    fn scoped(&mut self) -> Scoped<'_, Self>
    where
        Self: Sized,
    {
        self.save();
        Scoped { surface: self }
    }
}

/// Saved surface state, restored on drop on every exit path.
pub struct Scoped<'a, S: Surface> {
    surface: &'a mut S,
}

impl<S: Surface> Deref for Scoped<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface> DerefMut for Scoped<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface> Drop for Scoped<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
