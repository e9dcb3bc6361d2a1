//! Selection frame and control handle layout.

use crate::element::{Element, ElementKey, ElementKind};
use crate::geometry::{point_in_quad, rect_center, rect_corners, rotated_quad};
use kurbo::{Point, Rect};

/// Nominal control size in surface pixels.
pub const HANDLE_SIZE: f64 = 16.0;
/// Radius of the filled handle circle.
pub const HANDLE_RADIUS: f64 = HANDLE_SIZE - 4.0;
/// Side of the glyph icon drawn inside a handle.
pub const HANDLE_ICON_SIZE: f64 = HANDLE_SIZE - 4.0;
/// Gap between element bounds and the selection frame.
pub const FRAME_PADDING: f64 = 1.0;

/// The three handles drawn on a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Top-left; deletes the element.
    Close,
    /// Top-right; rotates about the center.
    Rotate,
    /// Bottom-right; resizes.
    Resize,
}

impl HandleKind {
    /// All handles in paint order.
    pub const ALL: [HandleKind; 3] = [HandleKind::Close, HandleKind::Rotate, HandleKind::Resize];
}

/// What part of an element a hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    Body,
    Close,
    Rotate,
    Resize,
}

impl From<HandleKind> for ControlType {
    fn from(kind: HandleKind) -> Self {
        match kind {
            HandleKind::Close => ControlType::Close,
            HandleKind::Rotate => ControlType::Rotate,
            HandleKind::Resize => ControlType::Resize,
        }
    }
}

/// Result of a hit-test pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub key: ElementKey,
    pub control: ControlType,
}

/// A handle placed on a selection frame, before rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    /// Center in scene coordinates, un-rotated.
    pub center: Point,
}

impl Handle {
    /// Square hit region around the handle center, un-rotated.
    pub fn hit_rect(&self) -> Rect {
        Rect::from_center_size(self.center, (HANDLE_RADIUS * 2.0, HANDLE_RADIUS * 2.0))
    }

    /// Hit quad rotated with the element about the element center.
    pub fn hit_quad(&self, element: &Element) -> [Point; 4] {
        rotated_quad(self.hit_rect(), element.rotation, pivot(element))
    }
}

/// Rotation pivot shared by an element, its frame and its handles.
pub fn pivot(element: &Element) -> Point {
    rect_center(element.bounds())
}

/// Body hit quad of an element.
pub fn body_quad(element: &Element) -> [Point; 4] {
    rotated_quad(element.bounds(), element.rotation, pivot(element))
}

/// The selection frame: bounds inflated by the frame padding.
///
/// Text frames are lifted so they hug the glyph tops.
pub fn selection_frame(element: &Element) -> Rect {
    let frame = element.bounds().inflate(FRAME_PADDING, FRAME_PADDING);
    match &element.kind {
        ElementKind::Image(_) => frame,
        ElementKind::Text(text) => frame - kurbo::Vec2::new(0.0, text.font_size / 10.0 - FRAME_PADDING),
    }
}

/// Handles centered on the frame corners: close, rotate, resize.
pub fn handles(element: &Element) -> [Handle; 3] {
    let corners = rect_corners(selection_frame(element));
    HandleKind::ALL.map(|kind| Handle {
        kind,
        center: match kind {
            HandleKind::Close => corners.top_left,
            HandleKind::Rotate => corners.top_right,
            HandleKind::Resize => corners.bottom_right,
        },
    })
}

/// Which handle of `element` contains the point, testing in paint order.
///
/// Later handles are painted above earlier ones, so the last match wins.
pub fn hit_test_handles(element: &Element, point: Point) -> Option<HandleKind> {
    handles(element)
        .iter()
        .filter(|handle| point_in_quad(point, &handle.hit_quad(element)))
        .map(|handle| handle.kind)
        .last()
}
