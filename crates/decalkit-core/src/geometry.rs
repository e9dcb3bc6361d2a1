//! Rectangle corners, centers and the point-in-quad hit test.

use kurbo::{Affine, Point, Rect};

/// Area below which a quad is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-9;

/// The four corners of an axis-aligned rectangle, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
}

impl Corners {
    /// Corners as a quad in drawing order.
    pub fn to_quad(self) -> [Point; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Get the un-rotated corners of a bounding box.
pub fn rect_corners(bounds: Rect) -> Corners {
    Corners {
        top_left: Point::new(bounds.x0, bounds.y0),
        top_right: Point::new(bounds.x1, bounds.y0),
        bottom_right: Point::new(bounds.x1, bounds.y1),
        bottom_left: Point::new(bounds.x0, bounds.y1),
    }
}

/// Midpoint of a bounding box.
///
/// Pointer positions are mapped into scene space before any rotation math,
/// so the center is always expressed in scene coordinates as well.
pub fn rect_center(bounds: Rect) -> Point {
    Point::new(
        (bounds.x0 + bounds.x1) / 2.0,
        (bounds.y0 + bounds.y1) / 2.0,
    )
}

/// Rotate a bounding box by `degrees` about `pivot` and return its quad.
pub fn rotated_quad(bounds: Rect, degrees: f64, pivot: Point) -> [Point; 4] {
    let rotation = Affine::rotate_about(degrees.to_radians(), pivot);
    rect_corners(bounds).to_quad().map(|corner| rotation * corner)
}

/// Check whether a point lies strictly inside a (possibly rotated) quad.
///
/// The point must sit on the same side of all four edges. Points on an edge
/// and degenerate quads never hit.
pub fn point_in_quad(point: Point, quad: &[Point; 4]) -> bool {
    if quad_area(quad).abs() < DEGENERATE_AREA {
        return false;
    }

    let mut sign = 0.0_f64;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let cross = (b - a).cross(point - a);
        if cross == 0.0 {
            return false;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Signed shoelace area of a quad.
fn quad_area(quad: &[Point; 4]) -> f64 {
    let mut twice = 0.0;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}
