//! Headless surface that records draw commands.

use crate::surface::Surface;
use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;

/// A recorded drawing call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Rect),
    Save,
    Restore,
    Transform(Affine),
    Text {
        content: String,
        origin: Point,
        font_size: f64,
        color: Color,
    },
    Image {
        image: String,
        rect: Rect,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
}

/// Surface that keeps the commands of the current frame in memory.
///
/// Images are identified by a label. Clearing the whole surface drops
/// everything recorded so far, the same way a real surface drops its pixels.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    origin: Point,
    commands: Vec<DrawCommand>,
    depth: usize,
    captured: bool,
    frames: usize,
}

impl RecordingSurface {
    /// Create a recording surface of the given size at the client origin.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            origin: Point::ZERO,
            commands: Vec::new(),
            depth: 0,
            captured: false,
            frames: 0,
        }
    }

    /// Place the surface at an offset in client coordinates.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Commands recorded since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current save/restore nesting depth. Zero between frames.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether pointer capture is held.
    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Number of clears, i.e. frames started.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Labels of drawn text and images, in paint order.
    pub fn paint_order(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { content, .. } => Some(content.clone()),
                DrawCommand::Image { image, .. } => Some(image.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of filled handle circles in the current frame.
    pub fn handle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::FillCircle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    type Image = String;

    fn size(&self) -> Size {
        self.size
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            log::warn!("Unbalanced restore on recording surface");
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::Restore);
    }

    fn transform(&mut self, affine: Affine) {
        self.commands.push(DrawCommand::Transform(affine));
    }

    fn clear_rect(&mut self, rect: Rect) {
        // Anything under a full clear is gone; partial clears just record.
        if rect.contains_rect(self.size.to_rect()) {
            self.commands.clear();
            self.frames += 1;
        }
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn draw_image(&mut self, image: &String, rect: Rect) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            rect,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, width });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn set_pointer_capture(&mut self, captured: bool) {
        self.captured = captured;
    }
}
