//! Drawable elements and their mapping to externally-shaped records.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementKey = Uuid;

/// Default position for records without one.
pub const DEFAULT_POSITION: f64 = 10.0;
/// Default image width and height.
pub const DEFAULT_IMAGE_SIZE: f64 = 100.0;
/// Default text font size.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Default text color.
pub const DEFAULT_TEXT_COLOR: &str = "#000";

/// Record field names for each semantic attribute.
///
/// Resolved once when the engine is built; everything past ingestion works
/// on typed [`Element`] fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeNames {
    pub left: String,
    pub top: String,
    pub rotation: String,
    pub width: String,
    pub height: String,
    pub z_index: String,
    pub image_source: String,
    pub text: String,
    pub color: String,
    pub font_size: String,
    pub key: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            left: "left".to_string(),
            top: "top".to_string(),
            rotation: "rotate".to_string(),
            width: "width".to_string(),
            height: "height".to_string(),
            z_index: "zIndex".to_string(),
            image_source: "img".to_string(),
            text: "text".to_string(),
            color: "color".to_string(),
            font_size: "size".to_string(),
            key: "key".to_string(),
        }
    }
}

impl AttributeNames {
    /// All names this mapping owns, in record-writing order.
    fn owned(&self) -> [&str; 11] {
        [
            self.key.as_str(),
            self.left.as_str(),
            self.top.as_str(),
            self.rotation.as_str(),
            self.z_index.as_str(),
            self.width.as_str(),
            self.height.as_str(),
            self.image_source.as_str(),
            self.text.as_str(),
            self.color.as_str(),
            self.font_size.as_str(),
        ]
    }
}

/// Loading state of an image element's pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// Nobody has asked for the pixels yet.
    #[default]
    Unrequested,
    /// Handed to the image loader, waiting for completion.
    Pending,
    /// Pixels are available to the renderer.
    Ready,
}

/// Image payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePayload {
    /// Source reference handed to the image loader.
    pub source: String,
    pub width: f64,
    pub height: f64,
    pub status: ImageStatus,
}

/// Text payload. Width and height are derived, see [`TextPayload::size`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextPayload {
    pub content: String,
    pub font_size: f64,
    /// CSS color string.
    pub color: String,
}

impl TextPayload {
    /// Monospace approximation: one em per UTF-16 code unit, one em tall.
    ///
    /// Characters outside the BMP count twice, matching the width hosts
    /// compute from string length.
    pub fn size(&self) -> Size {
        Size::new(
            self.content.encode_utf16().count() as f64 * self.font_size,
            self.font_size,
        )
    }
}

/// What an element draws.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Image(ImagePayload),
    Text(TextPayload),
}

/// A positioned, rotatable drawable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub key: ElementKey,
    /// Top-left corner in scene coordinates.
    pub left: f64,
    pub top: f64,
    /// Rotation in degrees about the element center. Unbounded.
    pub rotation: f64,
    /// Paint order key. Fractional values sort between integers.
    pub z_index: f64,
    pub kind: ElementKind,
    /// Record fields not covered by [`AttributeNames`], kept for round trips.
    extra: Map<String, Value>,
}

impl Element {
    /// Create an image element with default attributes.
    pub fn image(source: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self::with_kind(
            position,
            ElementKind::Image(ImagePayload {
                source: source.into(),
                width,
                height,
                status: ImageStatus::default(),
            }),
        )
    }

    /// Create a text element with default attributes.
    pub fn text(content: impl Into<String>, position: Point, font_size: f64) -> Self {
        Self::with_kind(
            position,
            ElementKind::Text(TextPayload {
                content: content.into(),
                font_size,
                color: DEFAULT_TEXT_COLOR.to_string(),
            }),
        )
    }

    fn with_kind(position: Point, kind: ElementKind) -> Self {
        Self {
            key: Uuid::new_v4(),
            left: position.x,
            top: position.y,
            rotation: 0.0,
            z_index: 0.0,
            kind,
            extra: Map::new(),
        }
    }

    /// Set the z-index.
    pub fn with_z_index(mut self, z_index: f64) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Current size. Text size is re-derived from content and font size.
    pub fn size(&self) -> Size {
        match &self.kind {
            ElementKind::Image(image) => Size::new(image.width, image.height),
            ElementKind::Text(text) => text.size(),
        }
    }

    /// Un-rotated bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    /// Build an element from a raw record, repairing missing attributes.
    ///
    /// Never fails: non-object values and records with neither an image
    /// source nor text still produce an element.
    pub fn from_record(record: &Value, names: &AttributeNames) -> Self {
        let empty = Map::new();
        let fields = match record.as_object() {
            Some(fields) => fields,
            None => {
                log::warn!("Element record is not an object, using defaults: {record}");
                &empty
            }
        };

        let number = |name: &str| fields.get(name).and_then(Value::as_f64);
        let truthy_number = |name: &str| number(name).filter(|v| *v != 0.0 && !v.is_nan());
        let text_field = |name: &str| match fields.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let kind = if let Some(source) = text_field(&names.image_source) {
            ElementKind::Image(ImagePayload {
                source,
                width: truthy_number(&names.width).unwrap_or(DEFAULT_IMAGE_SIZE),
                height: truthy_number(&names.height).unwrap_or(DEFAULT_IMAGE_SIZE),
                status: ImageStatus::default(),
            })
        } else {
            let content = text_field(&names.text).unwrap_or_else(|| {
                log::warn!("Element record has neither image nor text, treating as empty text");
                String::new()
            });
            ElementKind::Text(TextPayload {
                content,
                font_size: truthy_number(&names.font_size).unwrap_or(DEFAULT_FONT_SIZE),
                color: text_field(&names.color).unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            })
        };

        let key = fields
            .get(&names.key)
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        let mut extra = fields.clone();
        for name in names.owned() {
            extra.remove(name);
        }

        Self {
            key,
            left: number(&names.left).unwrap_or(DEFAULT_POSITION),
            top: number(&names.top).unwrap_or(DEFAULT_POSITION),
            rotation: truthy_number(&names.rotation).unwrap_or(0.0),
            z_index: truthy_number(&names.z_index).unwrap_or(0.0),
            kind,
            extra,
        }
    }

    /// Write the element back out as a record using the given names.
    ///
    /// Text records carry their derived width and height.
    pub fn to_record(&self, names: &AttributeNames) -> Value {
        let mut fields = self.extra.clone();
        fields.insert(names.key.clone(), Value::from(self.key.to_string()));
        fields.insert(names.left.clone(), Value::from(self.left));
        fields.insert(names.top.clone(), Value::from(self.top));
        fields.insert(names.rotation.clone(), Value::from(self.rotation));
        fields.insert(names.z_index.clone(), Value::from(self.z_index));

        let size = self.size();
        fields.insert(names.width.clone(), Value::from(size.width));
        fields.insert(names.height.clone(), Value::from(size.height));

        match &self.kind {
            ElementKind::Image(image) => {
                fields.insert(names.image_source.clone(), Value::from(image.source.clone()));
            }
            ElementKind::Text(text) => {
                fields.insert(names.text.clone(), Value::from(text.content.clone()));
                fields.insert(names.color.clone(), Value::from(text.color.clone()));
                fields.insert(names.font_size.clone(), Value::from(text.font_size));
            }
        }
        Value::Object(fields)
    }
}
