//! Engine construction options.

use crate::element::AttributeNames;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default selection frame and handle color.
pub const DEFAULT_THEME_COLOR: &str = "#396FFF";

/// Options errors.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid options document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Recognized construction options. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Record field names for element attributes.
    pub attribute_names: AttributeNames,
    /// CSS color for the selection frame and handles.
    pub selection_theme_color: String,
    /// Allow dragging the background to pan (read-only mode only).
    pub pan_enabled: bool,
    /// Allow wheel magnification.
    pub magnification_enabled: bool,
    /// Disable move/rotate/resize/delete and hide the handles.
    pub read_only: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            attribute_names: AttributeNames::default(),
            selection_theme_color: DEFAULT_THEME_COLOR.to_string(),
            pan_enabled: true,
            magnification_enabled: true,
            read_only: false,
        }
    }
}

impl EngineOptions {
    /// Parse options from a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_pan(mut self, enabled: bool) -> Self {
        self.pan_enabled = enabled;
        self
    }

    pub fn with_magnification(mut self, enabled: bool) -> Self {
        self.magnification_enabled = enabled;
        self
    }

    pub fn with_attribute_names(mut self, names: AttributeNames) -> Self {
        self.attribute_names = names;
        self
    }
}
