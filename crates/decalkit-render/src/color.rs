//! CSS color resolution.

use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Fallback for colors that do not parse.
pub const FALLBACK_COLOR: Color = Color::from_rgba8(0, 0, 0, 255);

/// Resolve a CSS color string (`#000`, `#396FFF`, `rebeccapurple`, ...).
///
/// Unparseable strings fall back to opaque black.
pub fn parse_css_color(css: &str) -> Color {
    match parse_color(css) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(_) => {
            log::debug!("Unrecognised color {css:?}, using black");
            FALLBACK_COLOR
        }
    }
}
