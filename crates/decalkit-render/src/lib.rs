//! decalkit Render Library
//!
//! Surface abstraction and render passes for decalkit. Backends implement
//! [`Surface`]; [`RecordingSurface`] is a headless backend that records
//! draw commands.

mod color;
mod recording;
mod renderer;
mod surface;

pub use color::{FALLBACK_COLOR, parse_css_color};
pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{HandleIcons, Renderer};
pub use surface::{Scoped, Surface};
