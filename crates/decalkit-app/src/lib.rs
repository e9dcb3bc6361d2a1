//! decalkit Application
//!
//! The overlay engine facade tying scene, interaction, and rendering to a
//! host surface, plus headless session replay.

mod engine;
mod session;

pub use engine::{EngineBuilder, EngineError, ImageLoader, ListChanged, OverlayEngine};
pub use session::{ReplayError, ReplayReport, Session, replay};
