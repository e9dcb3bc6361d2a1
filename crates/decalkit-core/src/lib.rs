//! decalkit Core Library
//!
//! Platform-agnostic model and interaction logic for the decalkit canvas
//! overlay: elements, the z-ordered scene, handle layout, and the gesture
//! state machine.

pub mod camera;
pub mod element;
pub mod geometry;
pub mod handles;
pub mod input;
pub mod interaction;
pub mod options;
pub mod scene;

pub use camera::Camera;
pub use element::{AttributeNames, Element, ElementKey, ElementKind, ImagePayload, ImageStatus, TextPayload};
pub use handles::{ControlType, Handle, HandleKind, Hit};
pub use input::PointerEvent;
pub use interaction::{Gesture, Interaction, InteractionState, PointerDown};
pub use options::{EngineOptions, OptionsError};
pub use scene::{ImageRequest, Scene};
