//! Pointer-driven move/rotate/resize/pan state machine.
//!
//! The machine never hit-tests on its own: the caller runs the renderer in
//! hit-test mode and hands the result to [`Interaction::pointer_down`].
//! Every gesture holds the element key, never a reference, and is valid as
//! long as the scene is not structurally changed mid-gesture.

use crate::camera::Camera;
use crate::element::{Element, ElementKey, ElementKind};
use crate::geometry::rect_center;
use crate::handles::{ControlType, Hit};
use crate::scene::Scene;
use kurbo::{Point, Size, Vec2};

/// Smallest image width/height a resize can produce.
pub const MIN_IMAGE_SIZE: f64 = 6.0;
/// Smallest font size a text resize can produce.
pub const MIN_FONT_SIZE: f64 = 12.0;

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging,
    Rotating,
    Resizing,
    Panning,
}

/// A live gesture, created at pointer-down and dropped at pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Pointer went down on nothing actionable; waits for pointer-up.
    Inert,
    Drag {
        key: ElementKey,
        /// Pointer position minus the element's top-left at press time.
        grab: Vec2,
    },
    Rotate {
        key: ElementKey,
        center: Point,
        /// Angle from center to pointer at press time, in degrees.
        press_angle: f64,
        start_rotation: f64,
    },
    Resize {
        key: ElementKey,
        press: Point,
        /// Width and height at press time; height is the font size for text.
        start_size: Size,
    },
    Pan {
        /// Last pointer position in surface coordinates.
        last: Point,
    },
}

impl Gesture {
    pub fn state(&self) -> InteractionState {
        match self {
            Gesture::Inert => InteractionState::Idle,
            Gesture::Drag { .. } => InteractionState::Dragging,
            Gesture::Rotate { .. } => InteractionState::Rotating,
            Gesture::Resize { .. } => InteractionState::Resizing,
            Gesture::Pan { .. } => InteractionState::Panning,
        }
    }
}

/// Outcome of a pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerDown {
    /// The close handle was hit; the element is gone and no gesture follows.
    Deleted(Element),
    /// A gesture started and lasts until pointer-up.
    Started(InteractionState),
}

/// The interaction state machine.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Option<Gesture>,
    read_only: bool,
    pan_enabled: bool,
}

impl Interaction {
    pub fn new(read_only: bool, pan_enabled: bool) -> Self {
        Self {
            gesture: None,
            read_only,
            pan_enabled,
        }
    }

    /// Current state; `Idle` when no gesture is alive.
    pub fn state(&self) -> InteractionState {
        self.gesture.as_ref().map_or(InteractionState::Idle, Gesture::state)
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Classify a press and lock onto a gesture.
    ///
    /// `world` is the pointer in scene coordinates, `screen` in surface
    /// coordinates.
    pub fn pointer_down(&mut self, scene: &mut Scene, hit: Option<Hit>, world: Point, screen: Point) -> PointerDown {
        let gesture = match hit {
            None => {
                scene.clear_selection();
                if self.read_only && self.pan_enabled {
                    Gesture::Pan { last: screen }
                } else {
                    Gesture::Inert
                }
            }
            Some(Hit { key, control: ControlType::Close }) if !self.read_only => {
                self.gesture = None;
                scene.clear_selection();
                if let Some(removed) = scene.remove(key) {
                    log::debug!("Deleted element {key} via close handle");
                    return PointerDown::Deleted(removed);
                }
                Gesture::Inert
            }
            Some(Hit { key, control }) => {
                if scene.select(key) {
                    self.begin(scene, key, control, world)
                } else {
                    log::warn!("Hit on unknown element {key}");
                    Gesture::Inert
                }
            }
        };

        let state = gesture.state();
        log::debug!("Gesture started: {state:?}");
        self.gesture = Some(gesture);
        PointerDown::Started(state)
    }

    /// Snapshot the baseline for a gesture on a selected element.
    fn begin(&self, scene: &Scene, key: ElementKey, control: ControlType, world: Point) -> Gesture {
        let Some(element) = scene.find(key) else {
            return Gesture::Inert;
        };
        match control {
            ControlType::Body => Gesture::Drag {
                key,
                grab: world - element.position(),
            },
            ControlType::Rotate => {
                let center = rect_center(element.bounds());
                Gesture::Rotate {
                    key,
                    center,
                    press_angle: angle_degrees(center, world),
                    start_rotation: element.rotation,
                }
            }
            ControlType::Resize => Gesture::Resize {
                key,
                press: world,
                start_size: resize_baseline(element),
            },
            // Close is only reachable here in read-only mode, where it is a no-op.
            ControlType::Close => Gesture::Inert,
        }
    }

    /// Apply a pointer move to the active gesture.
    ///
    /// Returns the state that changed something and needs a repaint, or
    /// `None` when nothing moved.
    pub fn pointer_move(
        &mut self,
        scene: &mut Scene,
        camera: &mut Camera,
        world: Point,
        screen: Point,
    ) -> Option<InteractionState> {
        let read_only = self.read_only;
        let gesture = self.gesture.as_mut()?;
        let state = gesture.state();

        match gesture {
            Gesture::Inert => return None,
            Gesture::Pan { last } => {
                camera.pan(screen - *last);
                *last = screen;
            }
            _ if read_only => return None,
            Gesture::Drag { key, grab } => {
                let element = scene.find_mut(*key)?;
                element.left = world.x - grab.x;
                element.top = world.y - grab.y;
            }
            Gesture::Rotate {
                key,
                center,
                press_angle,
                start_rotation,
            } => {
                let element = scene.find_mut(*key)?;
                element.rotation = *start_rotation + (angle_degrees(*center, world) - *press_angle);
            }
            Gesture::Resize { key, press, start_size } => {
                let element = scene.find_mut(*key)?;
                resize(element, *start_size, world - *press);
            }
        }
        Some(state)
    }

    /// End the gesture. Returns it if one was alive.
    pub fn pointer_up(&mut self) -> Option<Gesture> {
        let gesture = self.gesture.take();
        if let Some(gesture) = &gesture {
            log::debug!("Gesture ended: {:?}", gesture.state());
        }
        gesture
    }
}

/// Angle from `center` to `point` in degrees.
pub fn angle_degrees(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).to_degrees()
}

/// Width/height baseline for a resize. Text uses its font size as height.
fn resize_baseline(element: &Element) -> Size {
    match &element.kind {
        ElementKind::Image(image) => Size::new(image.width, image.height),
        ElementKind::Text(text) => Size::new(text.size().width, text.font_size),
    }
}

/// Resize from a baseline by a pointer delta.
///
/// Negative candidates flip sign instead of clamping, so dragging past the
/// origin grows the element again. Images floor at [`MIN_IMAGE_SIZE`]; text
/// only takes the height, as its font size, floored at [`MIN_FONT_SIZE`].
pub fn resize(element: &mut Element, start_size: Size, delta: Vec2) {
    let width = (start_size.width + delta.x).abs();
    let height = (start_size.height + delta.y).abs();
    match &mut element.kind {
        ElementKind::Image(image) => {
            image.width = width.max(MIN_IMAGE_SIZE);
            image.height = height.max(MIN_IMAGE_SIZE);
        }
        ElementKind::Text(text) => {
            text.font_size = height.max(MIN_FONT_SIZE);
        }
    }
}
