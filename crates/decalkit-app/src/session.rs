//! Recorded sessions: options, initial elements, and a pointer event script
//! replayed headlessly against a [`RecordingSurface`].

use crate::engine::{EngineError, ImageLoader, OverlayEngine};
use decalkit_core::{EngineOptions, ImageRequest, PointerEvent};
use decalkit_render::RecordingSurface;
use kurbo::{Point, Size};
use serde::Deserialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid session document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

fn default_surface_size() -> Size {
    Size::new(800.0, 600.0)
}

/// A session document.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub options: EngineOptions,
    /// Initial element records.
    #[serde(default)]
    pub elements: Vec<Value>,
    #[serde(default)]
    pub events: Vec<PointerEvent>,
    #[serde(default = "default_surface_size")]
    pub surface_size: Size,
    /// Surface position in client coordinates.
    #[serde(default)]
    pub surface_origin: Point,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// What a replay produced.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Final element list as records.
    pub records: Vec<Value>,
    /// How many times the list-changed callback fired.
    pub notifications: usize,
    /// Frames painted on the recording surface.
    pub frames: usize,
}

/// Queues requests so the replay can resolve them between events.
#[derive(Clone, Default)]
struct QueuedLoader {
    queue: Rc<RefCell<VecDeque<ImageRequest>>>,
}

impl ImageLoader for QueuedLoader {
    fn load(&mut self, request: ImageRequest) {
        self.queue.borrow_mut().push_back(request);
    }
}

/// Replay a session. Images resolve to their source string as soon as the
/// current event has been handled.
pub fn replay(session: Session) -> Result<ReplayReport, ReplayError> {
    let loader = QueuedLoader::default();
    let queue = Rc::clone(&loader.queue);
    let notifications = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&notifications);

    let surface = RecordingSurface::new(session.surface_size).with_origin(session.surface_origin);
    let mut engine = OverlayEngine::builder()
        .surface(surface)
        .options(session.options)
        .records(session.elements)
        .image_loader(loader)
        .on_list_changed(move |_| counter.set(counter.get() + 1))
        .build()?;

    resolve_images(&mut engine, &queue);
    for event in session.events {
        log::trace!("Replaying {event:?}");
        engine.handle_pointer_event(event);
        resolve_images(&mut engine, &queue);
    }
    // A script may stop mid-gesture.
    engine.cancel_gesture();

    Ok(ReplayReport {
        records: engine.records(),
        notifications: notifications.get(),
        frames: engine.surface().frames(),
    })
}

fn resolve_images(engine: &mut OverlayEngine<RecordingSurface>, queue: &RefCell<VecDeque<ImageRequest>>) {
    // Release the borrow before the engine can queue more.
    let requests: Vec<ImageRequest> = queue.borrow_mut().drain(..).collect();
    for request in requests {
        engine.image_loaded(request.key, request.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SESSION: &str = r#"{
        "options": { "selection_theme_color": "red" },
        "elements": [
            { "img": "photo.png", "left": 10, "top": 10, "width": 100, "height": 100 },
            { "text": "AB", "left": 50, "top": 50, "zIndex": 1, "note": "kept" }
        ],
        "events": [
            { "type": "down", "position": { "x": 60.0, "y": 60.0 } },
            { "type": "move", "position": { "x": 80.0, "y": 90.0 } },
            { "type": "up", "position": { "x": 80.0, "y": 90.0 } },
            { "type": "wheel", "delta_y": -120.0 }
        ]
    }"#;

    #[test]
    fn test_replay_drags_text() {
        let report = replay(Session::from_json(SESSION).unwrap()).unwrap();

        assert_eq!(report.records.len(), 2);
        let text = &report.records[1];
        assert_eq!(text["text"], "AB");
        assert_eq!(text["left"], 70.0);
        assert_eq!(text["top"], 80.0);
        assert_eq!(text["note"], "kept");
        // Build, then pointer-up.
        assert_eq!(report.notifications, 2);
        assert!(report.frames > 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let session = Session::load(file.path()).unwrap();
        assert_eq!(session.events.len(), 4);
        assert_eq!(session.options.selection_theme_color, "red");
        assert_eq!(session.surface_size, Size::new(800.0, 600.0));
    }

    #[test]
    fn test_missing_file() {
        let result = Session::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ReplayError::Io(_))));
    }

    #[test]
    fn test_bad_event() {
        let result = Session::from_json(r#"{ "events": [{ "type": "teleport" }] }"#);
        assert!(matches!(result, Err(ReplayError::Json(_))));
    }

    #[test]
    fn test_unfinished_gesture_is_published() {
        let session = Session::from_json(
            r#"{
                "elements": [{ "text": "x", "left": 0, "top": 0 }],
                "events": [
                    { "type": "down", "position": { "x": 4.0, "y": 4.0 } },
                    { "type": "move", "position": { "x": 24.0, "y": 4.0 } }
                ]
            }"#,
        )
        .unwrap();
        let report = replay(session).unwrap();
        assert_eq!(report.records[0]["left"], 20.0);
        assert_eq!(report.notifications, 2);
    }
}
