//! The overlay engine: scene, interaction, and renderer wired to a surface.

use decalkit_core::{
    Camera, Element, ElementKey, ElementKind, EngineOptions, Hit, ImageRequest, ImageStatus, Interaction,
    InteractionState, PointerDown, PointerEvent, Scene,
};
use decalkit_render::{HandleIcons, Renderer, Surface};
use kurbo::Point;
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Callback invoked with the full element list after every change.
pub type ListChanged = Box<dyn FnMut(&[Element])>;

/// Engine construction errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No drawing surface supplied")]
    MissingSurface,
}

/// External collaborator that fetches pixels for image elements.
///
/// Loading is asynchronous: the host reports completion through
/// [`OverlayEngine::image_loaded`]. Failed loads are simply never reported.
pub trait ImageLoader {
    fn load(&mut self, request: ImageRequest);
}

/// Builder for [`OverlayEngine`].
pub struct EngineBuilder<S: Surface> {
    surface: Option<S>,
    options: EngineOptions,
    records: Vec<Value>,
    elements: Vec<Element>,
    on_list_changed: Option<ListChanged>,
    loader: Option<Box<dyn ImageLoader>>,
}

impl<S: Surface> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self {
            surface: None,
            options: EngineOptions::default(),
            records: Vec::new(),
            elements: Vec::new(),
            on_list_changed: None,
            loader: None,
        }
    }
}

impl<S: Surface> EngineBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial elements as raw records, read through the attribute names.
    pub fn records(mut self, records: Vec<Value>) -> Self {
        self.records = records;
        self
    }

    /// Initial elements, already typed.
    pub fn elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    pub fn on_list_changed(mut self, callback: impl FnMut(&[Element]) + 'static) -> Self {
        self.on_list_changed = Some(Box::new(callback));
        self
    }

    pub fn image_loader(mut self, loader: impl ImageLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    /// Build the engine. Refuses to initialize without a surface.
    pub fn build(self) -> Result<OverlayEngine<S>, EngineError> {
        let surface = self.surface.ok_or(EngineError::MissingSurface)?;
        let options = self.options;

        let mut engine = OverlayEngine {
            surface,
            scene: Scene::new(),
            camera: Camera::new(),
            interaction: Interaction::new(options.read_only, options.pan_enabled),
            renderer: Renderer::with_theme(&options.selection_theme_color, !options.read_only),
            options,
            on_list_changed: self.on_list_changed,
            loader: self.loader,
            pending_images: 0,
            disposed: false,
        };

        let mut initial: Vec<Element> = self
            .records
            .iter()
            .map(|record| Element::from_record(record, &engine.options.attribute_names))
            .collect();
        initial.extend(self.elements);
        log::info!("Overlay engine created with {} elements", initial.len());

        let requests = engine.scene.add(initial);
        engine.dispatch(requests);
        engine.notify();
        engine.render();
        Ok(engine)
    }
}

/// Interactive overlay: owns the scene, the gesture state machine, and the
/// renderer, and drives them from pointer events.
pub struct OverlayEngine<S: Surface> {
    surface: S,
    scene: Scene,
    camera: Camera,
    interaction: Interaction,
    renderer: Renderer<S::Image>,
    options: EngineOptions,
    on_list_changed: Option<ListChanged>,
    loader: Option<Box<dyn ImageLoader>>,
    /// Image loads handed out and not yet reported back.
    pending_images: usize,
    disposed: bool,
}

impl<S: Surface> OverlayEngine<S> {
    pub fn builder() -> EngineBuilder<S> {
        EngineBuilder::new()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn pending_images(&self) -> usize {
        self.pending_images
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current elements as records, using the configured attribute names.
    pub fn records(&self) -> Vec<Value> {
        self.scene.to_records(&self.options.attribute_names)
    }

    /// Append one or many elements, then repaint.
    pub fn add_elements(&mut self, elements: impl IntoIterator<Item = Element>) {
        if !self.live("add_elements") {
            return;
        }
        let requests = self.scene.add(elements);
        self.dispatch(requests);
        self.notify();
        self.render();
    }

    /// Append one or many raw records, then repaint.
    pub fn add_records(&mut self, records: &[Value]) {
        let elements: Vec<Element> = records
            .iter()
            .map(|record| Element::from_record(record, &self.options.attribute_names))
            .collect();
        self.add_elements(elements);
    }

    /// Replace the whole scene and drop the pan offset.
    pub fn replace_all(&mut self, elements: impl IntoIterator<Item = Element>) {
        if !self.live("replace_all") {
            return;
        }
        if self.interaction.pointer_up().is_some() {
            log::warn!("Scene replaced during an active gesture, gesture dropped");
            self.surface.set_pointer_capture(false);
        }

        self.camera.reset_pan();
        self.pending_images = 0;
        let requests = self.scene.replace_all(elements);
        let keys: HashSet<ElementKey> = self.scene.elements().iter().map(|element| element.key).collect();
        self.renderer.retain_images(|key| keys.contains(&key));
        self.dispatch(requests);
        self.notify();
        self.render();
    }

    /// Replace the whole scene from raw records.
    pub fn replace_all_records(&mut self, records: &[Value]) {
        let elements: Vec<Element> = records
            .iter()
            .map(|record| Element::from_record(record, &self.options.attribute_names))
            .collect();
        self.replace_all(elements);
    }

    /// Supply the glyphs drawn inside the close/rotate/resize handles.
    pub fn set_handle_icons(&mut self, icons: HandleIcons<S::Image>) {
        if !self.live("set_handle_icons") {
            return;
        }
        self.renderer.set_icons(icons);
        self.render();
    }

    /// Repaint the whole scene.
    pub fn render(&mut self) {
        if !self.live("render") {
            return;
        }
        self.renderer.render(&mut self.surface, &self.scene, &self.camera, None);
    }

    /// What lies under a client-space point: element and control type.
    ///
    /// Runs a full hit-test render pass.
    pub fn hit_test(&mut self, client: Point) -> Option<Hit> {
        if !self.live("hit_test") {
            return None;
        }
        let world = self.to_scene(client);
        self.renderer.render(&mut self.surface, &self.scene, &self.camera, Some(world))
    }

    /// Report decoded pixels for an image element.
    ///
    /// The full repaint fires once per batch, when the last outstanding load
    /// reports in.
    pub fn image_loaded(&mut self, key: ElementKey, image: S::Image) {
        if !self.live("image_loaded") {
            return;
        }
        let status = match self.scene.find(key).map(|element| &element.kind) {
            Some(ElementKind::Image(payload)) => payload.status,
            _ => {
                log::warn!("Image loaded for unknown element {key}");
                return;
            }
        };

        self.renderer.insert_image(key, image);
        self.scene.mark_image_ready(key);
        if status != ImageStatus::Pending {
            return;
        }

        self.pending_images = self.pending_images.saturating_sub(1);
        if self.pending_images == 0 {
            log::debug!("Image batch complete, repainting");
            self.render();
        }
    }

    /// Dispatch a host pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Wheel { delta_y } => self.wheel(delta_y),
        }
    }

    /// Start a gesture at a client-space point.
    pub fn pointer_down(&mut self, client: Point) {
        if !self.live("pointer_down") {
            return;
        }
        if self.interaction.is_active() {
            log::warn!("Pointer down during an active gesture, ending the previous one");
            self.finish_gesture();
        }

        let screen = self.to_surface(client);
        let world = self.camera.screen_to_world(screen);
        let hit = self.renderer.render(&mut self.surface, &self.scene, &self.camera, Some(world));

        match self.interaction.pointer_down(&mut self.scene, hit, world, screen) {
            PointerDown::Deleted(element) => {
                self.renderer.retain_images(|key| key != element.key);
                // Its load will report for an unknown key; settle it now.
                if matches!(&element.kind, ElementKind::Image(image) if image.status == ImageStatus::Pending) {
                    self.pending_images = self.pending_images.saturating_sub(1);
                }
                self.notify();
                self.render();
            }
            PointerDown::Started(_) => {
                self.surface.set_pointer_capture(true);
                self.renderer.render_selected_on_top(&mut self.surface, &self.scene, &self.camera);
            }
        }
    }

    /// Feed a pointer move to the active gesture. Ignored when idle.
    pub fn pointer_move(&mut self, client: Point) {
        if self.disposed || !self.interaction.is_active() {
            return;
        }
        let screen = self.to_surface(client);
        let world = self.camera.screen_to_world(screen);

        match self.interaction.pointer_move(&mut self.scene, &mut self.camera, world, screen) {
            Some(InteractionState::Panning) => self.render(),
            Some(_) => self.renderer.render_selected_on_top(&mut self.surface, &self.scene, &self.camera),
            None => {}
        }
    }

    /// End the active gesture and publish the list.
    pub fn pointer_up(&mut self) {
        if self.disposed {
            return;
        }
        self.finish_gesture();
    }

    /// Terminate the active gesture abnormally, keeping current attributes.
    pub fn cancel_gesture(&mut self) {
        if self.disposed {
            return;
        }
        if self.interaction.is_active() {
            log::debug!("Gesture cancelled");
        }
        self.finish_gesture();
    }

    /// Apply one wheel notch to the magnification.
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.live("wheel") || !self.options.magnification_enabled {
            return;
        }
        if self.camera.step_zoom(delta_y) {
            log::debug!("Magnification now {:.1}", self.camera.zoom);
            self.render();
        }
    }

    /// Tear down: release capture, clear the surface, drop callbacks and
    /// scene. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if self.interaction.pointer_up().is_some() {
            self.surface.set_pointer_capture(false);
        }
        self.surface.clear();
        self.on_list_changed = None;
        self.loader = None;
        self.scene = Scene::new();
        self.renderer.clear_images();
        self.pending_images = 0;
        self.disposed = true;
        log::debug!("Overlay engine disposed");
    }

    fn finish_gesture(&mut self) {
        if self.interaction.pointer_up().is_some() {
            self.surface.set_pointer_capture(false);
            self.notify();
        }
    }

    /// Hand image requests to the loader and count them as outstanding.
    fn dispatch(&mut self, requests: Vec<ImageRequest>) {
        if requests.is_empty() {
            return;
        }
        self.pending_images += requests.len();
        match self.loader.as_mut() {
            Some(loader) => {
                for request in requests {
                    loader.load(request);
                }
            }
            None => log::warn!("No image loader configured, {} images stay unloaded", requests.len()),
        }
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_list_changed.as_mut() {
            callback(self.scene.elements());
        }
    }

    fn live(&self, operation: &str) -> bool {
        if self.disposed {
            log::warn!("{operation} called after dispose, ignored");
        }
        !self.disposed
    }

    fn to_surface(&self, client: Point) -> Point {
        client - self.surface.origin().to_vec2()
    }

    fn to_scene(&self, client: Point) -> Point {
        self.camera.screen_to_world(self.to_surface(client))
    }
}

impl<S: Surface> Drop for OverlayEngine<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decalkit_core::handles::handles;
    use decalkit_core::HandleKind;
    use decalkit_render::RecordingSurface;
    use kurbo::{Size, Vec2};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Engine = OverlayEngine<RecordingSurface>;

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Size::new(640.0, 480.0))
    }

    /// Records every list passed to the callback.
    fn engine_with_log(options: EngineOptions, elements: Vec<Element>) -> (Engine, Rc<RefCell<Vec<Vec<Element>>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let engine = Engine::builder()
            .surface(surface())
            .options(options)
            .elements(elements)
            .on_list_changed(move |elements| sink.borrow_mut().push(elements.to_vec()))
            .build()
            .unwrap();
        (engine, log)
    }

    #[derive(Clone, Default)]
    struct QueueLoader {
        queue: Rc<RefCell<Vec<ImageRequest>>>,
    }

    impl ImageLoader for QueueLoader {
        fn load(&mut self, request: ImageRequest) {
            self.queue.borrow_mut().push(request);
        }
    }

    #[test]
    fn test_missing_surface() {
        let result = Engine::builder().build();
        assert!(matches!(result, Err(EngineError::MissingSurface)));
    }

    #[test]
    fn test_text_over_image_scenario() {
        let image = Element::image("photo", Point::new(10.0, 10.0), 100.0, 100.0);
        let text = Element::text("AB", Point::new(50.0, 50.0), 16.0).with_z_index(1.0);
        let text_key = text.key;
        let (mut engine, _) = engine_with_log(EngineOptions::default(), vec![image, text]);

        engine.pointer_down(Point::new(60.0, 60.0));
        assert_eq!(engine.scene().selected(), Some(text_key));
        assert_eq!(engine.state(), InteractionState::Dragging);
        assert!(engine.surface().is_captured());

        engine.pointer_move(Point::new(80.0, 90.0));
        let moved = engine.scene().find(text_key).unwrap();
        // Press offset was (10, 10) from the text's top-left.
        assert_eq!(moved.position(), Point::new(70.0, 80.0));

        engine.pointer_up();
        assert_eq!(engine.state(), InteractionState::Idle);
        assert!(!engine.surface().is_captured());
    }

    #[test]
    fn test_records_ingested_through_custom_names() {
        let options = EngineOptions::default().with_attribute_names(decalkit_core::AttributeNames {
            text: "label".to_string(),
            left: "x".to_string(),
            ..Default::default()
        });
        let mut engine = Engine::builder()
            .surface(surface())
            .options(options)
            .records(vec![json!({ "label": "hi", "x": 3, "top": 4, "zIndex": 2 })])
            .build()
            .unwrap();

        let records = engine.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["label"], json!("hi"));
        assert_eq!(records[0]["x"], json!(3.0));

        engine.add_records(&[json!({ "label": "low" })]);
        assert_eq!(engine.surface().paint_order(), vec!["low", "hi"]);
    }

    #[test]
    fn test_rotate_handle_scenario() {
        let image = Element::image("photo", Point::new(100.0, 100.0), 100.0, 100.0);
        let key = image.key;
        let (mut engine, _) = engine_with_log(EngineOptions::default(), vec![image]);

        // Select, then release.
        engine.pointer_down(Point::new(150.0, 150.0));
        engine.pointer_up();

        let rotate = handles(engine.scene().find(key).unwrap())[1];
        assert_eq!(rotate.kind, HandleKind::Rotate);
        assert_eq!(engine.hit_test(rotate.center).map(|hit| hit.control), Some(decalkit_core::ControlType::Rotate));

        // Center is (150, 150); the handle sits up-right at -45 degrees.
        // Swing the pointer to the down-right diagonal: +90 degrees.
        engine.pointer_down(rotate.center);
        assert_eq!(engine.state(), InteractionState::Rotating);
        let offset = rotate.center - Point::new(150.0, 150.0);
        engine.pointer_move(Point::new(150.0 - offset.y, 150.0 + offset.x));
        engine.pointer_up();

        let rotation = engine.scene().find(key).unwrap().rotation;
        assert!((rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_close_handle_deletes() {
        let first = Element::image("a", Point::new(10.0, 10.0), 100.0, 100.0);
        let second = Element::text("keep", Point::new(300.0, 300.0), 16.0);
        let key = first.key;
        let (mut engine, log) = engine_with_log(EngineOptions::default(), vec![first, second]);

        engine.pointer_down(Point::new(50.0, 50.0));
        engine.pointer_up();
        assert_eq!(engine.scene().selected(), Some(key));
        let before = log.borrow().last().map(Vec::len);

        let close = handles(engine.scene().find(key).unwrap())[0];
        engine.pointer_down(close.center);

        assert_eq!(engine.scene().len(), 1);
        assert!(engine.scene().find(key).is_none());
        assert_eq!(engine.scene().selected(), None);
        assert_eq!(engine.state(), InteractionState::Idle);
        assert!(!engine.surface().is_captured());
        let after = log.borrow().last().map(Vec::len);
        assert_eq!(after, before.map(|len| len - 1));

        // No drag follows the deletion.
        engine.pointer_move(Point::new(200.0, 200.0));
        assert_eq!(engine.scene().elements()[0].position(), Point::new(300.0, 300.0));
    }

    #[test]
    fn test_read_only_pan_scenario() {
        let image = Element::image("a", Point::new(10.0, 10.0), 100.0, 100.0);
        let before = image.clone();
        let options = EngineOptions::default().with_read_only(true).with_pan(true);
        let (mut engine, _) = engine_with_log(options, vec![image]);

        engine.pointer_down(Point::new(400.0, 400.0));
        assert_eq!(engine.state(), InteractionState::Panning);
        engine.pointer_move(Point::new(430.0, 390.0));
        engine.pointer_up();

        assert_eq!(engine.camera().offset, Vec2::new(30.0, -10.0));
        let after = &engine.scene().elements()[0];
        assert_eq!(after.position(), before.position());

        // Body drag is a no-op in read-only mode.
        engine.pointer_down(Point::new(60.0, 50.0));
        engine.pointer_move(Point::new(90.0, 90.0));
        engine.pointer_up();
        assert_eq!(engine.scene().elements()[0].position(), before.position());
        assert_eq!(engine.surface().handle_count(), 0);
    }

    #[test]
    fn test_pointer_up_publishes_list() {
        let (mut engine, log) = engine_with_log(
            EngineOptions::default(),
            vec![Element::text("x", Point::new(0.0, 0.0), 16.0)],
        );
        let initial = log.borrow().len();
        engine.pointer_down(Point::new(500.0, 400.0));
        engine.pointer_up();
        assert_eq!(log.borrow().len(), initial + 1);

        // Up without a gesture does nothing.
        engine.pointer_up();
        assert_eq!(log.borrow().len(), initial + 1);
    }

    #[test]
    fn test_surface_origin_and_camera_are_applied() {
        let text = Element::text("AB", Point::new(50.0, 50.0), 16.0);
        let key = text.key;
        let mut engine = Engine::builder()
            .surface(surface().with_origin(Point::new(100.0, 20.0)))
            .elements(vec![text])
            .build()
            .unwrap();

        assert_eq!(engine.hit_test(Point::new(60.0, 60.0)), None);
        assert_eq!(engine.hit_test(Point::new(160.0, 80.0)).map(|hit| hit.key), Some(key));

        engine.wheel(-1.0);
        assert!((engine.camera().zoom - 1.1).abs() < 1e-9);
        // Scene point (60, 60) is now at surface (66, 66).
        assert_eq!(engine.hit_test(Point::new(166.0, 86.0)).map(|hit| hit.key), Some(key));
    }

    #[test]
    fn test_magnification_can_be_disabled() {
        let options = EngineOptions::default().with_magnification(false);
        let (mut engine, _) = engine_with_log(options, Vec::new());
        engine.handle_pointer_event(PointerEvent::Wheel { delta_y: 120.0 });
        assert!((engine.camera().zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_batch_repaints_once() {
        let loader = QueueLoader::default();
        let queue = Rc::clone(&loader.queue);
        let mut engine = Engine::builder()
            .surface(surface())
            .image_loader(loader)
            .records(vec![json!({ "img": "a.png" }), json!({ "img": "b.png", "zIndex": 1 })])
            .build()
            .unwrap();
        assert_eq!(engine.pending_images(), 2);
        let frames = engine.surface().frames();

        let requests: Vec<ImageRequest> = queue.borrow_mut().drain(..).collect();
        assert_eq!(requests.len(), 2);

        engine.image_loaded(requests[0].key, "A".to_string());
        assert_eq!(engine.surface().frames(), frames);
        engine.image_loaded(requests[1].key, "B".to_string());
        assert_eq!(engine.surface().frames(), frames + 1);
        assert_eq!(engine.pending_images(), 0);
        assert_eq!(engine.surface().paint_order(), vec!["A", "B"]);

        // A late duplicate report stores pixels but does not repaint.
        engine.image_loaded(requests[0].key, "A2".to_string());
        assert_eq!(engine.surface().frames(), frames + 1);
    }

    #[test]
    fn test_deleting_a_loading_image_settles_its_batch() {
        let loader = QueueLoader::default();
        let queue = Rc::clone(&loader.queue);
        let mut engine = Engine::builder()
            .surface(surface())
            .image_loader(loader)
            .records(vec![json!({ "img": "a.png" })])
            .build()
            .unwrap();
        let first: Vec<ImageRequest> = queue.borrow_mut().drain(..).collect();
        let key = first[0].key;

        // Unloaded images are still hit-testable by their bounds.
        engine.pointer_down(Point::new(50.0, 50.0));
        engine.pointer_up();
        let close = handles(engine.scene().find(key).unwrap())[0];
        engine.pointer_down(close.center);
        assert!(engine.scene().is_empty());
        assert_eq!(engine.pending_images(), 0);

        // The stale report is ignored.
        engine.image_loaded(key, "A".to_string());
        assert_eq!(engine.pending_images(), 0);

        engine.add_records(&[json!({ "img": "b.png" })]);
        let second: Vec<ImageRequest> = queue.borrow_mut().drain(..).collect();
        assert_eq!(engine.pending_images(), 1);
        let frames = engine.surface().frames();
        engine.image_loaded(second[0].key, "B".to_string());
        assert_eq!(engine.pending_images(), 0);
        assert_eq!(engine.surface().frames(), frames + 1);
        assert_eq!(engine.surface().paint_order(), vec!["B"]);
    }

    #[test]
    fn test_copied_image_gets_its_own_pixels() {
        let loader = QueueLoader::default();
        let queue = Rc::clone(&loader.queue);
        let mut engine = Engine::builder()
            .surface(surface())
            .image_loader(loader)
            .records(vec![json!({ "img": "a.png" })])
            .build()
            .unwrap();
        let first: Vec<ImageRequest> = queue.borrow_mut().drain(..).collect();
        engine.image_loaded(first[0].key, "A".to_string());

        let copy = engine.scene().elements()[0].clone();
        engine.add_elements(vec![copy]);
        let second: Vec<ImageRequest> = queue.borrow_mut().drain(..).collect();
        assert_eq!(second.len(), 1);
        assert_ne!(second[0].key, first[0].key);
        assert_eq!(engine.pending_images(), 1);

        engine.image_loaded(second[0].key, "A copy".to_string());
        assert_eq!(engine.surface().paint_order(), vec!["A", "A copy"]);
    }

    #[test]
    fn test_replace_all_resets_pan() {
        let options = EngineOptions::default().with_read_only(true);
        let (mut engine, log) = engine_with_log(options, Vec::new());
        engine.pointer_down(Point::new(10.0, 10.0));
        engine.pointer_move(Point::new(20.0, 20.0));
        engine.pointer_up();
        assert_ne!(engine.camera().offset, Vec2::ZERO);

        engine.replace_all(vec![Element::text("new", Point::ZERO, 16.0)]);
        assert_eq!(engine.camera().offset, Vec2::ZERO);
        assert_eq!(log.borrow().last().map(Vec::len), Some(1));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let (mut engine, log) = engine_with_log(
            EngineOptions::default(),
            vec![Element::text("x", Point::ZERO, 16.0)],
        );
        engine.pointer_down(Point::new(5.0, 5.0));
        assert!(engine.surface().is_captured());

        let notifications = log.borrow().len();
        engine.dispose();
        engine.dispose();
        assert!(engine.is_disposed());
        assert!(!engine.surface().is_captured());
        assert!(engine.scene().is_empty());

        engine.add_elements(vec![Element::text("late", Point::ZERO, 16.0)]);
        engine.pointer_up();
        assert!(engine.scene().is_empty());
        assert_eq!(log.borrow().len(), notifications);
    }

    #[test]
    fn test_gesture_repaints_selected_on_top() {
        let low = Element::text("low", Point::new(0.0, 0.0), 16.0);
        let high = Element::text("high", Point::new(0.0, 0.0), 16.0).with_z_index(1.0);
        let (mut engine, _) = engine_with_log(EngineOptions::default(), vec![low, high]);

        // "low" spans x 0..48, "high" 0..64: press where only "high" reaches.
        engine.pointer_down(Point::new(60.0, 8.0));
        engine.pointer_up();
        engine.render();
        assert_eq!(engine.surface().paint_order(), vec!["low", "high"]);

        // Select "low" through a spot only it covers after moving it away.
        engine.replace_all(vec![
            Element::text("low", Point::new(0.0, 100.0), 16.0),
            Element::text("high", Point::new(0.0, 0.0), 16.0).with_z_index(1.0),
        ]);
        engine.pointer_down(Point::new(10.0, 108.0));
        engine.pointer_move(Point::new(10.0, 10.0));
        assert_eq!(engine.surface().paint_order(), vec!["high", "low"]);
        engine.pointer_up();
    }
}
