//! Scene rendering, hit-testing, and the selected-on-top pass.

use crate::color::parse_css_color;
use crate::surface::Surface;
use decalkit_core::geometry::point_in_quad;
use decalkit_core::handles::{
    self, HANDLE_ICON_SIZE, HANDLE_RADIUS, HandleKind, body_quad, hit_test_handles, pivot, selection_frame,
};
use decalkit_core::{Camera, ControlType, Element, ElementKey, ElementKind, Hit, Scene};
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use std::collections::HashMap;

/// Width of the selection frame stroke.
const FRAME_STROKE_WIDTH: f64 = 1.0;

/// Glyph images drawn inside the three handles.
#[derive(Debug, Clone)]
pub struct HandleIcons<I> {
    pub close: Option<I>,
    pub rotate: Option<I>,
    pub resize: Option<I>,
}

impl<I> Default for HandleIcons<I> {
    fn default() -> Self {
        Self {
            close: None,
            rotate: None,
            resize: None,
        }
    }
}

impl<I> HandleIcons<I> {
    fn get(&self, kind: HandleKind) -> Option<&I> {
        match kind {
            HandleKind::Close => self.close.as_ref(),
            HandleKind::Rotate => self.rotate.as_ref(),
            HandleKind::Resize => self.resize.as_ref(),
        }
    }
}

/// Draws a [`Scene`] onto a [`Surface`] and answers hit-test queries.
///
/// Owns the decoded pixels of user images, keyed by element.
pub struct Renderer<I> {
    images: HashMap<ElementKey, I>,
    icons: HandleIcons<I>,
    /// Selection frame and handle color.
    theme: Color,
    /// Whether the selection frame and handles are drawn at all.
    decorations: bool,
}

impl<I> Renderer<I> {
    /// Create a renderer with a resolved theme color.
    pub fn new(theme: Color, decorations: bool) -> Self {
        Self {
            images: HashMap::new(),
            icons: HandleIcons::default(),
            theme,
            decorations,
        }
    }

    /// Create a renderer from a CSS theme color.
    pub fn with_theme(theme: &str, decorations: bool) -> Self {
        Self::new(parse_css_color(theme), decorations)
    }

    /// Store decoded pixels for an image element.
    pub fn insert_image(&mut self, key: ElementKey, image: I) {
        self.images.insert(key, image);
    }

    pub fn has_image(&self, key: ElementKey) -> bool {
        self.images.contains_key(&key)
    }

    /// Drop pixels of elements that no longer exist.
    pub fn retain_images(&mut self, mut keep: impl FnMut(ElementKey) -> bool) {
        self.images.retain(|key, _| keep(*key));
    }

    /// Drop every cached image.
    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    pub fn set_icons(&mut self, icons: HandleIcons<I>) {
        self.icons = icons;
    }

    /// Draw the full scene in z-order, optionally hit-testing `hit_point`.
    ///
    /// `hit_point` is in scene coordinates. Hit priority follows paint
    /// order: each element's body is tested right after it is drawn, the
    /// selected element's handles right after its frame, and every later
    /// match replaces an earlier one. The topmost painted thing wins, so a
    /// handle beats its own element's body but not elements painted above.
    pub fn render<S>(&self, surface: &mut S, scene: &Scene, camera: &Camera, hit_point: Option<Point>) -> Option<Hit>
    where
        S: Surface<Image = I>,
    {
        surface.clear();
        let mut frame = surface.scoped();
        frame.transform(camera.transform());

        let selected = scene.selected();
        let mut hit = None;
        for element in scene.elements() {
            self.draw_element(&mut *frame, element);
            if hit_point.is_some_and(|point| point_in_quad(point, &body_quad(element))) {
                hit = Some(Hit {
                    key: element.key,
                    control: ControlType::Body,
                });
            }

            if self.decorations && selected == Some(element.key) {
                if let Some(kind) = self.draw_decoration(&mut *frame, element, hit_point) {
                    hit = Some(Hit {
                        key: element.key,
                        control: kind.into(),
                    });
                }
            }
        }
        hit
    }

    /// Draw every unselected element, then the selected one and its handles.
    ///
    /// Used while a gesture is live so the manipulated element is never
    /// covered by its neighbours.
    pub fn render_selected_on_top<S>(&self, surface: &mut S, scene: &Scene, camera: &Camera)
    where
        S: Surface<Image = I>,
    {
        surface.clear();
        let mut frame = surface.scoped();
        frame.transform(camera.transform());

        let selected = scene.selected();
        for element in scene.elements().iter().filter(|element| Some(element.key) != selected) {
            self.draw_element(&mut *frame, element);
        }

        if let Some(element) = scene.selected_element() {
            self.draw_element(&mut *frame, element);
            if self.decorations {
                self.draw_decoration(&mut *frame, element, None);
            }
        }
    }

    /// Draw one element rotated about its center.
    fn draw_element<S>(&self, surface: &mut S, element: &Element)
    where
        S: Surface<Image = I>,
    {
        let mut layer = surface.scoped();
        layer.transform(rotation(element));

        match &element.kind {
            ElementKind::Image(_) => {
                // Pixels may still be loading; draw nothing until they arrive.
                if let Some(pixels) = self.images.get(&element.key) {
                    layer.draw_image(pixels, element.bounds());
                }
            }
            ElementKind::Text(text) => {
                layer.fill_text(&text.content, element.position(), text.font_size, parse_css_color(&text.color));
            }
        }
    }

    /// Draw the selection frame and handles, returning the handle under
    /// `hit_point`, if any.
    fn draw_decoration<S>(&self, surface: &mut S, element: &Element, hit_point: Option<Point>) -> Option<HandleKind>
    where
        S: Surface<Image = I>,
    {
        let mut layer = surface.scoped();
        layer.transform(rotation(element));
        layer.stroke_rect(selection_frame(element), self.theme, FRAME_STROKE_WIDTH);

        for handle in handles::handles(element) {
            layer.fill_circle(handle.center, HANDLE_RADIUS, self.theme);
            if let Some(icon) = self.icons.get(handle.kind) {
                let icon_rect = Rect::from_center_size(handle.center, (HANDLE_ICON_SIZE, HANDLE_ICON_SIZE));
                layer.draw_image(icon, icon_rect);
            }
        }
        hit_point.and_then(|point| hit_test_handles(element, point))
    }
}

/// Rotation of an element about its own center.
fn rotation(element: &Element) -> Affine {
    Affine::rotate_about(element.rotation.to_radians(), pivot(element))
}
