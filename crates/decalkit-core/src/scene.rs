//! The z-ordered element list and the current selection.

use crate::element::{AttributeNames, Element, ElementKey, ElementKind, ImageStatus};
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

/// An image whose pixels must be fetched by the image loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub key: ElementKey,
    pub source: String,
}

/// Ordered element list plus the selected key.
///
/// Elements are kept sorted ascending by z-index; equal z-indices keep
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<Element>,
    selected: Option<ElementKey>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append elements and re-ingest.
    pub fn add(&mut self, elements: impl IntoIterator<Item = Element>) -> Vec<ImageRequest> {
        self.elements.extend(elements);
        self.ingest()
    }

    /// Append raw records and re-ingest.
    pub fn add_records(&mut self, records: &[Value], names: &AttributeNames) -> Vec<ImageRequest> {
        self.add(records.iter().map(|record| Element::from_record(record, names)))
    }

    /// Discard every element and the selection, then ingest the new list.
    pub fn replace_all(&mut self, elements: impl IntoIterator<Item = Element>) -> Vec<ImageRequest> {
        self.elements.clear();
        self.selected = None;
        self.add(elements)
    }

    /// Normalize the list: unique keys, stable z-order, image requests.
    ///
    /// Returns the images nobody has requested yet and marks them pending.
    pub fn ingest(&mut self) -> Vec<ImageRequest> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &mut self.elements {
            if !seen.insert(element.key) {
                let fresh = Uuid::new_v4();
                log::warn!("Duplicate element key {}, reassigned to {}", element.key, fresh);
                element.key = fresh;
                seen.insert(fresh);
                // Pixels are cached per key, so the copy needs its own load.
                if let ElementKind::Image(image) = &mut element.kind {
                    image.status = ImageStatus::Unrequested;
                }
            }
        }

        self.elements.sort_by(|a, b| a.z_index.total_cmp(&b.z_index));

        let requests: Vec<ImageRequest> = self
            .elements
            .iter_mut()
            .filter_map(|element| match &mut element.kind {
                ElementKind::Image(image) if image.status == ImageStatus::Unrequested => {
                    image.status = ImageStatus::Pending;
                    Some(ImageRequest {
                        key: element.key,
                        source: image.source.clone(),
                    })
                }
                _ => None,
            })
            .collect();

        log::debug!(
            "Ingested {} elements, {} image requests",
            self.elements.len(),
            requests.len()
        );
        requests
    }

    /// Remove an element, clearing the selection if it was selected.
    pub fn remove(&mut self, key: ElementKey) -> Option<Element> {
        let index = self.elements.iter().position(|element| element.key == key)?;
        if self.selected == Some(key) {
            self.selected = None;
        }
        Some(self.elements.remove(index))
    }

    /// Get an element by key.
    pub fn find(&self, key: ElementKey) -> Option<&Element> {
        self.elements.iter().find(|element| element.key == key)
    }

    /// Get a mutable reference to an element by key.
    pub fn find_mut(&mut self, key: ElementKey) -> Option<&mut Element> {
        self.elements.iter_mut().find(|element| element.key == key)
    }

    /// Elements in paint order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Currently selected key, if any.
    pub fn selected(&self) -> Option<ElementKey> {
        self.selected
    }

    /// Currently selected element, if any.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|key| self.find(key))
    }

    /// Select an element. Returns false if the key is unknown.
    pub fn select(&mut self, key: ElementKey) -> bool {
        if self.find(key).is_some() {
            self.selected = Some(key);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Mark an image element's pixels as available.
    pub fn mark_image_ready(&mut self, key: ElementKey) -> bool {
        match self.find_mut(key).map(|element| &mut element.kind) {
            Some(ElementKind::Image(image)) => {
                image.status = ImageStatus::Ready;
                true
            }
            _ => false,
        }
    }

    /// Export every element as a record, in paint order.
    pub fn to_records(&self, names: &AttributeNames) -> Vec<Value> {
        self.elements.iter().map(|element| element.to_record(names)).collect()
    }
}
