use std::collections::HashMap;

use assembly_element::{Element, ElementId};

/// Insertion-ordered map from identity to element; the single source of
/// truth for which elements exist.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    order: Vec<ElementId>,
    elements: HashMap<ElementId, Element>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `element` unless its identity is already present, in which
    /// case the existing element is kept. Returns whether it was inserted.
    pub fn insert(&mut self, element: Element) -> bool {
        let id = element.id();
        if self.elements.contains_key(&id) {
            return false;
        }
        self.order.push(id);
        self.elements.insert(id, element);
        true
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(&id)?;
        self.order.retain(|&o| o != id);
        Some(element)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position in insertion order.
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.order.iter().position(|&o| o == id)
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }
}
