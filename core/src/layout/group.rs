//! A placed group of indicators
//!
//! Owns the handles of every element shown for one (category, subject)
//! batch. A group is finished once all of them have reported invisible.

use crate::grouper::GroupKey;
use crate::surface::{ElementHandle, ElementId};

#[derive(Debug)]
pub struct PlacedGroup {
    key: GroupKey,
    origin: (i32, i32),
    height: i32,
    total: Option<u64>,
    elements: Vec<ElementHandle>,
}

impl PlacedGroup {
    pub(crate) fn new(
        key: GroupKey,
        origin: (i32, i32),
        height: i32,
        total: Option<u64>,
        elements: Vec<ElementHandle>,
    ) -> Self {
        Self {
            key,
            origin,
            height,
            total,
            elements,
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// Anchor x and top y of the group
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Vertical span reserved for this group (excluding the gap after it)
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Damage total, shown only for groups with two or more damage rows
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    pub fn owns(&self, id: ElementId) -> bool {
        self.elements.iter().any(|e| e.id() == id)
    }

    /// Record that an element finished. Returns true on the first report.
    pub(crate) fn mark_hidden(&mut self, id: ElementId) -> bool {
        self.elements
            .iter_mut()
            .find(|e| e.id() == id)
            .is_some_and(ElementHandle::mark_hidden)
    }

    /// True once every element has reported invisible
    pub fn is_finished(&self) -> bool {
        self.elements.iter().all(|e| !e.is_visible())
    }
}
