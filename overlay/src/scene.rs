//! Retained scene of overlay elements
//!
//! Elements are added with their placement fixed at creation; after that
//! only their animation phase changes. [`Scene::tick`] retires finished
//! elements and reports them, [`Scene::draw_list`] produces what a pixel
//! backend would paint for one frame.

use std::path::PathBuf;
use std::time::Instant;

use spellfloat_core::{Animation, ElementId};
use spellfloat_types::Anchor;
use spellfloat_types::formatting::category_display_name;
use tiny_skia::Color;

use crate::animation::ElementPhase;
use crate::metrics;
use crate::utils::{marker_color, with_opacity};

/// Font size of anchor marker captions
pub const MARKER_FONT_SIZE: u32 = 12;

/// Icon image and the box it is drawn into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBox {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Label,
    Row(IconBox),
    Totals,
}

/// Placement of a new element. `x` is its horizontal center, `y` its top.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    pub kind: ElementKind,
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub font_size: u32,
    pub color: Color,
}

#[derive(Debug, Clone)]
struct SceneElement {
    id: ElementId,
    spec: ElementSpec,
    phase: ElementPhase,
}

impl SceneElement {
    fn left(&self) -> f32 {
        (self.spec.x - self.spec.width / 2) as f32
    }
}

/// One thing to paint this frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// `None` for anchor markers
    pub element: Option<ElementId>,
    pub text: String,
    pub icon: Option<IconBox>,
    pub left: f32,
    pub top: f32,
    pub font_size: u32,
    pub color: Color,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    caption: String,
    anchor: Anchor,
}

#[derive(Debug, Default)]
pub struct Scene {
    elements: Vec<SceneElement>,
    markers: Vec<Marker>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element in the `Placed` phase
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        self.elements.push(SceneElement {
            id,
            spec,
            phase: ElementPhase::Placed,
        });
        id
    }

    /// Start an element's float/fade. False if unknown or already started.
    pub fn start_animation(&mut self, id: ElementId, animation: Animation, now: Instant) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => element.phase.start(animation, now),
            None => {
                tracing::debug!(element = id.0, "animation requested for unknown element");
                false
            }
        }
    }

    /// Replace the anchor markers, captioned with category display names
    pub fn set_markers(&mut self, markers: &[(String, Anchor)]) {
        self.markers = markers
            .iter()
            .map(|(category, anchor)| Marker {
                caption: category_display_name(category),
                anchor: *anchor,
            })
            .collect();
    }

    /// Advance every element to `now`, drop the ones that became invisible
    /// and return their ids. Each id is returned exactly once.
    pub fn tick(&mut self, now: Instant) -> Vec<ElementId> {
        let mut hidden = Vec::new();
        for element in &mut self.elements {
            if element.phase.advance(now) {
                hidden.push(element.id);
            }
        }
        self.elements.retain(|e| !e.phase.is_invisible());
        hidden
    }

    /// Markers first, then live elements in creation order
    pub fn draw_list(&self, now: Instant) -> Vec<DrawItem> {
        let markers = self.markers.iter().map(|marker| {
            let width = metrics::text_width(&marker.caption, MARKER_FONT_SIZE);
            let height = metrics::line_height(MARKER_FONT_SIZE);
            DrawItem {
                element: None,
                text: marker.caption.clone(),
                icon: None,
                left: (marker.anchor.x - width / 2) as f32,
                top: (marker.anchor.y - height) as f32,
                font_size: MARKER_FONT_SIZE,
                color: marker_color(),
                opacity: 1.0,
            }
        });

        let elements = self
            .elements
            .iter()
            .filter(|e| !e.phase.is_invisible())
            .map(|element| {
                let frame = element.phase.frame(now);
                let icon = match &element.spec.kind {
                    ElementKind::Row(icon) => Some(icon.clone()),
                    ElementKind::Label | ElementKind::Totals => None,
                };
                DrawItem {
                    element: Some(element.id),
                    text: element.spec.text.clone(),
                    icon,
                    left: element.left(),
                    top: element.spec.y as f32 + frame.dy,
                    font_size: element.spec.font_size,
                    color: with_opacity(element.spec.color, frame.opacity),
                    opacity: frame.opacity,
                }
            });

        markers.chain(elements).collect()
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
