//! Presentation surface interface
//!
//! The layout engine decides *what* goes *where*; a surface owns the actual
//! elements and their animation. Every `show_*` call returns a handle whose
//! height feeds back into layout, and every element later reports exactly
//! once that it has become invisible (see [`crate::service::EngineCommand`]).

use std::path::Path;
use std::time::Duration;

use spellfloat_types::{Anchor, OverlaySettings};

/// Identifier of one visual element on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Float/fade parameters applied to every element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub duration: Duration,
    /// Pixels moved straight down over `duration`
    pub float_distance: i32,
    /// Opacity at the start; eases to zero
    pub start_opacity: f32,
}

impl Animation {
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        Self {
            duration: Duration::from_millis(settings.animation_ms),
            float_distance: settings.float_distance,
            start_opacity: settings.opacity,
        }
    }
}

/// Font size and color of a text element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font_size: u32,
    pub color: String,
}

/// Icon box plus text style of an event row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowStyle {
    pub icon_width: u32,
    pub icon_height: u32,
    pub text: TextStyle,
}

/// Layout-side view of a shown element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    id: ElementId,
    height: i32,
    visible: bool,
}

impl ElementHandle {
    pub fn new(id: ElementId, height: i32) -> Self {
        Self {
            id,
            height,
            visible: true,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mark hidden. Returns false if it already was.
    pub(crate) fn mark_hidden(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }
}

/// Something that can show labels and rows and animate them.
///
/// `x` is the horizontal center of the element, `y` its top edge.
pub trait PresentationSurface {
    fn show_subject_label(&mut self, text: &str, x: i32, y: i32, style: &TextStyle)
    -> ElementHandle;

    fn show_event_row(
        &mut self,
        icon: &Path,
        text: &str,
        x: i32,
        y: i32,
        style: &RowStyle,
    ) -> ElementHandle;

    fn show_totals_row(&mut self, text: &str, x: i32, y: i32, style: &TextStyle) -> ElementHandle;

    /// Begin the float/fade of a shown element
    fn start_animation(&mut self, id: ElementId, animation: Animation);

    /// Static per-category markers drawn at each anchor
    fn set_anchor_markers(&mut self, _markers: &[(String, Anchor)]) {}
}
