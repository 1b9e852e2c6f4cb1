//! Column layout for indicator groups
//!
//! Each category is a column hanging from its anchor. A new group goes at
//! `anchor.y + offset[category]`; the offset then grows by the group's
//! height plus one padding unit. Removing a finished group does not give its
//! span back, so columns keep growing while the engine runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use spellfloat_types::formatting::{format_amount, format_total};
use spellfloat_types::settings::PADDING_MIN;
use spellfloat_types::{Anchor, CategoryStyle, DEFAULT_ANCHOR, OverlaySettings};

use super::group::PlacedGroup;
use crate::assets::IconSet;
use crate::events::Event;
use crate::grouper::EventBatch;
use crate::surface::{Animation, ElementId, PresentationSurface, RowStyle, TextStyle};

pub struct LayoutEngine {
    anchors: BTreeMap<String, Anchor>,
    styles: BTreeMap<String, CategoryStyle>,
    icons: IconSet,
    padding: i32,
    totals_font_ratio: f32,
    totals_color: String,
    animation: Animation,
    /// Cumulative pixels consumed per category column
    offsets: HashMap<String, i32>,
    groups: Vec<PlacedGroup>,
    warned_categories: HashSet<String>,
}

impl LayoutEngine {
    pub fn new(settings: &OverlaySettings, icons: IconSet) -> Self {
        let offsets = settings.anchors.keys().map(|c| (c.clone(), 0)).collect();
        let mut engine = Self {
            anchors: BTreeMap::new(),
            styles: BTreeMap::new(),
            icons: IconSet::default(),
            padding: 0,
            totals_font_ratio: 0.5,
            totals_color: String::new(),
            animation: Animation::from_settings(settings),
            offsets,
            groups: Vec::new(),
            warned_categories: HashSet::new(),
        };
        engine.apply_settings(settings, icons);
        engine
    }

    /// Swap in a new settings snapshot.
    ///
    /// Offsets and live groups carry over; only future placements see the
    /// new anchors, styles and timing.
    pub fn apply_settings(&mut self, settings: &OverlaySettings, icons: IconSet) {
        self.anchors = settings.anchors.clone();
        self.styles = settings.categories.clone();
        self.icons = icons;
        self.padding = settings.padding.max(PADDING_MIN);
        self.totals_font_ratio = settings.totals_font_ratio;
        self.totals_color = settings.totals_color.clone();
        self.animation = Animation::from_settings(settings);
        for category in settings.anchors.keys() {
            self.offsets.entry(category.clone()).or_insert(0);
        }
        self.warned_categories.clear();
    }

    /// Place a batch as a new group and start its animations.
    ///
    /// Returns the y coordinate the group was placed at.
    pub fn place<S>(&mut self, batch: EventBatch, surface: &mut S) -> i32
    where
        S: PresentationSurface + ?Sized,
    {
        let total = batch.total_damage();
        let EventBatch { key, events } = batch;

        let anchor = self.anchor_for(&key.category);
        let style = self.style_for(&key.category);
        let x = anchor.x;
        let origin_y = anchor.y.saturating_add(self.offset(&key.category));

        let label_style = TextStyle {
            font_size: style.subject_font_size,
            color: style.subject_color.clone(),
        };
        let row_style = RowStyle {
            icon_width: style.icon_width,
            icon_height: style.icon_height,
            text: TextStyle {
                font_size: style.font_size,
                color: style.text_color.clone(),
            },
        };

        let mut elements = Vec::with_capacity(events.len() + 2);

        let label = surface.show_subject_label(&key.subject, x, origin_y, &label_style);
        let mut cursor = origin_y.saturating_add(label.height() + self.padding);
        elements.push(label);

        for event in &events {
            let Some(icon) = self.icons.icon_for(event.spell()) else {
                tracing::warn!(spell = %event.spell(), "no icon for spell, skipping row");
                continue;
            };
            let text = match event {
                Event::Damage { amount, .. } => format_amount(*amount),
                Event::Special { message, .. } => message.clone(),
            };
            let row = surface.show_event_row(icon, &text, x, cursor, &row_style);
            cursor = cursor.saturating_add(row.height() + self.padding);
            elements.push(row);
        }

        if let Some(total) = total {
            let totals_style = TextStyle {
                font_size: self.totals_font_size(&style),
                color: self.totals_color.clone(),
            };
            let text = format_total(&key.subject, total);
            let row = surface.show_totals_row(&text, x, cursor, &totals_style);
            cursor = cursor.saturating_add(row.height() + self.padding);
            elements.push(row);
        }

        for element in &elements {
            surface.start_animation(element.id(), self.animation);
        }

        let height = cursor - origin_y;
        let offset = self.offsets.entry(key.category.clone()).or_insert(0);
        *offset = offset.saturating_add(height + self.padding);

        tracing::debug!(
            category = %key.category,
            subject = %key.subject,
            y = origin_y,
            height,
            elements = elements.len(),
            "placed group"
        );

        self.groups
            .push(PlacedGroup::new(key, (x, origin_y), height, total, elements));
        origin_y
    }

    /// Place every batch, then sweep finished groups.
    pub fn place_all<S>(&mut self, batches: Vec<EventBatch>, surface: &mut S) -> Vec<i32>
    where
        S: PresentationSurface + ?Sized,
    {
        let placed = batches
            .into_iter()
            .map(|batch| self.place(batch, surface))
            .collect();
        self.sweep();
        placed
    }

    /// Route a "no longer visible" report to its group.
    ///
    /// Returns false for unknown ids and repeated reports.
    pub fn element_hidden(&mut self, id: ElementId) -> bool {
        let marked = self
            .groups
            .iter_mut()
            .find(|g| g.owns(id))
            .is_some_and(|g| g.mark_hidden(id));
        if !marked {
            tracing::debug!(element = id.0, "ignoring hidden report for unknown or hidden element");
        }
        marked
    }

    /// Drop groups whose elements are all invisible. Offsets are untouched.
    pub fn sweep(&mut self) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| !g.is_finished());
        let removed = before - self.groups.len();
        if removed > 0 {
            tracing::debug!(removed, live = self.groups.len(), "swept finished groups");
        }
        removed
    }

    /// Pixels consumed so far in a category column
    pub fn offset(&self, category: &str) -> i32 {
        self.offsets.get(category).copied().unwrap_or(0)
    }

    pub fn groups(&self) -> &[PlacedGroup] {
        &self.groups
    }

    /// Configured anchors, for drawing column markers
    pub fn anchor_markers(&self) -> Vec<(String, Anchor)> {
        self.anchors
            .iter()
            .map(|(category, anchor)| (category.clone(), *anchor))
            .collect()
    }

    fn anchor_for(&mut self, category: &str) -> Anchor {
        if let Some(anchor) = self.anchors.get(category) {
            return *anchor;
        }
        if self.warned_categories.insert(category.to_string()) {
            tracing::warn!(category, "no anchor configured for category, using default");
        }
        DEFAULT_ANCHOR
    }

    fn style_for(&self, category: &str) -> CategoryStyle {
        self.styles.get(category).cloned().unwrap_or_default()
    }

    fn totals_font_size(&self, style: &CategoryStyle) -> u32 {
        ((style.font_size as f32 * self.totals_font_ratio) as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::group_events;
    use crate::surface::testing::{LABEL_HEIGHT, ROW_HEIGHT, RecordingSurface, Shown, TOTALS_HEIGHT};

    const PADDING: i32 = 10;

    fn icons() -> IconSet {
        IconSet::from_entries([
            ("Bond of Death", "/icons/bod.png"),
            ("Vampiric Curse", "/icons/vc.png"),
            ("Screaming Terror", "/icons/st.png"),
        ])
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(&OverlaySettings::default(), icons())
    }

    fn damage(spell: &str, subject: &str, amount: u64) -> Event {
        Event::Damage {
            spell: spell.into(),
            category: "damage".into(),
            subject: subject.into(),
            amount,
        }
    }

    fn batch(events: Vec<Event>) -> EventBatch {
        let mut batches = group_events(events);
        assert_eq!(batches.len(), 1);
        batches.remove(0)
    }

    #[test]
    fn test_first_group_sits_on_anchor() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        let y = layout.place(batch(vec![damage("Bond of Death", "Ogre", 5)]), &mut surface);
        assert_eq!(y, 100);

        let shown = surface.shown();
        assert_eq!(shown[0].1, Shown::Label { text: "Ogre".into(), x: 960, y: 100 });
        assert_eq!(
            shown[1].1,
            Shown::Row {
                icon: "/icons/bod.png".into(),
                text: "5".into(),
                x: 960,
                y: 100 + LABEL_HEIGHT + PADDING,
            }
        );
        assert_eq!(shown.len(), 2);
    }

    #[test]
    fn test_offset_grows_by_height_plus_padding() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(batch(vec![damage("Bond of Death", "Ogre", 5)]), &mut surface);

        let height = LABEL_HEIGHT + PADDING + ROW_HEIGHT + PADDING;
        assert_eq!(layout.groups()[0].height(), height);
        assert_eq!(layout.offset("damage"), height + PADDING);
        assert_eq!(layout.offset("healing"), 0);
    }

    #[test]
    fn test_successive_groups_never_overlap() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        let mut previous: Option<(i32, i32)> = None;
        for (i, subject) in ["Ogre", "Orc", "Rat", "Bat"].iter().enumerate() {
            let events = (0..=i as u64).map(|n| damage("Bond of Death", subject, n)).collect();
            let y = layout.place(batch(events), &mut surface);
            let height = layout.groups().last().unwrap().height();
            if let Some((prev_y, prev_h)) = previous {
                assert!(y > prev_y + prev_h, "group {i} overlaps previous");
            }
            previous = Some((y, height));
        }
    }

    #[test]
    fn test_zero_padding_still_leaves_a_gap() {
        let settings = OverlaySettings {
            padding: 0,
            ..Default::default()
        };
        let mut layout = LayoutEngine::new(&settings, icons());
        let mut surface = RecordingSurface::default();

        let y1 = layout.place(batch(vec![damage("Bond of Death", "Ogre", 5)]), &mut surface);
        let h1 = layout.groups()[0].height();
        let y2 = layout.place(batch(vec![damage("Bond of Death", "Orc", 6)]), &mut surface);
        assert!(y2 > y1 + h1);
    }

    #[test]
    fn test_offset_saturates_instead_of_overflowing() {
        let settings = OverlaySettings {
            anchors: [("damage".to_string(), Anchor::new(960, i32::MAX - 10))].into(),
            ..Default::default()
        };
        let mut layout = LayoutEngine::new(&settings, icons());
        let mut surface = RecordingSurface::default();
        for subject in ["Ogre", "Orc", "Rat"] {
            layout.place(batch(vec![damage("Bond of Death", subject, 1)]), &mut surface);
        }
        let last = layout.groups().last().unwrap();
        assert_eq!(last.origin().1, i32::MAX);
    }

    #[test]
    fn test_totals_row_for_two_damage_events() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(
            batch(vec![
                damage("Bond of Death", "Ogre", 100),
                damage("Vampiric Curse", "Ogre", 250),
            ]),
            &mut surface,
        );

        let group = &layout.groups()[0];
        assert_eq!(group.total(), Some(350));
        assert_eq!(group.elements().len(), 4);
        let expected_height =
            LABEL_HEIGHT + 2 * ROW_HEIGHT + TOTALS_HEIGHT + 4 * PADDING;
        assert_eq!(group.height(), expected_height);

        let shown = surface.shown();
        let Shown::Totals { text, .. } = &shown[3].1 else {
            panic!("expected totals row, got {:?}", shown[3].1);
        };
        assert_eq!(text, "Ogre - Total Damage: 350");
    }

    #[test]
    fn test_single_damage_event_has_no_totals() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(batch(vec![damage("Bond of Death", "Ogre", 100)]), &mut surface);
        assert_eq!(layout.groups()[0].total(), None);
        assert!(!surface.shown().iter().any(|(_, s)| matches!(s, Shown::Totals { .. })));
    }

    #[test]
    fn test_missing_icon_skips_row_but_counts_damage() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(
            batch(vec![damage("Bond of Death", "Ogre", 100), damage("Unknown Spell", "Ogre", 50)]),
            &mut surface,
        );
        let group = &layout.groups()[0];
        // label + one row + totals
        assert_eq!(group.elements().len(), 3);
        assert_eq!(group.total(), Some(150));
    }

    #[test]
    fn test_every_element_is_animated() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(
            batch(vec![damage("Bond of Death", "Ogre", 1), damage("Bond of Death", "Ogre", 2)]),
            &mut surface,
        );
        let animated = surface.animated();
        assert_eq!(animated.len(), 4);
        let expected = Animation::from_settings(&OverlaySettings::default());
        assert!(animated.iter().all(|(_, a)| *a == expected));
    }

    #[test]
    fn test_unknown_category_uses_default_anchor() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        let event = Event::Special {
            spell: "Screaming Terror".into(),
            category: "mystery".into(),
            subject: "Orc".into(),
            message: "Orc was mezzed!".into(),
        };
        let y = layout.place(batch(vec![event]), &mut surface);
        assert_eq!(y, DEFAULT_ANCHOR.y);
        assert!(layout.offset("mystery") > 0);
    }

    #[test]
    fn test_group_removed_only_after_all_elements_hidden() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place_all(
            group_events(vec![
                damage("Bond of Death", "Ogre", 10),
                damage("Bond of Death", "Ogre", 20),
                damage("Vampiric Curse", "Ogre", 30),
            ]),
            &mut surface,
        );
        let ids: Vec<_> = layout.groups()[0].elements().iter().map(|e| e.id()).collect();
        // label + 3 rows + totals
        assert_eq!(ids.len(), 5);
        let offset_before = layout.offset("damage");

        for id in &ids[..ids.len() - 1] {
            assert!(layout.element_hidden(*id));
        }
        assert_eq!(layout.sweep(), 0);
        assert_eq!(layout.groups().len(), 1);

        assert!(layout.element_hidden(ids[ids.len() - 1]));
        assert_eq!(layout.sweep(), 1);
        assert!(layout.groups().is_empty());
        assert_eq!(layout.offset("damage"), offset_before);
    }

    #[test]
    fn test_hidden_reports_fire_once() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(batch(vec![damage("Bond of Death", "Ogre", 1)]), &mut surface);
        let id = layout.groups()[0].elements()[0].id();
        assert!(layout.element_hidden(id));
        assert!(!layout.element_hidden(id));
        assert!(!layout.element_hidden(ElementId(9_999)));
    }

    #[test]
    fn test_place_all_sweeps_finished_groups() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place_all(group_events(vec![damage("Bond of Death", "Ogre", 1)]), &mut surface);
        let ids: Vec<_> = layout.groups()[0].elements().iter().map(|e| e.id()).collect();
        for id in ids {
            layout.element_hidden(id);
        }
        layout.place_all(group_events(vec![damage("Bond of Death", "Rat", 2)]), &mut surface);
        assert_eq!(layout.groups().len(), 1);
        assert_eq!(layout.groups()[0].key().subject, "Rat");
    }

    #[test]
    fn test_apply_settings_keeps_offsets() {
        let mut layout = engine();
        let mut surface = RecordingSurface::default();
        layout.place(batch(vec![damage("Bond of Death", "Ogre", 1)]), &mut surface);
        let offset = layout.offset("damage");

        let mut settings = OverlaySettings::default();
        settings.padding = 2;
        layout.apply_settings(&settings, icons());
        assert_eq!(layout.offset("damage"), offset);
        assert_eq!(layout.groups().len(), 1);
    }
}
