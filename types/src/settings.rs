//! Overlay settings record
//!
//! One immutable snapshot of everything the engine needs: the ordered rule
//! list, per-category anchors and styles, and the animation scalars. The
//! record serializes to the JSON settings file; every field has a default so
//! partial files load cleanly. Key names written by older releases
//! (`log_file_path`, `spells`, `start_positions`, ...) are accepted as aliases.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Category assigned to rules that do not name one
pub const DEFAULT_CATEGORY: &str = "damage";

/// Anchor used for categories that have no configured position
pub const DEFAULT_ANCHOR: Anchor = Anchor { x: 960, y: 100 };

pub const OPACITY_MIN: f32 = 0.1;
pub const OPACITY_MAX: f32 = 1.0;

/// Smallest gap kept between stacked elements and groups
pub const PADDING_MIN: i32 = 1;

// ─────────────────────────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────────────────────────

/// A trackable spell: how to recognise it in the log and where it is shown.
///
/// Rules without a `message_template` are damage rules (subject + amount
/// captures); rules with one are special rules (optional subject capture).
/// Older settings files name the fields `spell_name`, `icon_path` and
/// `regex_pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellRule {
    #[serde(alias = "spell_name")]
    pub name: String,
    #[serde(default, alias = "icon_path")]
    pub icon: PathBuf,
    #[serde(alias = "regex_pattern")]
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_template: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl SpellRule {
    pub fn damage(name: &str, icon: &str, pattern: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: PathBuf::from(icon),
            pattern: pattern.to_string(),
            message_template: None,
            category: category.to_string(),
        }
    }

    pub fn special(name: &str, icon: &str, pattern: &str, template: &str, category: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: PathBuf::from(icon),
            pattern: pattern.to_string(),
            message_template: Some(template.to_string()),
            category: category.to_string(),
        }
    }

    /// True for rules that produce a message instead of a damage amount
    pub fn is_special(&self) -> bool {
        self.message_template.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout / appearance
// ─────────────────────────────────────────────────────────────────────────────

/// Screen position a category's column hangs from.
///
/// Reads either `{"x": .., "y": ..}` or an `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AnchorRepr")]
pub struct Anchor {
    pub x: i32,
    pub y: i32,
}

impl Anchor {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnchorRepr {
    Point { x: i32, y: i32 },
    Pair(i32, i32),
}

impl From<AnchorRepr> for Anchor {
    fn from(repr: AnchorRepr) -> Self {
        match repr {
            AnchorRepr::Point { x, y } | AnchorRepr::Pair(x, y) => Anchor::new(x, y),
        }
    }
}

/// Per-category visual parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryStyle {
    pub icon_width: u32,
    pub icon_height: u32,
    pub font_size: u32,
    pub text_color: String,
    #[serde(alias = "monster_name_font_size")]
    pub subject_font_size: u32,
    #[serde(alias = "monster_name_text_color")]
    pub subject_color: String,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            icon_width: 64,
            icon_height: 64,
            font_size: 20,
            text_color: "white".to_string(),
            subject_font_size: 24,
            subject_color: "white".to_string(),
        }
    }
}

impl CategoryStyle {
    fn with_text_color(color: &str) -> Self {
        Self {
            text_color: color.to_string(),
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings record
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Game log to tail
    #[serde(alias = "log_file_path")]
    pub log_file: PathBuf,
    /// Ordered rule list; every rule is tested against every line
    #[serde(alias = "spells")]
    pub rules: Vec<SpellRule>,
    #[serde(alias = "start_positions")]
    pub anchors: BTreeMap<String, Anchor>,
    #[serde(alias = "spell_categories")]
    pub categories: BTreeMap<String, CategoryStyle>,
    /// Float/fade duration in milliseconds
    #[serde(alias = "animation_duration")]
    pub animation_ms: u64,
    /// Pixels an element drifts down over its lifetime
    pub float_distance: i32,
    /// Gap between stacked elements and between groups
    pub padding: i32,
    /// Totals font size as a fraction of the category font size
    #[serde(alias = "total_font_ratio")]
    pub totals_font_ratio: f32,
    #[serde(alias = "total_color")]
    pub totals_color: String,
    /// Starting opacity of every element (0.1 to 1.0)
    pub opacity: f32,
    pub font_file: PathBuf,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        let anchors = BTreeMap::from([
            ("damage".to_string(), Anchor::new(960, 100)),
            ("crowd_control".to_string(), Anchor::new(960, 300)),
            ("healing".to_string(), Anchor::new(960, 500)),
        ]);
        let categories = BTreeMap::from([
            ("damage".to_string(), CategoryStyle::with_text_color("blue")),
            ("crowd_control".to_string(), CategoryStyle::with_text_color("green")),
            ("healing".to_string(), CategoryStyle::with_text_color("yellow")),
        ]);

        Self {
            log_file: PathBuf::from("log.txt"),
            rules: default_rules(),
            anchors,
            categories,
            animation_ms: 4000,
            float_distance: 150,
            padding: 10,
            totals_font_ratio: 0.5,
            totals_color: "red".to_string(),
            opacity: 1.0,
            font_file: PathBuf::from("resources/fonts/PressStart2P-Regular.ttf"),
        }
    }
}

const SUBJECT_WORDS: &str = r"(\w+(?:\s+\w+)*)";

fn damage_pattern(spell: &str) -> String {
    format!(r"{SUBJECT_WORDS} has taken (\d+) damage from your {spell}\.")
}

/// Built-in rules shipped with a fresh settings file
pub fn default_rules() -> Vec<SpellRule> {
    vec![
        SpellRule::damage(
            "Dooming Darkness",
            "resources/icons/doom_darkness.png",
            &damage_pattern("Dooming Darkness"),
            "damage",
        ),
        SpellRule::damage(
            "Cascading Darkness",
            "resources/icons/cascading_darkness.png",
            &damage_pattern("Cascading Darkness"),
            "damage",
        ),
        SpellRule::special(
            "Spirit of Wolf",
            "resources/icons/spirit_wolf.png",
            r"You feel the spirit of wolf enter you\.",
            "Spirit of the wolf",
            "healing",
        ),
        SpellRule::damage(
            "Vampiric Curse",
            "resources/icons/vamp_curse.png",
            &damage_pattern("Vampiric Curse"),
            "damage",
        ),
        SpellRule::damage(
            "Invoke Fear",
            "resources/icons/invoke_fear.png",
            &damage_pattern("Invoke Fear"),
            "crowd_control",
        ),
        SpellRule::damage(
            "Envenomed Bolt",
            "resources/icons/envenomed_bolt.png",
            &damage_pattern("Envenomed Bolt"),
            "damage",
        ),
        SpellRule::damage(
            "Bond of Death",
            "resources/icons/bond_of_death.png",
            &damage_pattern("Bond of Death"),
            "damage",
        ),
        SpellRule::special(
            "Screaming Terror",
            "resources/icons/screaming_terror.png",
            &format!(r"{SUBJECT_WORDS} begins to scream\.\s*"),
            "{subject} was mezzed!",
            "crowd_control",
        ),
    ]
}

impl OverlaySettings {
    /// Clamp scalars into their valid ranges
    pub fn sanitize(&mut self) {
        if !self.opacity.is_finite() {
            self.opacity = OPACITY_MAX;
        }
        self.opacity = self.opacity.clamp(OPACITY_MIN, OPACITY_MAX);
        if !self.totals_font_ratio.is_finite() || self.totals_font_ratio <= 0.0 {
            self.totals_font_ratio = 0.5;
        }
        self.padding = self.padding.max(PADDING_MIN);
    }

    /// Make relative paths absolute against `base` (usually the settings
    /// file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        resolve(&mut self.log_file, base);
        resolve(&mut self.font_file, base);
        for rule in &mut self.rules {
            if !rule.icon.as_os_str().is_empty() {
                resolve(&mut rule.icon, base);
            }
        }
    }
}

fn resolve(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}
