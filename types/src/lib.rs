//! Shared settings types for spellfloat.
//!
//! Kept free of engine dependencies so the settings record can be read and
//! written by any front end.

pub mod color;
pub mod formatting;
pub mod settings;

pub use settings::{
    Anchor, CategoryStyle, DEFAULT_ANCHOR, OverlaySettings, SpellRule, default_rules,
};
