//! Icon and font asset resolution
//!
//! Asset existence is checked once per settings snapshot, never on the
//! per-line path. At startup the CLI treats missing assets as fatal; at
//! runtime a spell without an icon simply has its rows skipped.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use spellfloat_types::OverlaySettings;

use crate::error::AssetError;

/// Spell name → icon path, holding only icons that exist
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    icons: HashMap<String, PathBuf>,
}

impl IconSet {
    /// Resolve every rule's icon, dropping (and logging) missing ones
    pub fn from_settings(settings: &OverlaySettings) -> Self {
        let mut icons = HashMap::new();
        for rule in &settings.rules {
            if rule.icon.is_file() {
                icons.insert(rule.name.clone(), rule.icon.clone());
            } else {
                tracing::warn!(
                    spell = %rule.name,
                    icon = %rule.icon.display(),
                    "icon not found, rows will be skipped"
                );
            }
        }
        Self { icons }
    }

    /// Build from known entries without touching the filesystem
    pub fn from_entries<I, N, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            icons: entries
                .into_iter()
                .map(|(name, path)| (name.into(), path.into()))
                .collect(),
        }
    }

    pub fn icon_for(&self, spell: &str) -> Option<&Path> {
        self.icons.get(spell).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Rules whose icon file does not exist, as (spell, path)
pub fn missing_icons(settings: &OverlaySettings) -> Vec<(String, PathBuf)> {
    settings
        .rules
        .iter()
        .filter(|rule| !rule.icon.is_file())
        .map(|rule| (rule.name.clone(), rule.icon.clone()))
        .collect()
}

/// Check that the font and every icon exist.
pub fn verify_assets(settings: &OverlaySettings) -> Result<(), AssetError> {
    if !settings.font_file.is_file() {
        return Err(AssetError::MissingFont(settings.font_file.clone()));
    }
    let missing = missing_icons(settings);
    if !missing.is_empty() {
        return Err(AssetError::MissingIcons(missing));
    }
    Ok(())
}
