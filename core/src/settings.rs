//! Settings file loading and saving
//!
//! Settings live in one JSON document. Loading never fails: a missing file
//! means defaults, an unreadable or invalid one means defaults plus a
//! warning. Saving reports failures to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use spellfloat_types::OverlaySettings;

use crate::error::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "config.json";

/// `<config dir>/spellfloat/config.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("spellfloat").join(SETTINGS_FILE_NAME))
}

/// Read and parse a settings file as-is.
pub fn load(path: &Path) -> Result<OverlaySettings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load settings, falling back to defaults.
///
/// The result is sanitized and its relative paths are resolved against the
/// settings file's directory.
pub fn load_or_default(path: &Path) -> OverlaySettings {
    let mut settings = if !path.exists() {
        tracing::info!(path = %path.display(), "settings file not found, using defaults");
        OverlaySettings::default()
    } else {
        match load(path) {
            Ok(settings) => {
                tracing::info!(path = %path.display(), "settings loaded");
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings, using defaults");
                OverlaySettings::default()
            }
        }
    };

    settings.sanitize();
    if let Some(base) = path.parent() {
        settings.resolve_paths(base);
    }
    settings
}

/// Write settings as pretty JSON, creating parent directories.
pub fn save(path: &Path, settings: &OverlaySettings) -> Result<(), ConfigError> {
    let contents = serde_json::to_string_pretty(settings).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), "settings saved");
    Ok(())
}
