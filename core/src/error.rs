//! Error types for the engine
//!
//! Fatal startup failures (missing log file, missing assets) and recoverable
//! configuration IO are kept in separate enums so callers can decide which
//! ones end the process.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error accessing {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors from the log tailer
#[derive(Debug, Error)]
pub enum TailError {
    #[error("log file {0:?} not found")]
    NotFound(PathBuf),
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Required assets that are missing on disk
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("font file {0:?} is missing")]
    MissingFont(PathBuf),
    #[error("{} icon file(s) are missing: {}", .0.len(), format_missing(.0))]
    MissingIcons(Vec<(String, PathBuf)>),
}

fn format_missing(missing: &[(String, PathBuf)]) -> String {
    missing
        .iter()
        .map(|(spell, path)| format!("{spell} ({})", path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that stop the engine from starting
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Tail(#[from] TailError),
    #[error("failed to watch log directory: {0}")]
    Watch(#[from] notify::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_icons_message_lists_spells() {
        let err = AssetError::MissingIcons(vec![
            ("Bond of Death".to_string(), PathBuf::from("icons/bod.png")),
            ("Invoke Fear".to_string(), PathBuf::from("icons/fear.png")),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 icon file(s) are missing"));
        assert!(msg.contains("Bond of Death (icons/bod.png)"));
        assert!(msg.contains("Invoke Fear (icons/fear.png)"));
    }
}
