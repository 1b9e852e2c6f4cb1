//! Change notifications for the tailed file
//!
//! Watches the file's parent directory (non-recursive) and forwards only
//! create/modify events for the exact target path. The callback runs on
//! the notify thread and should do nothing but enqueue work.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Keeps the directory watch alive; dropping it stops notifications.
pub struct LogWatcher {
    _watcher: RecommendedWatcher,
}

impl LogWatcher {
    pub fn new<F>(target: &Path, on_change: F) -> notify::Result<Self>
    where
        F: Fn() + Send + 'static,
    {
        let target = std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf());
        let canonical = target.canonicalize().unwrap_or_else(|_| target.clone());
        let dir = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        tracing::info!(dir = %dir.display(), file = %target.display(), "watching log directory");

        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => {
                    if is_target_event(&event, &target, &canonical) {
                        on_change();
                    }
                }
                Err(e) => tracing::warn!(error = %e, "log watcher error"),
            }
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self { _watcher: watcher })
    }
}

/// True for create/modify events that touch `target`
pub(crate) fn is_target_event(event: &Event, target: &Path, canonical: &Path) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        path == target
            || path == canonical
            || path.canonicalize().is_ok_and(|p| p == canonical)
    })
}
