//! Serialized engine context
//!
//! All engine state (tail cursor, pattern table, offsets, live groups) is
//! owned by a single task and mutated only in response to commands arriving
//! on one queue. The file watcher and the surface's render loop only ever
//! send commands; nothing else touches engine state.

use std::ops::ControlFlow;

use spellfloat_types::OverlaySettings;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::assets::IconSet;
use crate::error::EngineError;
use crate::grouper::group_events;
use crate::layout::LayoutEngine;
use crate::log::{LogTailer, LogWatcher};
use crate::patterns::{PatternTable, classify};
use crate::surface::{ElementId, PresentationSurface};

/// Work items for the engine task
#[derive(Debug)]
pub enum EngineCommand {
    /// The tailed file changed on disk
    LogChanged,
    /// An element finished fading out (sent once per element)
    ElementHidden(ElementId),
    /// A new settings snapshot from the editor
    Reload(Box<OverlaySettings>),
    Shutdown,
}

pub type EngineSender = mpsc::UnboundedSender<EngineCommand>;
pub type EngineReceiver = mpsc::UnboundedReceiver<EngineCommand>;

/// Tailer + classifier + grouper + layout, driving one surface.
pub struct OverlayEngine<S> {
    table: PatternTable,
    tailer: LogTailer,
    layout: LayoutEngine,
    surface: S,
    /// Used to schedule another read when one poll could not drain the file
    requeue: EngineSender,
}

impl<S: PresentationSurface> OverlayEngine<S> {
    /// Open the log and build the engine.
    ///
    /// Fails only when the log file cannot be opened.
    pub fn new(
        settings: &OverlaySettings,
        mut surface: S,
        requeue: EngineSender,
    ) -> Result<Self, EngineError> {
        let tailer = LogTailer::open(&settings.log_file)?;
        let table = PatternTable::new(&settings.rules);
        let layout = LayoutEngine::new(settings, IconSet::from_settings(settings));
        surface.set_anchor_markers(&layout.anchor_markers());

        Ok(Self {
            table,
            tailer,
            layout,
            surface,
            requeue,
        })
    }

    /// Apply one command. Breaks on shutdown.
    pub fn handle(&mut self, command: EngineCommand) -> ControlFlow<()> {
        match command {
            EngineCommand::LogChanged => self.poll_log(),
            EngineCommand::ElementHidden(id) => {
                self.layout.element_hidden(id);
            }
            EngineCommand::Reload(settings) => self.reload(&settings),
            EngineCommand::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Classify, group and place a batch of lines. Returns groups placed.
    pub fn process_lines(&mut self, lines: &[String]) -> usize {
        if lines.is_empty() {
            return 0;
        }
        let events = classify(&self.table, lines);
        if events.is_empty() {
            tracing::trace!(lines = lines.len(), "no matching lines");
            return 0;
        }

        let batches = group_events(events);
        let count = batches.len();
        self.layout.place_all(batches, &mut self.surface);
        count
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn tailer(&self) -> &LogTailer {
        &self.tailer
    }

    fn poll_log(&mut self) {
        match self.tailer.read_new_lines() {
            Ok(read) => {
                if read.more_pending {
                    let _ = self.requeue.send(EngineCommand::LogChanged);
                }
                self.process_lines(&read.lines);
            }
            Err(e) => tracing::warn!(error = %e, "failed to read new log lines"),
        }
    }

    fn reload(&mut self, settings: &OverlaySettings) {
        if settings.log_file != self.tailer.path() {
            tracing::warn!(
                current = %self.tailer.path().display(),
                requested = %settings.log_file.display(),
                "log file changes take effect after restart"
            );
        }
        self.table = PatternTable::new(&settings.rules);
        self.layout
            .apply_settings(settings, IconSet::from_settings(settings));
        self.surface.set_anchor_markers(&self.layout.anchor_markers());
        tracing::info!(rules = self.table.len(), "settings reloaded");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Spawned engine
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a running engine task
pub struct EngineHandle {
    tx: EngineSender,
    task: JoinHandle<()>,
}

impl EngineHandle {
    pub fn sender(&self) -> EngineSender {
        self.tx.clone()
    }

    /// Stop the engine and wait for it to release the watch and the file.
    pub async fn shutdown(self) {
        let _ = self.tx.send(EngineCommand::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "engine task ended abnormally");
        }
    }
}

/// Start the engine on the current tokio runtime.
///
/// `make_surface` receives a sender so the surface can report hidden
/// elements back into the engine queue.
pub fn spawn_engine<S, F>(
    settings: &OverlaySettings,
    make_surface: F,
) -> Result<EngineHandle, EngineError>
where
    S: PresentationSurface + Send + 'static,
    F: FnOnce(EngineSender) -> S,
{
    let (tx, mut rx): (EngineSender, EngineReceiver) = mpsc::unbounded_channel();

    let surface = make_surface(tx.clone());
    let mut engine = OverlayEngine::new(settings, surface, tx.clone())?;

    let watch_tx = tx.clone();
    let watcher = LogWatcher::new(engine.tailer().path(), move || {
        let _ = watch_tx.send(EngineCommand::LogChanged);
    })?;

    let task = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            if engine.handle(command).is_break() {
                break;
            }
        }
        drop(watcher);
        drop(engine);
        tracing::info!("overlay engine stopped");
    });

    Ok(EngineHandle { tx, task })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TailError;
    use crate::log::MAX_READ_BYTES;
    use crate::surface::testing::{RecordingSurface, Shown};
    use std::io::Write;
    use std::path::Path;

    /// Settings rooted in `dir`, with every default icon present
    fn settings_in(dir: &Path) -> OverlaySettings {
        let mut settings = OverlaySettings::default();
        settings.resolve_paths(dir);
        for rule in &settings.rules {
            std::fs::create_dir_all(rule.icon.parent().unwrap()).unwrap();
            std::fs::write(&rule.icon, b"png").unwrap();
        }
        std::fs::write(&settings.log_file, "old history line\n").unwrap();
        settings
    }

    fn append(path: &Path, text: &str) {
        let mut f = std::fs::OpenOptions::new().append(true).open(path).unwrap();
        f.write_all(text.as_bytes()).unwrap();
    }

    fn engine_in(
        dir: &Path,
    ) -> (OverlayEngine<RecordingSurface>, RecordingSurface, EngineReceiver) {
        let settings = settings_in(dir);
        let surface = RecordingSurface::default();
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = OverlayEngine::new(&settings, surface.clone(), tx).unwrap();
        (engine, surface, rx)
    }

    #[test]
    fn test_missing_log_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let mut settings = OverlaySettings::default();
        settings.resolve_paths(tmp.path());
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = OverlayEngine::new(&settings, RecordingSurface::default(), tx);
        assert!(matches!(result, Err(EngineError::Tail(TailError::NotFound(_)))));
    }

    #[test]
    fn test_anchor_markers_set_on_start() {
        let tmp = tempfile::tempdir().unwrap();
        let (_engine, surface, _rx) = engine_in(tmp.path());
        let markers = surface.record.lock().unwrap().markers.clone();
        let names: Vec<_> = markers.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, ["crowd_control", "damage", "healing"]);
    }

    #[test]
    fn test_log_change_places_groups() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut engine, surface, _rx) = engine_in(tmp.path());
        let log = tmp.path().join("log.txt");

        append(
            &log,
            "Ogre has taken 100 damage from your Bond of Death.\n\
             Ogre has taken 250 damage from your Vampiric Curse.\n\
             Orc begins to scream.\n",
        );
        assert!(engine.handle(EngineCommand::LogChanged).is_continue());

        let groups = engine.layout().groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key().subject, "Ogre");
        assert_eq!(groups[0].total(), Some(350));
        assert_eq!(groups[1].key().category, "crowd_control");

        let shown = surface.shown();
        assert!(shown.iter().any(|(_, s)| matches!(
            s,
            Shown::Row { text, .. } if text == "Orc was mezzed!"
        )));
        // history line never replayed
        assert!(!shown.iter().any(|(_, s)| matches!(
            s,
            Shown::Label { text, .. } if text.contains("history")
        )));
    }

    #[test]
    fn test_removal_keeps_category_offset() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut engine, _surface, _rx) = engine_in(tmp.path());
        let log = tmp.path().join("log.txt");

        append(
            &log,
            "Ogre has taken 10 damage from your Bond of Death.\n\
             Ogre has taken 20 damage from your Bond of Death.\n\
             Ogre has taken 30 damage from your Envenomed Bolt.\n",
        );
        let _ = engine.handle(EngineCommand::LogChanged);
        let offset = engine.layout().offset("damage");
        let ids: Vec<_> = engine.layout().groups()[0]
            .elements()
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids.len(), 5);

        for id in ids {
            let _ = engine.handle(EngineCommand::ElementHidden(id));
        }
        append(&log, "Rat has taken 1 damage from your Bond of Death.\n");
        let _ = engine.handle(EngineCommand::LogChanged);

        let groups = engine.layout().groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key().subject, "Rat");
        assert_eq!(groups[0].origin().1, 100 + offset);
    }

    #[test]
    fn test_oversized_append_requeues_until_drained() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut engine, surface, mut rx) = engine_in(tmp.path());
        let log = tmp.path().join("log.txt");

        let line = "Rat has taken 7 damage from your Bond of Death.\n";
        let count = MAX_READ_BYTES as usize / line.len() + 100;
        append(&log, &line.repeat(count));

        let _ = engine.handle(EngineCommand::LogChanged);
        assert!(matches!(rx.try_recv(), Ok(EngineCommand::LogChanged)));

        while let Ok(command) = rx.try_recv() {
            let _ = engine.handle(command);
        }
        // One more read in case the last one ended exactly at the limit
        let _ = engine.handle(EngineCommand::LogChanged);
        while let Ok(command) = rx.try_recv() {
            let _ = engine.handle(command);
        }

        let rows = surface
            .shown()
            .iter()
            .filter(|(_, s)| matches!(s, Shown::Row { .. }))
            .count();
        assert_eq!(rows, count);
        assert_eq!(engine.tailer().offset(), (line.len() * count + 17) as u64);
    }

    #[test]
    fn test_reload_swaps_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut engine, _surface, _rx) = engine_in(tmp.path());
        assert_eq!(engine.table().len(), 8);

        let mut settings = settings_in(tmp.path());
        settings.rules.truncate(1);
        let _ = engine.handle(EngineCommand::Reload(Box::new(settings)));
        assert_eq!(engine.table().len(), 1);
        assert_eq!(engine.process_lines(&["Orc begins to scream.".to_string()]), 0);
    }

    #[test]
    fn test_shutdown_breaks() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut engine, _surface, _rx) = engine_in(tmp.path());
        assert!(engine.handle(EngineCommand::Shutdown).is_break());
    }

    #[tokio::test]
    async fn test_spawned_engine_processes_queue() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings_in(tmp.path());
        let surface = RecordingSurface::default();
        let observer = surface.clone();

        let handle = spawn_engine(&settings, move |_tx| surface).unwrap();
        append(
            &settings.log_file,
            "Goblin has taken 120 damage from your Dooming Darkness.\n",
        );
        handle.sender().send(EngineCommand::LogChanged).unwrap();
        handle.shutdown().await;

        let shown = observer.shown();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].1, Shown::Label { text: "Goblin".into(), x: 960, y: 100 });
    }
}
