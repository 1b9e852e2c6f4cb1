//! Compositor surface and render loop
//!
//! [`Compositor`] is the engine-facing [`PresentationSurface`]: it measures
//! and adds elements to a shared [`Scene`]. The render loop runs on its own
//! thread, ticks the scene at roughly 60 Hz, hands each frame's draw list to
//! a callback and reports finished elements back into the engine queue.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use spellfloat_core::{
    Animation, ElementHandle, ElementId, EngineCommand, EngineSender, PresentationSurface,
    RowStyle, TextStyle,
};
use spellfloat_types::Anchor;

use crate::metrics;
use crate::scene::{DrawItem, ElementKind, ElementSpec, IconBox, Scene};
use crate::utils::resolve_color;

/// Time between render ticks
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Shared handle to the scene. Clones refer to the same scene.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    scene: Arc<Mutex<Scene>>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the scene. A panic on another thread does not make it unusable.
    pub fn scene(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add_text(
        &mut self,
        kind: ElementKind,
        text: &str,
        x: i32,
        y: i32,
        style: &TextStyle,
    ) -> ElementHandle {
        let height = metrics::label_height(style);
        let id = self.scene().add(ElementSpec {
            kind,
            text: text.to_string(),
            x,
            y,
            width: metrics::text_width(text, style.font_size),
            height,
            font_size: style.font_size,
            color: resolve_color(&style.color),
        });
        ElementHandle::new(id, height)
    }
}

impl PresentationSurface for Compositor {
    fn show_subject_label(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        style: &TextStyle,
    ) -> ElementHandle {
        self.add_text(ElementKind::Label, text, x, y, style)
    }

    fn show_event_row(
        &mut self,
        icon: &Path,
        text: &str,
        x: i32,
        y: i32,
        style: &RowStyle,
    ) -> ElementHandle {
        let height = metrics::row_height(style);
        let id = self.scene().add(ElementSpec {
            kind: ElementKind::Row(IconBox {
                path: icon.to_path_buf(),
                width: style.icon_width,
                height: style.icon_height,
            }),
            text: text.to_string(),
            x,
            y,
            width: metrics::row_width(text, style),
            height,
            font_size: style.text.font_size,
            color: resolve_color(&style.text.color),
        });
        ElementHandle::new(id, height)
    }

    fn show_totals_row(&mut self, text: &str, x: i32, y: i32, style: &TextStyle) -> ElementHandle {
        self.add_text(ElementKind::Totals, text, x, y, style)
    }

    fn start_animation(&mut self, id: ElementId, animation: Animation) {
        self.scene().start_animation(id, animation, Instant::now());
    }

    fn set_anchor_markers(&mut self, markers: &[(String, Anchor)]) {
        self.scene().set_markers(markers);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render loop
// ─────────────────────────────────────────────────────────────────────────────

/// Running render thread. Stopped explicitly or on drop.
pub struct RenderLoop {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    /// Signal the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("render thread panicked");
            }
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Tick `compositor`'s scene until stopped.
///
/// Hidden elements are sent to `events`; the loop exits early if the engine
/// queue is closed. `on_frame` receives every frame's draw list.
pub fn spawn_render_loop<F>(
    compositor: Compositor,
    events: EngineSender,
    mut on_frame: F,
) -> RenderLoop
where
    F: FnMut(&[DrawItem]) + Send + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = stop.clone();

    let handle = thread::spawn(move || {
        tracing::debug!("render loop started");
        while !thread_stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            let (hidden, items) = {
                let mut scene = compositor.scene();
                let hidden = scene.tick(now);
                (hidden, scene.draw_list(now))
            };

            for id in hidden {
                if events.send(EngineCommand::ElementHidden(id)).is_err() {
                    tracing::debug!("engine queue closed, stopping render loop");
                    return;
                }
            }

            on_frame(&items);
            thread::sleep(FRAME_INTERVAL);
        }
        tracing::debug!("render loop stopped");
    });

    RenderLoop {
        stop,
        handle: Some(handle),
    }
}
