//! Floating-indicator compositor
//!
//! Implements the engine's presentation surface as a retained scene of
//! labels, icon rows and totals, animated on a dedicated render thread.

pub mod animation;
pub mod compositor;
pub mod metrics;
pub mod scene;
pub mod utils;

pub use compositor::{Compositor, FRAME_INTERVAL, RenderLoop, spawn_render_loop};
pub use scene::{DrawItem, ElementKind, IconBox, Scene};
