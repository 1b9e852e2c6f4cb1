pub mod assets;
pub mod error;
pub mod events;
pub mod grouper;
pub mod layout;
pub mod log;
pub mod patterns;
pub mod service;
pub mod settings;
pub mod surface;

// Re-exports for convenience
pub use assets::{IconSet, verify_assets};
pub use error::{AssetError, ConfigError, EngineError, TailError};
pub use events::Event;
pub use grouper::{EventBatch, GroupKey, group_events};
pub use layout::{LayoutEngine, PlacedGroup};
pub use log::{LogTailer, LogWatcher, TailRead};
pub use patterns::{PatternTable, classify};
pub use service::{EngineCommand, EngineHandle, EngineSender, OverlayEngine, spawn_engine};
pub use surface::{Animation, ElementHandle, ElementId, PresentationSurface, RowStyle, TextStyle};
