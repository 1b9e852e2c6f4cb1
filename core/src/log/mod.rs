//! Log file access
//!
//! - [`LogTailer`]: cursor-based reader of appended lines
//! - [`LogWatcher`]: directory-scoped change notifications for one file

mod tailer;
mod watcher;

pub use tailer::{LogTailer, MAX_READ_BYTES, TailRead};
pub use watcher::LogWatcher;
