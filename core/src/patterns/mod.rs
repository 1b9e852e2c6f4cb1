//! Pattern matching over log lines
//!
//! - [`PatternTable`]: ordered, compiled spell rules
//! - [`classify`]: batch classification of lines into [`Event`](crate::events::Event)s

mod classifier;
mod table;

pub use classifier::classify;
pub use table::{PatternTable, RejectedRule};
