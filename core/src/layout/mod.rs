//! Indicator layout
//!
//! [`LayoutEngine`] owns the per-category offset table and the list of live
//! groups; [`PlacedGroup`] tracks one group's element handles until they
//! have all faded out.

mod engine;
mod group;

pub use engine::LayoutEngine;
pub use group::PlacedGroup;
