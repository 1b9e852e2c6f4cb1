//! Line classification
//!
//! Stateless pass of the pattern table over a batch of lines. Output order
//! follows input order: every event from line `i` precedes those of line
//! `i + 1`, and within a line events follow rule order.

use super::PatternTable;
use crate::events::Event;

/// Classify a batch of lines into events.
pub fn classify<I, S>(table: &PatternTable, lines: I) -> Vec<Event>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut events = Vec::new();
    for line in lines {
        table.match_line_into(line.as_ref(), &mut events);
    }
    events
}
