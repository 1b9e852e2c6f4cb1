//! Event grouping
//!
//! Events arriving in one classification batch are bucketed by
//! (category, subject). Each bucket becomes one visually co-located group.

use std::collections::HashMap;

use crate::events::Event;

/// Identity of a group: which column and which actor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub category: String,
    pub subject: String,
}

impl GroupKey {
    pub fn of(event: &Event) -> Self {
        Self {
            category: event.category().to_string(),
            subject: event.subject().to_string(),
        }
    }
}

/// Events sharing a key, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBatch {
    pub key: GroupKey,
    pub events: Vec<Event>,
}

impl EventBatch {
    pub fn damage_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_damage()).count()
    }

    /// Summed damage, only when the batch holds two or more damage events
    pub fn total_damage(&self) -> Option<u64> {
        if self.damage_count() < 2 {
            return None;
        }
        Some(
            self.events
                .iter()
                .filter_map(Event::amount)
                .fold(0u64, u64::saturating_add),
        )
    }
}

/// Bucket events by (category, subject).
///
/// Buckets come out in order of their first event; events keep their
/// arrival order inside each bucket.
pub fn group_events(events: Vec<Event>) -> Vec<EventBatch> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut batches: Vec<EventBatch> = Vec::new();

    for event in events {
        let key = GroupKey::of(&event);
        match index.get(&key) {
            Some(&i) => batches[i].events.push(event),
            None => {
                index.insert(key.clone(), batches.len());
                batches.push(EventBatch {
                    key,
                    events: vec![event],
                });
            }
        }
    }

    batches
}
