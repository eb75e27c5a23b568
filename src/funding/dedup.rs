use std::collections::HashSet;
use crate::events::funding::{EventKey, FundingEvent};

/// Identity keys seen so far in one collection.
#[derive(Debug, Default)]
pub struct SeenKeys {
    keys: HashSet<EventKey>,
}

impl SeenKeys {
    pub fn new() -> Self {
        SeenKeys::default()
    }

    /// Returns `true` the first time an event's identity is offered.
    pub fn insert(&mut self, event: &FundingEvent) -> bool {
        self.keys.insert(event.key())
    }
}

/// Appends the unseen events of `page` to `into`, returning how many were dropped.
pub fn merge_page(seen: &mut SeenKeys, into: &mut Vec<FundingEvent>, page: Vec<FundingEvent>) -> usize {
    let mut dropped = 0;
    for event in page {
        if seen.insert(&event) {
            into.push(event);
        } else {
            dropped += 1;
        }
    }
    dropped
}
