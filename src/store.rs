//! Bounded, newest-first event list.
//!
//! The store is owned by exactly one session task; every mutation happens on
//! that task, so it needs no locking. Entries are kept in display order
//! (index 0 is the newest) and never exceed `capacity`.
//!
//! Identities are unique inside the store. A pushed event whose id is
//! already present replaces the older entry at the front, and the
//! acknowledged flag is carried over so acknowledgment never reverts.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashSet, VecDeque};

use wire::Event;

/// Number of events the dashboard retains.
pub const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Clone)]
pub struct EventStore {
    events: VecDeque<Event>,
    capacity: usize,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventStore {
    /// An empty store that retains at most `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { events: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)), capacity }
    }

    /// Replace the whole list with `events`, keeping their order.
    ///
    /// Later duplicates of an id are dropped and the result is truncated to
    /// capacity.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        let mut seen = HashSet::with_capacity(events.len());
        self.events = events
            .into_iter()
            .filter(|event| seen.insert(event.id.clone()))
            .take(self.capacity)
            .collect();
    }

    /// Insert `event` as the newest entry and return whatever fell off the end.
    pub fn prepend(&mut self, mut event: Event) -> Option<Event> {
        if let Some(index) = self.position(&event.id) {
            if let Some(previous) = self.events.remove(index) {
                event.acknowledged |= previous.acknowledged;
            }
        }
        self.events.push_front(event);
        if self.events.len() > self.capacity {
            return self.events.pop_back();
        }
        None
    }

    /// Flag the event with `id` as acknowledged.
    ///
    /// Returns `true` only when the flag actually changed.
    pub fn mark_acknowledged(&mut self, id: &str) -> bool {
        match self.events.iter_mut().find(|event| event.id == id) {
            Some(event) if !event.acknowledged => {
                event.acknowledged = true;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Events newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|event| event.id == id)
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = std::collections::vec_deque::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
