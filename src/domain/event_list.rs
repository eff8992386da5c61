//! Newest-first display list.
//!
//! [`EventList`] is an immutable snapshot behind an [`Arc`]. The only
//! mutation is whole-list replacement: [`EventList::prepend`] builds a new
//! list and leaves the old one untouched, so a renderer holding a snapshot
//! never observes a partial update and can detect change by reference.
//!
//! Events themselves are shared between snapshots; a prepend copies one
//! pointer per retained event, never the event payloads.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::Event;

/// Ordered sequence of [`Event`]s, newest first.
#[derive(Debug, Clone, Default)]
pub struct EventList {
    events: Arc<Vec<Arc<Event>>>,
}

impl EventList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new list equal to `[event] ++ self`.
    ///
    /// With `max_events` set, the oldest events are dropped so the result
    /// holds at most that many entries. `Some(0)` is treated as unbounded.
    #[must_use]
    pub fn prepend(&self, event: Event, max_events: Option<usize>) -> Self {
        let keep = match max_events {
            Some(max) if max > 0 => max.saturating_sub(1).min(self.events.len()),
            _ => self.events.len(),
        };
        let mut events = Vec::with_capacity(keep + 1);
        events.push(Arc::new(event));
        events.extend(self.events.iter().take(keep).map(Arc::clone));
        Self {
            events: Arc::new(events),
        }
    }

    /// Number of events in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no event has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Most recently received event.
    #[must_use]
    pub fn newest(&self) -> Option<&Event> {
        self.events.first().map(Arc::as_ref)
    }

    /// Event at `index`, counting from the newest.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index).map(Arc::as_ref)
    }

    /// Iterates newest to oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.events.iter(),
        }
    }

    /// Returns `true` if both snapshots are the same list instance.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.events, &other.events)
    }
}

impl PartialEq for EventList {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other) || self.iter().eq(other.iter())
    }
}

impl Eq for EventList {}

impl Serialize for EventList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Iterator over an [`EventList`], newest to oldest.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, Arc<Event>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Arc::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Arc::as_ref)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a Event;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
