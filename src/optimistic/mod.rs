// src/optimistic/mod.rs
//! Local-first list mutations with rollback on remote failure.
//!
//! A mutation captures a snapshot of the target entity, applies the change
//! to the in-memory collection right away, then awaits the remote write.
//! Success keeps the optimistic value; failure puts the snapshot back and
//! emits a failure notification.

pub mod controller;
pub mod notifier;

pub use controller::MutationController;
pub use notifier::{ConsoleNotifier, Notification, NotificationLevel, Notifier, RecordingNotifier};

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// An element of a [`Collection`], keyed by a stable id.
pub trait Entity: Clone {
    fn id(&self) -> i64;
}

/// A partial set of field changes for `T`.
pub trait Patch<T> {
    /// Shallow copy of `target` carrying these changes
    fn apply_to(&self, target: &T) -> T;
}

/// Entities with a start/end pair that can be moved on a calendar.
pub trait Schedulable: Entity {
    fn time_range(&self) -> (DateTime<Utc>, DateTime<Utc>);
    fn with_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self;
}

impl Schedulable for crate::types::Interview {
    fn time_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_time, self.end_time)
    }

    fn with_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start_time: start,
            end_time: end,
            ..self.clone()
        }
    }
}

/// Pre-mutation copy of one element and where it sat.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub value: T,
    pub index: usize,
}

/// Ordered in-memory list of entities.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Entity> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Capture the current value and index of `id`
    pub fn snapshot(&self, id: i64) -> Option<Snapshot<T>> {
        let index = self.position(id)?;
        Some(Snapshot {
            value: self.items[index].clone(),
            index,
        })
    }

    /// Replace the element with the same id as `value`, wherever it is now.
    /// Returns false when no such element exists.
    pub fn replace(&mut self, value: T) -> bool {
        match self.position(value.id()) {
            Some(index) => {
                self.items[index] = value;
                true
            }
            None => false,
        }
    }

    /// Remove `id`, returning what was removed and from where
    pub fn remove(&mut self, id: i64) -> Option<Snapshot<T>> {
        let index = self.position(id)?;
        let value = self.items.remove(index);
        Some(Snapshot { value, index })
    }

    /// Reinsert a removed element at its recorded index, clamped to the
    /// current length. Returns the index actually used.
    pub fn reinsert(&mut self, snapshot: Snapshot<T>) -> usize {
        let index = snapshot.index.min(self.items.len());
        self.items.insert(index, snapshot.value);
        index
    }

    /// Swap in a freshly fetched list
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

impl<T: Entity> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

/// What a list edit is, for notification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Update,
    Status,
    Delete,
    Reschedule,
}

impl MutationKind {
    pub fn success_message(&self) -> &'static str {
        match self {
            MutationKind::Update => "Changes saved",
            MutationKind::Status => "Status updated",
            MutationKind::Delete => "Deleted",
            MutationKind::Reschedule => "Time updated",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::Update | MutationKind::Status => "Update failed, change reverted",
            MutationKind::Delete => "Delete failed, item restored",
            MutationKind::Reschedule => "Update failed, time restored",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Update => "update",
            MutationKind::Status => "status",
            MutationKind::Delete => "delete",
            MutationKind::Reschedule => "reschedule",
        };
        f.write_str(name)
    }
}

/// How a mutation settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Remote write accepted; the optimistic value is final
    Confirmed,
    /// Remote write rejected; the snapshot was put back
    RolledBack { reason: String },
}

impl MutationOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MutationOutcome::Confirmed)
    }
}

/// Local precondition failures. Nothing was applied, nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("entity {0} is not in the local collection")]
    NotFound(i64),
    #[error("entity {0} already has a change in flight")]
    InFlight(i64),
    #[error("invalid time range: end {end} is not after start {start}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
    }

    impl Entity for Row {
        fn id(&self) -> i64 {
            self.id
        }
    }

    fn rows(ids: &[i64]) -> Collection<Row> {
        ids.iter().map(|&id| Row { id }).collect::<Vec<_>>().into()
    }

    #[test]
    fn test_remove_then_reinsert_keeps_position() {
        let mut collection = rows(&[1, 2, 3]);
        let snapshot = collection.remove(2).unwrap();
        assert_eq!(snapshot.index, 1);
        assert_eq!(collection.len(), 2);

        assert_eq!(collection.reinsert(snapshot), 1);
        assert_eq!(collection, rows(&[1, 2, 3]));
    }

    #[test]
    fn test_reinsert_clamps_to_length() {
        let mut collection = rows(&[1, 2, 3]);
        let snapshot = collection.remove(3).unwrap();
        collection.remove(1);
        collection.remove(2);

        assert_eq!(collection.reinsert(snapshot), 0);
        assert_eq!(collection, rows(&[3]));
    }

    #[test]
    fn test_replace_by_id_after_reorder() {
        let mut collection = rows(&[1, 2, 3]);
        collection.remove(1);
        assert!(collection.replace(Row { id: 3 }));
        assert!(!collection.replace(Row { id: 9 }));
        assert_eq!(collection.position(3), Some(1));
    }
}
