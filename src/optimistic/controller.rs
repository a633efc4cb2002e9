// src/optimistic/controller.rs
//! Optimistic mutation controller over a shared [`Collection`].

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use super::{
    Collection, Entity, MutationError, MutationKind, MutationOutcome, Notification, Notifier,
    Patch, Schedulable, Snapshot,
};

const CANCELLED_REASON: &str = "mutation dropped before the remote call settled";

pub struct MutationController<T> {
    collection: Arc<Mutex<Collection<T>>>,
    in_flight: Arc<Mutex<HashSet<i64>>>,
    notifier: Arc<dyn Notifier>,
    timeout: Option<Duration>,
}

impl<T> Clone for MutationController<T> {
    fn clone(&self) -> Self {
        Self {
            collection: Arc::clone(&self.collection),
            in_flight: Arc::clone(&self.in_flight),
            notifier: Arc::clone(&self.notifier),
            timeout: self.timeout,
        }
    }
}

fn lock_collection<T>(collection: &Mutex<Collection<T>>) -> MutexGuard<'_, Collection<T>> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How a failed mutation puts its snapshot back.
#[derive(Debug, Clone, Copy)]
enum Undo {
    /// Overwrite by id, wherever the entity sits now
    Replace,
    /// Reinsert at the recorded index, clamped
    Reinsert,
}

/// An applied, unsettled mutation. Holds the per-id slot and the snapshot.
///
/// Settling consumes the snapshot. If the owning future is dropped first,
/// `Drop` rolls back and sends the failure notification, so the list never
/// keeps an unconfirmed value.
struct Pending<T: Entity> {
    collection: Arc<Mutex<Collection<T>>>,
    in_flight: Arc<Mutex<HashSet<i64>>>,
    notifier: Arc<dyn Notifier>,
    mutation_id: Uuid,
    kind: MutationKind,
    undo: Undo,
    id: i64,
    snapshot: Option<Snapshot<T>>,
}

impl<T: Entity> Pending<T> {
    fn settle(mut self, result: Result<(), String>) -> MutationOutcome {
        let outcome = match result {
            Ok(()) => {
                self.snapshot = None;
                MutationOutcome::Confirmed
            }
            Err(reason) => {
                self.roll_back(&reason);
                MutationOutcome::RolledBack { reason }
            }
        };
        self.announce(&outcome);
        outcome
    }

    fn roll_back(&mut self, reason: &str) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };
        let mutation_id = self.mutation_id;
        let id = self.id;
        let mut collection = lock_collection(&self.collection);

        match self.undo {
            Undo::Replace => {
                if collection.replace(snapshot.value) {
                    app_log!(
                        warn,
                        "Mutation {} rolled back: entity {} restored: {}",
                        mutation_id,
                        id,
                        reason
                    );
                } else {
                    // Removed by a newer list change; not resurrected.
                    app_log!(
                        warn,
                        "Mutation {} failed but entity {} is no longer listed: {}",
                        mutation_id,
                        id,
                        reason
                    );
                }
            }
            Undo::Reinsert => {
                let restored_at = collection.reinsert(snapshot);
                app_log!(
                    warn,
                    "Mutation {} rolled back: entity {} restored at index {}: {}",
                    mutation_id,
                    id,
                    restored_at,
                    reason
                );
            }
        }
    }

    fn announce(&self, outcome: &MutationOutcome) {
        app_log!(trace, "Mutation {} settled: {:?}", self.mutation_id, outcome);
        let notification = match outcome {
            MutationOutcome::Confirmed => Notification::success(self.kind, self.id),
            MutationOutcome::RolledBack { .. } => Notification::failure(self.kind, self.id),
        };
        self.notifier.notify(notification);
    }
}

impl<T: Entity> Drop for Pending<T> {
    fn drop(&mut self) {
        if self.snapshot.is_some() {
            self.roll_back(CANCELLED_REASON);
            self.announce(&MutationOutcome::RolledBack {
                reason: CANCELLED_REASON.to_string(),
            });
        }
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

impl<T: Entity + Send + 'static> MutationController<T> {
    pub fn new(collection: Collection<T>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            collection: Arc::new(Mutex::new(collection)),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            notifier,
            timeout: None,
        }
    }

    /// Force a rollback when the remote call takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Collection<T>> {
        lock_collection(&self.collection)
    }

    /// Copy of the current local state
    pub fn items(&self) -> Vec<T> {
        self.lock().as_slice().to_vec()
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Replace local state with a fresh fetch from the backend
    pub fn reset(&self, items: Vec<T>) {
        self.lock().reset(items);
    }

    pub fn is_pending(&self, id: i64) -> bool {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Claim the per-id slot. Called with the collection lock held.
    fn begin(
        &self,
        mutation_id: Uuid,
        kind: MutationKind,
        undo: Undo,
        snapshot: Snapshot<T>,
    ) -> Result<Pending<T>, MutationError> {
        let id = snapshot.value.id();
        let mut ids = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !ids.insert(id) {
            return Err(MutationError::InFlight(id));
        }
        Ok(Pending {
            collection: Arc::clone(&self.collection),
            in_flight: Arc::clone(&self.in_flight),
            notifier: Arc::clone(&self.notifier),
            mutation_id,
            kind,
            undo,
            id,
            snapshot: Some(snapshot),
        })
    }

    /// Apply `changes` to `id` now, send them, revert by id if the send fails.
    pub async fn apply_field_update<P, F, Fut, R, E>(
        &self,
        id: i64,
        kind: MutationKind,
        changes: P,
        remote: F,
    ) -> Result<MutationOutcome, MutationError>
    where
        P: Patch<T>,
        F: FnOnce(P) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let mutation_id = Uuid::new_v4();
        let pending = {
            let mut collection = self.lock();
            let snapshot = collection.snapshot(id).ok_or_else(|| {
                app_log!(warn, "Mutation {} skipped: entity {} not found", mutation_id, id);
                MutationError::NotFound(id)
            })?;
            let optimistic = changes.apply_to(&snapshot.value);
            let index = snapshot.index;
            let pending = self.begin(mutation_id, kind, Undo::Replace, snapshot)?;
            collection.replace(optimistic);
            app_log!(
                info,
                "Mutation {} applied {} to entity {} at index {}",
                mutation_id,
                kind,
                id,
                index
            );
            pending
        };

        let result = self.settle_remote(remote(changes)).await;
        Ok(pending.settle(result))
    }

    /// Move a schedulable entity to `[start, end)`.
    pub async fn apply_reschedule<F, Fut, R, E>(
        &self,
        id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        remote: F,
    ) -> Result<MutationOutcome, MutationError>
    where
        T: Schedulable,
        F: FnOnce(DateTime<Utc>, DateTime<Utc>) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        if end <= start {
            return Err(MutationError::InvalidRange { start, end });
        }

        self.apply_field_update(
            id,
            MutationKind::Reschedule,
            TimeRange { start, end },
            |range| remote(range.start, range.end),
        )
        .await
    }

    /// Remove `id` now, send the delete, reinsert at the old index on failure.
    pub async fn apply_delete<F, Fut, R, E>(
        &self,
        id: i64,
        remote: F,
    ) -> Result<MutationOutcome, MutationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let mutation_id = Uuid::new_v4();
        let pending = {
            let mut collection = self.lock();
            let snapshot = collection.snapshot(id).ok_or_else(|| {
                app_log!(warn, "Mutation {} skipped: entity {} not found", mutation_id, id);
                MutationError::NotFound(id)
            })?;
            let index = snapshot.index;
            let pending = self.begin(mutation_id, MutationKind::Delete, Undo::Reinsert, snapshot)?;
            collection.remove(id);
            app_log!(
                info,
                "Mutation {} removed entity {} from index {}",
                mutation_id,
                id,
                index
            );
            pending
        };

        let result = self.settle_remote(remote()).await;
        Ok(pending.settle(result))
    }

    async fn settle_remote<Fut, R, E>(&self, remote: Fut) -> Result<(), String>
    where
        Fut: Future<Output = Result<R, E>>,
        E: Display,
    {
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, remote).await {
                Ok(result) => result,
                Err(_) => return Err(format!("remote call timed out after {:?}", limit)),
            },
            None => remote.await,
        };
        result.map(|_| ()).map_err(|e| e.to_string())
    }
}

struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl<T: Schedulable> Patch<T> for TimeRange {
    fn apply_to(&self, target: &T) -> T {
        target.with_time_range(self.start, self.end)
    }
}
