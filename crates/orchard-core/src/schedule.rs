//! Deferred, cancellable per-entity tasks.
//!
//! Delayed work such as removing a stomped enemy. A task is keyed by the
//! entity it concerns, polled once per unpaused tick against the session
//! clock, and dropped if the entity goes away first. Each entity has at most one pending task;
//! scheduling again replaces it.
//!
//! # Example
//!
//! ```
//! use orchard_core::schedule::{DeferredQueue, DeferredTask};
//! use orchard_core::entity::EntityId;
//!
//! let mut queue = DeferredQueue::new();
//! let ninja = EntityId::new(3);
//! queue.schedule(ninja, 1.0, 0.5, DeferredTask::Despawn);
//!
//! assert!(queue.poll(1.2).is_empty());
//! assert_eq!(queue.poll(1.5), vec![(ninja, DeferredTask::Despawn)]);
//! assert!(queue.is_empty());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::EntityId;

/// Work to run when a deferred entry falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeferredTask {
    /// Remove the entity from the level.
    Despawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Pending {
    due: f64,
    task: DeferredTask,
}

/// Pending tasks keyed by entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeferredQueue {
    pending: BTreeMap<EntityId, Pending>,
}

impl DeferredQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` for `entity` at `now + delay`, replacing any pending task.
    pub fn schedule(&mut self, entity: EntityId, now: f64, delay: f32, task: DeferredTask) {
        let due = now + f64::from(delay.max(0.0));
        trace!(%entity, due, ?task, "deferred task scheduled");
        self.pending.insert(entity, Pending { due, task });
    }

    /// Cancels the pending task for `entity`, returning it.
    pub fn cancel(&mut self, entity: EntityId) -> Option<DeferredTask> {
        self.pending.remove(&entity).map(|p| p.task)
    }

    /// Removes and returns every task due at or before `now`, earliest first
    /// (ties broken by entity id).
    pub fn poll(&mut self, now: f64) -> Vec<(EntityId, DeferredTask)> {
        let mut due: Vec<(f64, EntityId, DeferredTask)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(id, p)| (p.due, *id, p.task))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, id, _) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id, task)| (id, task)).collect()
    }

    /// Returns `true` if `entity` has a pending task.
    #[must_use]
    pub fn is_pending(&self, entity: EntityId) -> bool {
        self.pending.contains_key(&entity)
    }

    /// Earliest due time, if anything is pending.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.pending.values().map(|p| p.due).reduce(f64::min)
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
