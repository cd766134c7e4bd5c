//! Delayed work queue.
//!
//! Work is stored as tagged descriptors rather than closures so the queue can
//! be persisted and inspected. Due entries come out in `(due, id)` order, and
//! each task runs at most once. There is no cancellation; a task whose
//! target died or was removed in the meantime is dropped by the runner.

use std::collections::BTreeMap;

use crate::effect::{EffectSelector, EffectSpec};
use crate::state::{ActorId, DamageTag, TaskId, Tick};

/// A deferred engine operation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Task {
    Damage {
        target: ActorId,
        delta: i64,
        tag: DamageTag,
        origin: Option<ActorId>,
    },
    Attach {
        target: ActorId,
        spec: EffectSpec,
    },
    Remove {
        target: ActorId,
        selector: EffectSelector,
        origin: Option<ActorId>,
    },
}

impl Task {
    pub fn target(&self) -> ActorId {
        match self {
            Self::Damage { target, .. }
            | Self::Attach { target, .. }
            | Self::Remove { target, .. } => *target,
        }
    }
}

/// Priority queue of pending tasks keyed by `(due, id)`.
///
/// The queue is an ordered map rather than a binary heap so that its encoding
/// is canonical and two queues compare by content.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelayedWork {
    next_id: u64,
    queue: BTreeMap<(Tick, TaskId), Task>,
}

impl DelayedWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task` to run once `now >= due`.
    pub fn schedule(&mut self, due: Tick, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.queue.insert((due, id), task);
        id
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Tick) -> Option<(TaskId, Task)> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        self.queue.pop_first().map(|((_, id), task)| (id, task))
    }

    /// Due tick of the earliest pending task.
    pub fn next_due(&self) -> Option<Tick> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
