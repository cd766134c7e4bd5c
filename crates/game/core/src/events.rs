//! Outbound notifications.
//!
//! The engine reports what happened through an [`EventSink`] handed in by the
//! caller. Events are fire-and-forget: sinks cannot veto or alter anything.

use crate::effect::EffectTag;
use crate::engine::RejectReason;
use crate::state::{ActorId, DamageTag, EffectId, Position, TaskId};

/// Category of an emitted event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    EffectApplied,
    EffectBlocked,
    EffectRejected,
    EffectExpired,
    Damaged,
    Healed,
    ShieldAbsorbed,
    InvincibleHit,
    Death,
    Announce,
    TaskDropped,
}

/// Data carried by an event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventPayload {
    Effect {
        actor: ActorId,
        effect: EffectId,
        tag: EffectTag,
    },
    Blocked {
        actor: ActorId,
        shield: EffectId,
        remaining: u32,
        tag: EffectTag,
    },
    Rejected {
        actor: ActorId,
        tag: EffectTag,
        reason: RejectReason,
    },
    Health {
        actor: ActorId,
        amount: u64,
        tag: DamageTag,
        origin: Option<ActorId>,
    },
    Death {
        victim: ActorId,
        killer: Option<ActorId>,
        reward: u32,
    },
    Task {
        id: TaskId,
        target: ActorId,
    },
}

/// Receiver of engine events.
pub trait EventSink {
    fn emit(&mut self, kind: EventKind, position: Position, payload: EventPayload);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _kind: EventKind, _position: Position, _payload: EventPayload) {}
}

/// One recorded emission.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub kind: EventKind,
    pub position: Position,
    pub payload: EventPayload,
}

/// Keeps every event in emission order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, kind: EventKind, position: Position, payload: EventPayload) {
        self.events.push(Event {
            kind,
            position,
            payload,
        });
    }
}
