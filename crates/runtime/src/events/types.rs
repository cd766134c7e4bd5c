//! Event payloads published on the runtime bus.

use serde::{Deserialize, Serialize};

use defense_core::{ActorId, DeathRecord, EventKind, EventPayload, Position, Tick};

use super::bus::Topic;

/// Event wrapper that carries the topic and typed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Combat(CombatEvent),
    Lifecycle(LifecycleEvent),
    Economy(EconomyEvent),
    Tick(TickEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Economy(_) => Topic::Economy,
            Event::Tick(_) => Topic::Tick,
        }
    }
}

/// One emission from the combat engine, stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub tick: Tick,
    pub kind: EventKind,
    pub position: Position,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Spawned {
        actor: ActorId,
        template: String,
        tick: Tick,
    },
    Died(DeathRecord),
    /// Removed from the registries after its death was settled.
    Reaped { actor: ActorId, tick: Tick },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyEvent {
    GoldChanged {
        tick: Tick,
        delta: i64,
        balance: i64,
        /// Death that paid the reward.
        victim: Option<ActorId>,
    },
}

/// Summary published after every simulation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvent {
    pub tick: Tick,
    pub tasks_run: usize,
    pub pulses: u32,
    pub expired: usize,
    pub deaths: usize,
    pub reaped: usize,
}
