//! Engine event sinks provided by the runtime.

use defense_core::{EventKind, EventPayload, EventSink, Position, Tick};

use super::bus::EventBus;
use super::types::{CombatEvent, Event};

/// Logs every engine event through `tracing`.
///
/// Health and effect traffic goes out at `trace`, deaths and dropped tasks at
/// `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink {
    emitted: u64,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn log(kind: EventKind, position: Position, payload: &EventPayload) {
        match kind {
            EventKind::Death | EventKind::Announce | EventKind::TaskDropped => {
                tracing::debug!(target: "defense::events", %kind, x = position.x, y = position.y, ?payload);
            }
            _ => {
                tracing::trace!(target: "defense::events", %kind, x = position.x, y = position.y, ?payload);
            }
        }
    }
}

impl EventSink for TracingSink {
    fn emit(&mut self, kind: EventKind, position: Position, payload: EventPayload) {
        self.emitted += 1;
        Self::log(kind, position, &payload);
    }
}

/// Logs engine events and republishes them on the [`EventBus`] combat topic.
pub struct BusSink<'a> {
    bus: &'a EventBus,
    tick: Tick,
    tracing: TracingSink,
}

impl<'a> BusSink<'a> {
    pub fn new(bus: &'a EventBus, tick: Tick) -> Self {
        Self {
            bus,
            tick,
            tracing: TracingSink::new(),
        }
    }

    /// Stamps subsequent events with `tick`.
    pub fn set_tick(&mut self, tick: Tick) {
        self.tick = tick;
    }

    pub fn emitted(&self) -> u64 {
        self.tracing.emitted()
    }
}

impl EventSink for BusSink<'_> {
    fn emit(&mut self, kind: EventKind, position: Position, payload: EventPayload) {
        self.tracing.emit(kind, position, payload.clone());
        self.bus.publish(Event::Combat(CombatEvent {
            tick: self.tick,
            kind,
            position,
            payload,
        }));
    }
}
