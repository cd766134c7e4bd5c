//! Runtime event plumbing.
//!
//! Engine emissions flow through a [`BusSink`] onto the topic-based
//! [`EventBus`]; the simulation worker adds lifecycle, economy and per-step
//! events of its own.

mod bus;
mod sink;
mod types;

pub use bus::{EventBus, Topic};
pub use sink::{BusSink, TracingSink};
pub use types::{CombatEvent, EconomyEvent, Event, LifecycleEvent, TickEvent};
