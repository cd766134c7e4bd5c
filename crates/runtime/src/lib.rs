//! Runtime orchestration for the defense simulation.
//!
//! This crate wraps the combat engine in the surrounding world update: a
//! fixed-tick driver, reward payout from the death log, reaping of expired
//! actors, and event distribution. Consumers embed [`Runtime`] and talk to it
//! through [`RuntimeHandle`], or drive a [`Simulation`] directly.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus and engine sinks
//! - [`simulation`] is the synchronous world update the worker runs
//! - [`logging`] installs the stderr tracing subscriber
pub mod api;
pub mod events;
pub mod logging;
pub mod runtime;
pub mod simulation;
pub mod treasury;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{
    BusSink, CombatEvent, EconomyEvent, Event, EventBus, LifecycleEvent, TickEvent, Topic,
    TracingSink,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use simulation::{Payout, Simulation, StepReport};
pub use treasury::Treasury;
