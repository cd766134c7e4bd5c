//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the world and executes every command against
//! it, one at a time.

mod simulation;

pub use simulation::{Command, SimulationWorker};
