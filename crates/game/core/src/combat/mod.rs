//! Combat resolution: turning signed health deltas into HP and shield changes.
//!
//! # Architecture
//!
//! - **Pure transform**: [`DamagePipeline::transform`] reads the target and
//!   origin and returns the integer delta still to apply
//! - **Mutation**: [`DamagePipeline::apply`] soaks the shield, clamps HP,
//!   credits the origin and hands zero-HP targets to the lifecycle controller

pub mod damage;
pub mod result;

pub use damage::{DamagePipeline, DamageRequest};
pub use result::{AppliedOutcome, AppliedResult};
