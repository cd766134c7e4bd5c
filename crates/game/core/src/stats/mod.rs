//! Stat system: effective multipliers derived from live effects.
//!
//! # Architecture
//!
//! ```text
//! [ EffectBag (live instances) ]
//!      ↓  grouped by category
//! [ RatioStack per category ]   TakeMin / TakeMax / Additive / Multiplicative
//!      ↓
//! [ StatSnapshot ]              speed, attack speed, damage, range, heal, ...
//! ```
//!
//! ## Principles
//!
//! 1. **Pure**: aggregation reads the actor and returns a value, nothing else
//! 2. **Fresh**: flagged instances never contribute, even before the sweep
//! 3. **Not persisted**: the cached snapshot is rebuilt on every tick

pub mod aggregate;
pub mod snapshot;
pub mod stack;

pub use aggregate::StatAggregator;
pub use snapshot::{StatSnapshot, StatusFlags};
pub use stack::RatioStack;
