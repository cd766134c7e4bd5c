//! Status effect system: classification, storage, and shield interception.
//!
//! # Architecture
//!
//! ```text
//! EffectRegistry   polarity + stacking policy per kind (pure)
//!      ↓
//! EffectBag        per-actor insertion-ordered instances, expiry sweep
//!      ↓
//! ShieldArbiter    mystery shields swallow incoming negative effects
//! ```
//!
//! Instances are created only through the engine's attach path, which
//! allocates engine-wide unique ids and runs the gates in front of the
//! arbiter.

mod bag;
mod instance;
mod kinds;
mod record;
mod registry;
mod shield;

pub use bag::{EffectBag, EffectSelector};
pub use instance::{EffectSpec, StatusEffectInstance};
pub use kinds::{EffectKind, EffectTag, Periodic};
pub use record::EffectRecord;
pub use registry::{EffectRegistry, Polarity, StackingPolicy};
pub use shield::{ShieldArbiter, ShieldVerdict};
