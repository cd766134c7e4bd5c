pub mod actor;
pub mod common;
pub mod immunity;

// Re-export actor types
pub use actor::{
    Actor, ActorFlags, ActorKind, ActorTemplate, Attribution, LifeState, SpecialRule,
};

// Re-export common types
pub use common::{ActorId, EffectId, Position, TaskId, Tick};

// Re-export immunity types
pub use immunity::{DamageTag, Immunity, ImmunitySet, UnknownImmunity};
