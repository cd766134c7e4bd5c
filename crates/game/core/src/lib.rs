//! Deterministic status effect and combat resolution for the defense simulation.
//!
//! `defense-core` owns the rules for transient effects, effective stats,
//! health resolution and the death transition. It exposes pure APIs that the
//! runtime and offline tools share. All mutation on behalf of a caller flows
//! through [`engine::CombatEngine`], which borrows the [`World`] for the
//! duration of a request.
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod schedule;
pub mod state;
pub mod stats;

pub use combat::{AppliedOutcome, AppliedResult, DamagePipeline, DamageRequest};
pub use config::EngineConfig;
pub use effect::{
    EffectBag, EffectKind, EffectRecord, EffectRegistry, EffectSelector, EffectSpec, EffectTag,
    Polarity, ShieldArbiter, ShieldVerdict, StackingPolicy, StatusEffectInstance,
};
pub use engine::{AttachOutcome, CombatEngine, EngineError, RejectReason, TickReport};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use events::{Event, EventKind, EventPayload, EventSink, NullSink, RecordingSink};
pub use lifecycle::{DeathHook, DeathRecord, LifecycleController};
pub use schedule::{DelayedWork, Task};
pub use state::{
    Actor, ActorFlags, ActorId, ActorKind, ActorTemplate, Attribution, DamageTag, EffectId,
    Immunity, ImmunitySet, LifeState, Position, SpecialRule, TaskId, Tick, World,
};
pub use stats::{StatAggregator, StatSnapshot, StatusFlags};
