//! Effect attachment gates.
//!
//! # Gate Order
//!
//! ```text
//! 1. target missing            → ActorNotFound error
//!    target dead               → Rejected(Dead)
//! 2. immune (not nullified)    → Rejected(Immune)
//! 3. Poison / BadPoison / Freeze already active → Rejected(AlreadyActive)
//! 4. self re-application       → Rejected(SelfReapplied)   (Camo exempt)
//! 5. negative polarity         → ShieldArbiter
//! ```
//!
//! Gates 1 to 4 never consume shield charges.

use crate::effect::{
    EffectSpec, EffectTag, Polarity, ShieldArbiter, ShieldVerdict, StatusEffectInstance,
};
use crate::events::{EventKind, EventPayload, EventSink};
use crate::state::{Actor, ActorId, EffectId, World};

use super::errors::EngineError;

/// Why a gate turned an attachment down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    Dead,
    Immune,
    AlreadyActive,
    SelfReapplied,
}

/// Detailed result of an attachment attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachOutcome {
    /// Inserted under this id.
    Applied(EffectId),
    /// Swallowed by a mystery shield.
    Blocked { shield: EffectId, remaining: u32 },
    Rejected(RejectReason),
}

impl AttachOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn effect_id(&self) -> Option<EffectId> {
        match self {
            Self::Applied(id) => Some(*id),
            _ => None,
        }
    }
}

/// Runs the gates for `spec` on `target` and inserts the effect if all pass.
pub(crate) fn attach_effect(
    world: &mut World,
    sink: &mut dyn EventSink,
    target: ActorId,
    spec: EffectSpec,
) -> Result<AttachOutcome, EngineError> {
    let now = world.now();
    let tag = spec.kind.tag();
    let actor = world
        .actor(target)
        .ok_or_else(|| EngineError::actor_not_found(target, now))?;
    let position = actor.position;

    if let Some(reason) = rejection(actor, tag, &spec) {
        tracing::debug!(actor = %target, %tag, %reason, "effect rejected");
        sink.emit(
            EventKind::EffectRejected,
            position,
            EventPayload::Rejected {
                actor: target,
                tag,
                reason,
            },
        );
        return Ok(AttachOutcome::Rejected(reason));
    }

    let actor = world
        .actor_mut(target)
        .ok_or_else(|| EngineError::registry_inconsistent(target, now, "attach"))?;

    if let ShieldVerdict::Blocked { shield, remaining } =
        ShieldArbiter::intercept(&mut actor.effects, &spec)
    {
        tracing::debug!(actor = %target, %tag, %shield, remaining, "effect blocked by shield");
        sink.emit(
            EventKind::EffectBlocked,
            position,
            EventPayload::Blocked {
                actor: target,
                shield,
                remaining,
                tag,
            },
        );
        return Ok(AttachOutcome::Blocked { shield, remaining });
    }

    let sturdy_halved = actor.is_sturdy() && spec.kind.polarity() == Polarity::Negative;
    let effect_id = world.allocate_effect_id();
    let actor = world
        .actor_mut(target)
        .ok_or_else(|| EngineError::registry_inconsistent(target, now, "attach"))?;
    actor
        .effects
        .insert(StatusEffectInstance::new(effect_id, spec, now, sturdy_halved));

    tracing::debug!(actor = %target, %tag, effect = %effect_id, sturdy_halved, "effect applied");
    sink.emit(
        EventKind::EffectApplied,
        position,
        EventPayload::Effect {
            actor: target,
            effect: effect_id,
            tag,
        },
    );
    Ok(AttachOutcome::Applied(effect_id))
}

fn rejection(actor: &Actor, tag: EffectTag, spec: &EffectSpec) -> Option<RejectReason> {
    if actor.is_dead() {
        return Some(RejectReason::Dead);
    }
    if actor.wards_off(tag) {
        return Some(RejectReason::Immune);
    }
    if matches!(tag, EffectTag::Poison | EffectTag::BadPoison | EffectTag::Freeze)
        && actor.effects.has_active(tag)
    {
        return Some(RejectReason::AlreadyActive);
    }
    if tag != EffectTag::Camo
        && spec.origin == Some(actor.id)
        && actor.effects.has_active_from(tag, actor.id)
    {
        return Some(RejectReason::SelfReapplied);
    }
    None
}
