//! Per-actor tick: expiry sweep, periodic pulses, stat refresh.

use crate::combat::{DamagePipeline, DamageRequest};
use crate::events::{EventKind, EventPayload, EventSink};
use crate::state::{ActorId, DamageTag, EffectId, World};
use crate::stats::StatAggregator;

use super::errors::EngineError;

/// What one actor's tick did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Instances dropped from the bag this tick, in bag order.
    pub expired: Vec<EffectId>,
    /// Periodic deltas issued through the damage pipeline.
    pub pulses: u32,
    /// The actor died during this tick.
    pub died: bool,
}

pub(crate) fn tick_actor(
    world: &mut World,
    sink: &mut dyn EventSink,
    id: ActorId,
) -> Result<TickReport, EngineError> {
    let now = world.now();
    let sturdy_percent = world.config.sturdy_duration_percent;
    let actor = world
        .actor_mut(id)
        .ok_or_else(|| EngineError::actor_not_found(id, now))?;
    let position = actor.position;

    let removed = actor.effects.sweep(now, sturdy_percent);
    let pulses: Vec<(i64, DamageTag, Option<ActorId>)> = if actor.is_dead() {
        Vec::new()
    } else {
        actor
            .effects
            .active()
            .filter_map(|e| e.pulse_at(now).map(|(delta, tag)| (delta, tag, e.origin())))
            .collect()
    };

    let mut report = TickReport {
        expired: removed.iter().map(|e| e.id()).collect(),
        ..TickReport::default()
    };
    for effect in &removed {
        sink.emit(
            EventKind::EffectExpired,
            position,
            EventPayload::Effect {
                actor: id,
                effect: effect.id(),
                tag: effect.tag(),
            },
        );
    }

    for (delta, tag, origin) in pulses {
        let mut request = DamageRequest::new(id, delta, tag);
        request.origin = origin;
        let result = DamagePipeline::apply(world, sink, request)?;
        report.pulses += 1;
        if result.actor_died {
            report.died = true;
            break;
        }
    }

    let config = world.config.clone();
    if let Some(actor) = world.actor_mut(id) {
        actor.stats = StatAggregator::aggregate(actor, &config);
    }

    Ok(report)
}
