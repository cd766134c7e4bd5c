//! Death transition.
//!
//! # Lifecycle
//!
//! ```text
//! Alive ──hp reaches 0──▶ Dying ──check_death──▶ Dead ──reaper──▶ Removed
//! ```
//!
//! `Dying → Dead` happens synchronously inside the damage call that zeroed
//! HP. It runs once per actor: the hook list is taken out of the actor before
//! dispatch, and a dead actor never re-enters the transition.

mod hooks;

pub use hooks::DeathHook;

use crate::combat::{DamagePipeline, DamageRequest};
use crate::effect::EffectSpec;
use crate::engine::attach_effect;
use crate::events::{EventKind, EventPayload, EventSink};
use crate::schedule::Task;
use crate::state::{ActorId, ActorKind, DamageTag, Position, Tick, World};
use crate::stats::StatAggregator;

/// Entry in the world's death log, consumed by the caller for rewards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathRecord {
    pub victim: ActorId,
    pub kind: ActorKind,
    pub name: String,
    /// Origin of the killing blow, if it still resolved to another actor.
    pub killer: Option<ActorId>,
    /// Bounty scaled by the victim's gold factor.
    pub reward: u32,
    pub tick: Tick,
}

/// Drives the one-time death transition.
pub struct LifecycleController;

impl LifecycleController {
    /// Runs the death transition for `victim` if its HP is zero and it is not
    /// yet dead. Returns the recorded death, or `None` if nothing happened.
    pub fn check_death(
        world: &mut World,
        sink: &mut dyn EventSink,
        victim: ActorId,
        killer: Option<ActorId>,
    ) -> Option<DeathRecord> {
        let now = world.now();
        let killer = killer.filter(|k| *k != victim && world.contains(*k));
        let actor = world.actor(victim)?;
        if actor.is_dead() || actor.hp() > 0 {
            return None;
        }

        let gold = StatAggregator::aggregate(actor, &world.config).gold;
        let reward = (f64::from(actor.bounty) * gold).trunc();
        let reward = if reward.is_finite() {
            reward.clamp(0.0, f64::from(u32::MAX)) as u32
        } else {
            0
        };

        let actor = world.actor_mut(victim)?;
        let hooks = actor.mark_dead()?;
        let record = DeathRecord {
            victim,
            kind: actor.kind,
            name: actor.name.clone(),
            killer,
            reward,
            tick: now,
        };
        let position = actor.position;

        if let Some(k) = killer.and_then(|k| world.actor_mut(k)) {
            k.attribution.kills = k.attribution.kills.saturating_add(1);
        }

        tracing::debug!(
            actor = %victim,
            killer = ?killer,
            reward,
            hooks = hooks.len(),
            "actor died"
        );
        world.record_death(record.clone());
        sink.emit(
            EventKind::Death,
            position,
            EventPayload::Death {
                victim,
                killer,
                reward,
            },
        );

        for hook in hooks {
            Self::dispatch(world, sink, victim, position, killer, hook);
        }

        Some(record)
    }

    fn dispatch(
        world: &mut World,
        sink: &mut dyn EventSink,
        victim: ActorId,
        position: Position,
        killer: Option<ActorId>,
        hook: DeathHook,
    ) {
        if hook.needs_killer() && killer.is_none() {
            tracing::debug!(actor = %victim, hook = hook.name(), "no killer to target; hook skipped");
            return;
        }

        match hook {
            DeathHook::HealAllies { amount } => {
                for ally in world.allies_of(victim) {
                    let request = DamageRequest::new(ally, i64::from(amount), DamageTag::Magic);
                    if let Err(err) = DamagePipeline::apply(world, sink, request) {
                        tracing::warn!(actor = %victim, %err, "heal allies hook failed");
                    }
                }
            }
            DeathHook::ShieldAllies { amount } => {
                for ally in world.allies_of(victim) {
                    if let Some(actor) = world.actor_mut(ally) {
                        actor.add_shield(amount);
                    }
                }
            }
            DeathHook::CurseKiller { effect, duration } => {
                if let Some(killer) = killer {
                    let spec = EffectSpec::new(effect, duration).from_origin(victim);
                    if let Err(err) = attach_effect(world, sink, killer, spec) {
                        tracing::warn!(actor = %victim, %err, "curse killer hook failed");
                    }
                }
            }
            DeathHook::DelayedBurst { delay, damage, tag } => {
                if let Some(killer) = killer {
                    let due = world.now() + delay;
                    world.tasks.schedule(
                        due,
                        Task::Damage {
                            target: killer,
                            delta: -i64::from(damage),
                            tag,
                            origin: Some(victim),
                        },
                    );
                }
            }
            DeathHook::Announce => sink.emit(
                EventKind::Announce,
                position,
                EventPayload::Death {
                    victim,
                    killer,
                    reward: 0,
                },
            ),
        }
    }
}
