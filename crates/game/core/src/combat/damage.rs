//! Health delta resolution.
//!
//! # Pipeline
//!
//! Negative deltas (damage) pass through, in order:
//!
//! ```text
//! 1. boss factor       origin resolves and target is a boss → × origin boss damage
//! 2. weaken            × target weaken factor
//! 3. resist            immune to `{tag}resist` → × resist ratio
//! 4. vamp              immune to `{tag}vamp`   → negate, × vamp ratio (now healing)
//! 5. immune            immune to `{tag}`       → 0
//! 5a. special rules    damage type filter, per-hit cap
//! 6. truncate          toward zero
//! 7. invincible        still damage → dropped
//! 8. shield            plain shield soaks first
//! ```
//!
//! Positive deltas (healing) skip all of that and are scaled by the target's
//! heal factor instead. Healing produced by vamp in step 4 is not scaled again.

use super::result::{AppliedOutcome, AppliedResult};
use crate::config::EngineConfig;
use crate::engine::EngineError;
use crate::events::{EventKind, EventPayload, EventSink};
use crate::lifecycle::LifecycleController;
use crate::state::{Actor, ActorId, DamageTag, Immunity, World};
use crate::stats::StatAggregator;

/// A signed health change aimed at one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRequest {
    pub target: ActorId,
    /// Negative for damage, positive for healing.
    pub delta: i64,
    pub tag: DamageTag,
    pub origin: Option<ActorId>,
}

impl DamageRequest {
    pub fn new(target: ActorId, delta: i64, tag: DamageTag) -> Self {
        Self {
            target,
            delta,
            tag,
            origin: None,
        }
    }

    pub fn from_origin(mut self, origin: ActorId) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Ordered transform chain from raw delta to HP and shield mutation.
pub struct DamagePipeline;

impl DamagePipeline {
    /// Runs the pure part of the pipeline (steps 1 to 7, or the heal scaling).
    ///
    /// Returns the signed integer delta still to be applied, or `None` when
    /// the target's invincibility swallowed the damage.
    pub fn transform(
        target: &Actor,
        origin: Option<&Actor>,
        delta: i64,
        tag: DamageTag,
        config: &EngineConfig,
    ) -> Option<i64> {
        let target_stats = StatAggregator::aggregate(target, config);

        if delta >= 0 {
            let healed = (delta as f64 * target_stats.heal).trunc() as i64;
            tracing::debug!(actor = %target.id, raw = delta, healed, "heal scaled");
            return Some(healed);
        }

        let mut value = delta as f64;

        if let Some(origin) = origin.filter(|_| target.is_boss()) {
            value *= StatAggregator::aggregate(origin, config).boss_damage;
        }

        value *= target_stats.weaken;

        if target.is_immune_to(&Immunity::Resist(tag)) {
            value *= config.resist_ratio;
        }
        if target.is_immune_to(&Immunity::Vamp(tag)) {
            value = -value * config.vamp_ratio;
        }
        if target.is_immune_to(&Immunity::Damage(tag)) {
            value = 0.0;
        }

        for rule in &target.rules {
            value = rule.reshape(value, tag);
        }

        if !value.is_finite() {
            tracing::warn!(actor = %target.id, raw = delta, "non-finite damage dropped");
            value = 0.0;
        }
        let resolved = value.trunc() as i64;
        tracing::debug!(actor = %target.id, raw = delta, %tag, resolved, "damage transformed");

        if resolved < 0 && target.is_invincible() {
            return None;
        }
        Some(resolved)
    }

    /// Resolves `request` against the world, mutating HP, shield and
    /// attribution, and running the death transition if HP reaches zero.
    pub fn apply(
        world: &mut World,
        sink: &mut dyn EventSink,
        request: DamageRequest,
    ) -> Result<AppliedResult, EngineError> {
        let now = world.now();
        let target = world
            .actor(request.target)
            .ok_or_else(|| EngineError::actor_not_found(request.target, now))?;

        if target.is_dead() {
            return Ok(AppliedResult::already_dead());
        }

        let origin = request.origin.and_then(|id| world.actor(id));
        if let (Some(id), None) = (request.origin, origin) {
            tracing::debug!(origin = %id, "origin no longer registered; attribution skipped");
        }

        let Some(mut delta) =
            Self::transform(target, origin, request.delta, request.tag, &world.config)
        else {
            sink.emit(
                EventKind::InvincibleHit,
                target.position,
                EventPayload::Health {
                    actor: target.id,
                    amount: request.delta.unsigned_abs(),
                    tag: request.tag,
                    origin: request.origin,
                },
            );
            return Ok(AppliedResult::invincible());
        };

        let target = world
            .actor_mut(request.target)
            .ok_or_else(|| {
                EngineError::registry_inconsistent(request.target, now, "damage")
            })?;

        let mut absorbed = 0;
        if delta < 0 {
            let incoming = u32::try_from(delta.unsigned_abs()).unwrap_or(u32::MAX);
            absorbed = target.absorb_into_shield(incoming);
            delta += i64::from(absorbed);
        }

        let old_hp = target.hp();
        let new_hp = target.set_hp(i64::from(old_hp).saturating_add(delta));
        let effective = i64::from(old_hp) - i64::from(new_hp);
        let dying = new_hp == 0 && !target.is_dead();
        let position = target.position;

        if absorbed > 0 {
            sink.emit(
                EventKind::ShieldAbsorbed,
                position,
                EventPayload::Health {
                    actor: request.target,
                    amount: u64::from(absorbed),
                    tag: request.tag,
                    origin: request.origin,
                },
            );
        }
        if effective != 0 {
            let kind = if effective > 0 {
                EventKind::Damaged
            } else {
                EventKind::Healed
            };
            sink.emit(
                kind,
                position,
                EventPayload::Health {
                    actor: request.target,
                    amount: effective.unsigned_abs(),
                    tag: request.tag,
                    origin: request.origin,
                },
            );
        }

        if effective > 0 {
            if let Some(origin) = request.origin.and_then(|id| world.actor_mut(id)) {
                origin.attribution.damage_dealt = origin
                    .attribution
                    .damage_dealt
                    .saturating_add(effective as u64);
            }
        }

        let actor_died = dying
            && LifecycleController::check_death(world, sink, request.target, request.origin)
                .is_some();

        Ok(AppliedResult {
            outcome: AppliedOutcome::Applied,
            effective_delta: effective,
            shield_absorbed: absorbed,
            actor_died,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectKind, EffectSpec, StatusEffectInstance};
    use crate::events::{NullSink, RecordingSink};
    use crate::state::{ActorTemplate, Position, SpecialRule};

    fn spawn(world: &mut World, template: ActorTemplate) -> ActorId {
        world.spawn(&template, Position::ORIGIN)
    }

    fn give(world: &mut World, id: ActorId, kind: EffectKind) {
        let effect_id = world.allocate_effect_id();
        let now = world.now();
        if let Some(actor) = world.actor_mut(id) {
            actor.effects.insert(StatusEffectInstance::new(
                effect_id,
                EffectSpec::new(kind, 1_000),
                now,
                false,
            ));
        }
    }

    fn hit(world: &mut World, target: ActorId, delta: i64, tag: DamageTag) -> AppliedResult {
        DamagePipeline::apply(world, &mut NullSink, DamageRequest::new(target, delta, tag))
            .expect("target exists")
    }

    fn hp(world: &World, id: ActorId) -> u32 {
        world.actor(id).map(Actor::hp).unwrap_or_default()
    }

    #[test]
    fn shield_soaks_before_hp() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("tank", 100).with_shield(30));

        let result = hit(&mut world, id, -100, DamageTag::Physical);

        assert_eq!(result.shield_absorbed, 30);
        assert_eq!(result.effective_delta, 70);
        assert_eq!(world.actor(id).map(Actor::shield), Some(0));
        assert_eq!(hp(&world, id), 30);
    }

    #[test]
    fn vamp_turns_damage_into_healing() {
        let mut world = World::default();
        let id = spawn(
            &mut world,
            ActorTemplate::enemy("leech", 100).with_immunity(Immunity::Vamp(DamageTag::Poison)),
        );
        hit(&mut world, id, -50, DamageTag::Physical);
        assert_eq!(hp(&world, id), 50);

        let result = hit(&mut world, id, -40, DamageTag::Poison);

        assert_eq!(result.effective_delta, -20);
        assert_eq!(hp(&world, id), 70);
    }

    #[test]
    fn vamp_healing_ignores_corrosion() {
        let mut world = World::default();
        let id = spawn(
            &mut world,
            ActorTemplate::enemy("leech", 100).with_immunity(Immunity::Vamp(DamageTag::Fire)),
        );
        hit(&mut world, id, -50, DamageTag::Physical);
        give(&mut world, id, EffectKind::Corrosion { ratio: 0.5 });

        hit(&mut world, id, -40, DamageTag::Fire);
        assert_eq!(hp(&world, id), 70);

        hit(&mut world, id, 20, DamageTag::Magic);
        assert_eq!(hp(&world, id), 80);
    }

    #[test]
    fn resist_and_weaken_scale_damage() {
        let mut world = World::default();
        let id = spawn(
            &mut world,
            ActorTemplate::enemy("knight", 1_000).with_immunity(Immunity::Resist(DamageTag::Fire)),
        );
        give(&mut world, id, EffectKind::Weaken { ratio: 1.5 });

        let result = hit(&mut world, id, -33, DamageTag::Fire);
        // -33 × 1.5 × 0.5 = -24.75, truncated toward zero
        assert_eq!(result.effective_delta, 24);
    }

    #[test]
    fn immunity_zeroes_damage_unless_nullified() {
        let mut world = World::default();
        let id = spawn(
            &mut world,
            ActorTemplate::enemy("golem", 100).with_immunity(Immunity::Damage(DamageTag::Physical)),
        );
        assert_eq!(hit(&mut world, id, -40, DamageTag::Physical).effective_delta, 0);

        give(&mut world, id, EffectKind::Nullify);
        assert_eq!(hit(&mut world, id, -40, DamageTag::Physical).effective_delta, 40);
    }

    #[test]
    fn special_rules_filter_and_cap() {
        let mut world = World::default();
        let id = spawn(
            &mut world,
            ActorTemplate::enemy("wisp", 100)
                .with_rule(SpecialRule::DamageTypeFilter {
                    allowed: vec![DamageTag::Magic, DamageTag::Lightning],
                })
                .with_rule(SpecialRule::DamageCap { max: 15 }),
        );
        assert_eq!(hit(&mut world, id, -50, DamageTag::Physical).effective_delta, 0);
        assert_eq!(hit(&mut world, id, -50, DamageTag::Magic).effective_delta, 15);
    }

    #[test]
    fn invincible_target_ignores_damage_but_accepts_healing() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("saint", 100));
        hit(&mut world, id, -20, DamageTag::Physical);
        give(&mut world, id, EffectKind::Invincible);

        let mut sink = RecordingSink::new();
        let result = DamagePipeline::apply(
            &mut world,
            &mut sink,
            DamageRequest::new(id, -50, DamageTag::Physical),
        )
        .expect("target exists");
        assert_eq!(result.outcome, AppliedOutcome::Invincible);
        assert_eq!(sink.count(EventKind::InvincibleHit), 1);
        assert_eq!(hp(&world, id), 80);

        hit(&mut world, id, 10, DamageTag::Magic);
        assert_eq!(hp(&world, id), 90);
    }

    #[test]
    fn heal_is_scaled_and_capped() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("grunt", 100));
        hit(&mut world, id, -60, DamageTag::Physical);
        give(&mut world, id, EffectKind::Corrosion { ratio: 0.5 });

        assert_eq!(hit(&mut world, id, 25, DamageTag::Magic).effective_delta, -12);
        assert_eq!(hp(&world, id), 52);

        hit(&mut world, id, 1_000, DamageTag::Magic);
        assert_eq!(hp(&world, id), 100);
    }

    #[test]
    fn extreme_deltas_clamp_instead_of_overflowing() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("grunt", 100).with_shield(30));

        hit(&mut world, id, -50, DamageTag::Physical);
        assert_eq!(hp(&world, id), 80);
        assert_eq!(hit(&mut world, id, i64::MAX, DamageTag::Magic).effective_delta, -20);
        assert_eq!(hp(&world, id), 100);

        let result = hit(&mut world, id, i64::MIN, DamageTag::Physical);
        assert_eq!(result.effective_delta, 100);
        assert!(result.actor_died);
        assert_eq!(hp(&world, id), 0);
    }

    #[test]
    fn corroded_heal_at_full_hp_changes_nothing() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("grunt", 100));
        give(&mut world, id, EffectKind::Corrosion { ratio: 0.5 });

        assert_eq!(hit(&mut world, id, i64::MAX, DamageTag::Magic).effective_delta, 0);
        assert_eq!(hit(&mut world, id, 40, DamageTag::Magic).effective_delta, 0);
        assert_eq!(hp(&world, id), 100);
    }

    #[test]
    fn extreme_vamp_damage_heals_to_full() {
        let mut world = World::default();
        let id = spawn(
            &mut world,
            ActorTemplate::enemy("leech", 100).with_immunity(Immunity::Vamp(DamageTag::Poison)),
        );
        hit(&mut world, id, -70, DamageTag::Physical);

        let result = hit(&mut world, id, i64::MIN, DamageTag::Poison);
        assert_eq!(result.effective_delta, -70);
        assert_eq!(hp(&world, id), 100);
    }

    #[test]
    fn boss_factor_and_attribution_follow_the_origin() {
        let mut world = World::default();
        let boss = spawn(&mut world, ActorTemplate::enemy("dragon", 1_000).boss());
        let tower = spawn(
            &mut world,
            ActorTemplate::tower("ballista", 10).with_boss_damage_ratio(2.0),
        );
        give(&mut world, tower, EffectKind::BossSlayer { ratio: 1.5 });

        let result = DamagePipeline::apply(
            &mut world,
            &mut NullSink,
            DamageRequest::new(boss, -10, DamageTag::Physical).from_origin(tower),
        )
        .expect("target exists");

        assert_eq!(result.effective_delta, 30);
        assert_eq!(world.actor(tower).map(|t| t.attribution.damage_dealt), Some(30));
    }

    #[test]
    fn dangling_origin_still_deals_damage() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("grunt", 100));

        let result = DamagePipeline::apply(
            &mut world,
            &mut NullSink,
            DamageRequest::new(id, -10, DamageTag::Physical).from_origin(ActorId(404)),
        )
        .expect("target exists");

        assert_eq!(result.effective_delta, 10);
    }

    #[test]
    fn missing_target_is_an_error() {
        let mut world = World::default();
        let err = DamagePipeline::apply(
            &mut world,
            &mut NullSink,
            DamageRequest::new(ActorId(9), -1, DamageTag::Physical),
        );
        assert!(matches!(err, Err(EngineError::ActorNotFound { .. })));
    }

    #[test]
    fn shield_absorbed_damage_is_not_credited() {
        let mut world = World::default();
        let id = spawn(&mut world, ActorTemplate::enemy("tank", 100).with_shield(50));
        let tower = spawn(&mut world, ActorTemplate::tower("arrow", 10));

        DamagePipeline::apply(
            &mut world,
            &mut NullSink,
            DamageRequest::new(id, -60, DamageTag::Physical).from_origin(tower),
        )
        .expect("target exists");

        assert_eq!(world.actor(tower).map(|t| t.attribution.damage_dealt), Some(10));
    }
}
