//! Recomputation of effective stats from live effects.

use super::snapshot::{StatSnapshot, StatusFlags};
use super::stack::RatioStack;
use crate::config::EngineConfig;
use crate::effect::{EffectKind, EffectRegistry, EffectTag, StackingPolicy};
use crate::state::{Actor, Immunity};

/// Pure stat aggregation over an actor's non-expired effect instances.
pub struct StatAggregator;

#[derive(Debug)]
struct Stacks {
    haste: RatioStack,
    slow: RatioStack,
    attack_boost: RatioStack,
    tran_ready: RatioStack,
    attack_down: RatioStack,
    damage_boost: RatioStack,
    damage_down: RatioStack,
    range_boost: RatioStack,
    range_down: RatioStack,
    corrosion: RatioStack,
    weaken: RatioStack,
    gold: RatioStack,
    boss_slayer: RatioStack,
}

impl Stacks {
    fn new() -> Self {
        let of = |tag: EffectTag| RatioStack::new(EffectRegistry::stacking_policy_of(tag));
        Self {
            haste: of(EffectTag::Haste),
            // Slow and Cold share one take-min stack.
            slow: RatioStack::new(StackingPolicy::TakeMin),
            attack_boost: of(EffectTag::AttackSpeedBoost),
            tran_ready: of(EffectTag::TranReady),
            attack_down: of(EffectTag::AttackSpeedDown),
            damage_boost: of(EffectTag::DamageBoost),
            damage_down: of(EffectTag::DamageDown),
            range_boost: of(EffectTag::RangeBoost),
            range_down: of(EffectTag::RangeDown),
            corrosion: of(EffectTag::Corrosion),
            weaken: of(EffectTag::Weaken),
            gold: of(EffectTag::Gold),
            boss_slayer: of(EffectTag::BossSlayer),
        }
    }
}

impl StatAggregator {
    /// Computes the effective stats of `actor` from scratch.
    pub fn aggregate(actor: &Actor, config: &EngineConfig) -> StatSnapshot {
        let mut stacks = Stacks::new();
        let mut flags = StatusFlags::empty();
        let mut charges: u32 = 0;

        for effect in actor.effects.active() {
            match *effect.kind() {
                EffectKind::Slow { ratio } | EffectKind::Cold { ratio } => stacks.slow.push(ratio),
                EffectKind::Haste { ratio } => stacks.haste.push(ratio),
                EffectKind::AttackSpeedBoost { ratio } => stacks.attack_boost.push(ratio),
                EffectKind::TranReady { ratio } => stacks.tran_ready.push(ratio),
                EffectKind::AttackSpeedDown { ratio } => stacks.attack_down.push(ratio),
                EffectKind::DamageBoost { ratio } => stacks.damage_boost.push(ratio),
                EffectKind::DamageDown { ratio } => stacks.damage_down.push(ratio),
                EffectKind::RangeBoost { ratio } => stacks.range_boost.push(ratio),
                EffectKind::RangeDown { ratio } => stacks.range_down.push(ratio),
                EffectKind::Corrosion { ratio } => stacks.corrosion.push(ratio),
                EffectKind::Weaken { ratio } => stacks.weaken.push(ratio),
                EffectKind::Gold { ratio } => stacks.gold.push(ratio),
                EffectKind::BossSlayer { ratio } => stacks.boss_slayer.push(ratio),
                EffectKind::MysteryShield { charges: c } => charges = charges.saturating_add(c),
                EffectKind::Freeze => flags |= StatusFlags::FROZEN,
                EffectKind::Stun => flags |= StatusFlags::STUNNED,
                EffectKind::Knockback => flags |= StatusFlags::KNOCKED_BACK,
                EffectKind::Poison { .. } | EffectKind::BadPoison { .. } => {
                    flags |= StatusFlags::POISONED
                }
                EffectKind::Burn { .. } => flags |= StatusFlags::BURNING,
                EffectKind::Nullify => flags |= StatusFlags::NULLIFIED,
                EffectKind::Silence => flags |= StatusFlags::SILENCED,
                EffectKind::Transcendent => flags |= StatusFlags::TRANSCENDENT,
                EffectKind::Camo => flags |= StatusFlags::CAMOUFLAGED,
                EffectKind::Invincible => flags |= StatusFlags::INVINCIBLE,
                EffectKind::Unstoppable => flags |= StatusFlags::UNSTOPPABLE,
                EffectKind::Regen { .. } => flags |= StatusFlags::REGENERATING,
                EffectKind::Stop => flags |= StatusFlags::STOPPED,
                EffectKind::Betray => flags |= StatusFlags::BETRAYED,
                EffectKind::SellBlock => flags |= StatusFlags::SELL_BLOCKED,
                EffectKind::Casting => flags |= StatusFlags::CASTING,
            }
        }

        if actor.is_nullified() {
            flags |= StatusFlags::NULLIFIED;
        }
        if actor.is_invincible() {
            flags |= StatusFlags::INVINCIBLE;
        }
        if actor.is_unstoppable() {
            flags |= StatusFlags::UNSTOPPABLE;
        }

        let slowed = !actor.is_immune_to(&Immunity::Effect(EffectTag::Slow))
            && !flags.contains(StatusFlags::UNSTOPPABLE);
        let speed = stacks.haste.resolve() * if slowed { stacks.slow.resolve() } else { 1.0 };

        let peak = 1.0 + (stacks.attack_boost.resolve() - 1.0) + (stacks.tran_ready.resolve() - 1.0);
        let mut divisor = stacks.attack_down.resolve();
        if divisor <= 0.0 {
            tracing::warn!(actor = %actor.id, divisor, "attack speed divisor not positive; using 1.0");
            divisor = 1.0;
        }

        let mut range = stacks.range_boost.resolve() * stacks.range_down.resolve();
        if flags.contains(StatusFlags::TRANSCENDENT) {
            range += config.transcendent_range_bonus;
        }

        StatSnapshot {
            speed,
            attack_speed: peak / divisor,
            damage: stacks.damage_boost.resolve() * stacks.damage_down.resolve(),
            range,
            heal: stacks.corrosion.resolve(),
            weaken: stacks.weaken.resolve(),
            gold: stacks.gold.resolve(),
            boss_damage: actor.boss_damage_ratio * stacks.boss_slayer.resolve(),
            mystery_shield_charges: charges,
            flags,
        }
    }
}
