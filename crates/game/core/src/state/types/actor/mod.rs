//! Actor state: enemies and towers.
//!
//! # Design Principles
//!
//! 1. **Clamped vitals**: `hp`, `max_hp` and `shield` are private and only
//!    change through methods that keep `0 <= hp <= max_hp`.
//! 2. **Flags vs. status**: [`ActorFlags`] holds stored truth (death,
//!    template traits). Derived status such as "stunned" lives in the cached
//!    [`StatSnapshot`] and is recomputed from the effect bag every tick.
//! 3. **Attribution**: counters credited to this actor as the origin of damage
//!    and kills are only written by the damage pipeline and the lifecycle
//!    controller.

mod template;

pub use template::{ActorKind, ActorTemplate, SpecialRule};

use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::common::{ActorId, Position};
use super::immunity::{Immunity, ImmunitySet};
use crate::config::EngineConfig;
use crate::effect::{EffectBag, EffectTag};
use crate::lifecycle::DeathHook;
use crate::stats::StatSnapshot;

bitflags! {
    /// Stored actor flags: lifecycle markers plus template traits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActorFlags: u16 {
        const DEAD        = 1 << 0;
        /// Ready to be dropped from its registry by the reaper.
        const EXPIRED     = 1 << 1;
        const INVINCIBLE  = 1 << 2;
        const NULLIFIED   = 1 << 3;
        const BOSS        = 1 << 4;
        /// Negative effects last only part of their duration.
        const STURDY      = 1 << 5;
        const UNSTOPPABLE = 1 << 6;
    }
}

/// Where an actor is in its life.
///
/// `Removed` is never reported by an actor itself; the world reports it for
/// ids that are no longer registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifeState {
    Alive,
    /// HP reached zero but the death transition has not run yet.
    Dying,
    Dead,
    Removed,
}

/// Damage and kills credited to an actor as an origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribution {
    pub damage_dealt: u64,
    pub kills: u32,
}

/// An enemy or a tower.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    /// Template key the actor was spawned from.
    pub name: String,
    pub position: Position,

    hp: u32,
    max_hp: u32,
    shield: u32,

    pub flags: ActorFlags,
    pub effects: EffectBag,
    pub immunities: ImmunitySet,
    pub attribution: Attribution,
    pub on_death: ArrayVec<DeathHook, { EngineConfig::MAX_DEATH_HOOKS }>,
    pub rules: Vec<SpecialRule>,
    pub bounty: u32,
    pub boss_damage_ratio: f64,

    /// Effective stats as of the last tick. Never persisted.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub stats: StatSnapshot,
}

impl Actor {
    /// Builds an actor from a template, clamping numbers into range.
    ///
    /// `max_hp` is raised to at least 1, shield is floored at 0, and death
    /// hooks beyond capacity are dropped with a warning.
    pub fn from_template(id: ActorId, template: &ActorTemplate, position: Position) -> Self {
        let max_hp = template.max_hp.clamp(1, i64::from(u32::MAX)) as u32;
        let shield = template.shield.clamp(0, i64::from(u32::MAX)) as u32;
        if template.max_hp < 1 {
            tracing::warn!(actor = %id, max_hp = template.max_hp, "max hp clamped to 1");
        }

        let boss_damage_ratio = if template.boss_damage_ratio.is_finite() {
            template.boss_damage_ratio
        } else {
            tracing::warn!(actor = %id, "non-finite boss damage ratio replaced by 1.0");
            1.0
        };

        let mut flags = ActorFlags::empty();
        flags.set(ActorFlags::BOSS, template.boss);
        flags.set(ActorFlags::STURDY, template.sturdy);
        flags.set(ActorFlags::UNSTOPPABLE, template.unstoppable);
        flags.set(ActorFlags::INVINCIBLE, template.invincible);
        flags.set(ActorFlags::NULLIFIED, template.nullified);

        let mut actor = Self {
            id,
            kind: template.kind,
            name: template.name.clone(),
            position,
            hp: max_hp,
            max_hp,
            shield,
            flags,
            effects: EffectBag::new(),
            immunities: template.immunities.iter().copied().collect(),
            attribution: Attribution::default(),
            on_death: ArrayVec::new(),
            rules: template.rules.clone(),
            bounty: template.bounty,
            boss_damage_ratio,
            stats: StatSnapshot::default(),
        };
        for hook in &template.on_death {
            actor.register_death_hook(*hook);
        }
        actor
    }

    // ========================================================================
    // Vitals
    // ========================================================================

    #[inline]
    pub fn hp(&self) -> u32 {
        self.hp
    }

    #[inline]
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    #[inline]
    pub fn shield(&self) -> u32 {
        self.shield
    }

    /// Sets HP, clamped into `[0, max_hp]`. Returns the stored value.
    pub fn set_hp(&mut self, hp: i64) -> u32 {
        self.hp = hp.clamp(0, i64::from(self.max_hp)) as u32;
        self.hp
    }

    pub fn add_shield(&mut self, amount: u32) {
        self.shield = self.shield.saturating_add(amount);
    }

    /// Lets the shield soak up to `damage` points and returns how much it took.
    pub fn absorb_into_shield(&mut self, damage: u32) -> u32 {
        let absorbed = self.shield.min(damage);
        self.shield -= absorbed;
        absorbed
    }

    // ========================================================================
    // Flags and derived traits
    // ========================================================================

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.flags.contains(ActorFlags::DEAD)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.flags.contains(ActorFlags::EXPIRED)
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.flags.contains(ActorFlags::BOSS)
    }

    #[inline]
    pub fn is_sturdy(&self) -> bool {
        self.flags.contains(ActorFlags::STURDY)
    }

    /// Trait or live Nullify effect.
    pub fn is_nullified(&self) -> bool {
        self.flags.contains(ActorFlags::NULLIFIED) || self.effects.has_active(EffectTag::Nullify)
    }

    /// Trait or live Invincible effect.
    pub fn is_invincible(&self) -> bool {
        self.flags.contains(ActorFlags::INVINCIBLE)
            || self.effects.has_active(EffectTag::Invincible)
    }

    /// Trait or live Unstoppable effect.
    pub fn is_unstoppable(&self) -> bool {
        self.flags.contains(ActorFlags::UNSTOPPABLE)
            || self.effects.has_active(EffectTag::Unstoppable)
    }

    /// Immunity check honouring nullification.
    pub fn is_immune_to(&self, immunity: &Immunity) -> bool {
        !self.is_nullified() && self.immunities.contains(immunity)
    }

    /// Whether an effect of `tag` is warded off by an immunity.
    ///
    /// Periodic damage effects are also warded off by outright immunity to
    /// the damage they deal.
    pub fn wards_off(&self, tag: EffectTag) -> bool {
        self.is_immune_to(&Immunity::Effect(tag))
            || tag
                .damage_tag()
                .is_some_and(|damage| self.is_immune_to(&Immunity::Damage(damage)))
    }

    pub fn life_state(&self) -> LifeState {
        if self.is_dead() {
            LifeState::Dead
        } else if self.hp == 0 {
            LifeState::Dying
        } else {
            LifeState::Alive
        }
    }

    // ========================================================================
    // Death hooks
    // ========================================================================

    /// Appends a death hook. Returns false (and logs) when the list is full
    /// or the actor is already dead.
    pub fn register_death_hook(&mut self, hook: DeathHook) -> bool {
        if self.is_dead() {
            tracing::warn!(actor = %self.id, hook = hook.name(), "hook registered on dead actor");
            return false;
        }
        match self.on_death.try_push(hook) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    actor = %self.id,
                    hook = hook.name(),
                    capacity = EngineConfig::MAX_DEATH_HOOKS,
                    "death hook list full"
                );
                false
            }
        }
    }

    /// Performs the stored part of the death transition and hands back the
    /// hooks to dispatch. Returns `None` if the actor was already dead.
    pub(crate) fn mark_dead(
        &mut self,
    ) -> Option<ArrayVec<DeathHook, { EngineConfig::MAX_DEATH_HOOKS }>> {
        if self.is_dead() {
            return None;
        }
        self.hp = 0;
        self.flags.insert(ActorFlags::DEAD | ActorFlags::EXPIRED);
        Some(std::mem::take(&mut self.on_death))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DamageTag;

    fn actor(template: ActorTemplate) -> Actor {
        Actor::from_template(ActorId(1), &template, Position::ORIGIN)
    }

    #[test]
    fn template_numbers_are_clamped() {
        let a = actor(ActorTemplate::enemy("ghost", -20).with_shield(-5));
        assert_eq!(a.max_hp(), 1);
        assert_eq!(a.hp(), 1);
        assert_eq!(a.shield(), 0);
    }

    #[test]
    fn hp_stays_within_bounds() {
        let mut a = actor(ActorTemplate::enemy("grunt", 100));
        assert_eq!(a.set_hp(150), 100);
        assert_eq!(a.set_hp(-3), 0);
        assert_eq!(a.life_state(), LifeState::Dying);
    }

    #[test]
    fn shield_saturates_and_absorbs() {
        let mut a = actor(ActorTemplate::enemy("grunt", 100).with_shield(30));
        assert_eq!(a.absorb_into_shield(100), 30);
        assert_eq!(a.shield(), 0);
        a.add_shield(u32::MAX);
        a.add_shield(10);
        assert_eq!(a.shield(), u32::MAX);
    }

    #[test]
    fn nullified_actor_loses_its_immunities() {
        let template = ActorTemplate::enemy("slime", 50)
            .with_immunity(Immunity::Damage(DamageTag::Poison))
            .with_immunity(Immunity::Effect(EffectTag::Slow));
        let a = actor(template.clone());
        assert!(a.wards_off(EffectTag::Poison));
        assert!(a.wards_off(EffectTag::BadPoison));
        assert!(a.wards_off(EffectTag::Slow));
        assert!(!a.wards_off(EffectTag::Burn));

        let n = actor(template.nullified());
        assert!(!n.wards_off(EffectTag::Slow));
        assert!(!n.is_immune_to(&Immunity::Damage(DamageTag::Poison)));
    }

    #[test]
    fn death_transition_happens_once() {
        let mut a = actor(ActorTemplate::enemy("grunt", 10).with_death_hook(DeathHook::Announce));
        let hooks = a.mark_dead().map(|h| h.len());
        assert_eq!(hooks, Some(1));
        assert!(a.is_dead() && a.is_expired());
        assert!(a.mark_dead().is_none());
        assert!(!a.register_death_hook(DeathHook::Announce));
    }

    #[test]
    fn hook_capacity_is_bounded() {
        let mut template = ActorTemplate::enemy("swarm", 10);
        for _ in 0..EngineConfig::MAX_DEATH_HOOKS + 2 {
            template = template.with_death_hook(DeathHook::Announce);
        }
        assert_eq!(actor(template).on_death.len(), EngineConfig::MAX_DEATH_HOOKS);
    }
}
