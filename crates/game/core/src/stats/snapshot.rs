//! StatSnapshot - effective stats of one actor at a point in time.
//!
//! The snapshot is derived entirely from the actor's template traits and its
//! live effect instances. It is cached on the actor by the per-tick update and
//! never persisted.

use bitflags::bitflags;

bitflags! {
    /// Status booleans derived from live effects (and traits where noted).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct StatusFlags: u32 {
        const STUNNED      = 1 << 0;
        const FROZEN       = 1 << 1;
        const KNOCKED_BACK = 1 << 2;
        const POISONED     = 1 << 3;
        const BURNING      = 1 << 4;
        /// Trait or effect.
        const NULLIFIED    = 1 << 5;
        const SILENCED     = 1 << 6;
        const CAMOUFLAGED  = 1 << 7;
        /// Trait or effect.
        const INVINCIBLE   = 1 << 8;
        /// Trait or effect.
        const UNSTOPPABLE  = 1 << 9;
        const STOPPED      = 1 << 10;
        const BETRAYED     = 1 << 11;
        const SELL_BLOCKED = 1 << 12;
        const CASTING      = 1 << 13;
        const REGENERATING = 1 << 14;
        const TRANSCENDENT = 1 << 15;

        const MOVEMENT_BLOCKED = Self::STUNNED.bits()
            | Self::FROZEN.bits()
            | Self::KNOCKED_BACK.bits()
            | Self::STOPPED.bits();
    }
}

/// Effective multipliers and derived status.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatSnapshot {
    /// Movement speed multiplier.
    pub speed: f64,
    /// Attack speed multiplier (higher attacks faster).
    pub attack_speed: f64,
    /// Outgoing damage multiplier.
    pub damage: f64,
    /// Range multiplier, including the flat transcendent bonus.
    pub range: f64,
    /// Healing received multiplier.
    pub heal: f64,
    /// Damage taken multiplier.
    pub weaken: f64,
    /// Bounty multiplier.
    pub gold: f64,
    /// Damage multiplier against bosses.
    pub boss_damage: f64,
    pub mystery_shield_charges: u32,
    pub flags: StatusFlags,
}

impl Default for StatSnapshot {
    fn default() -> Self {
        Self {
            speed: 1.0,
            attack_speed: 1.0,
            damage: 1.0,
            range: 1.0,
            heal: 1.0,
            weaken: 1.0,
            gold: 1.0,
            boss_damage: 1.0,
            mystery_shield_charges: 0,
            flags: StatusFlags::empty(),
        }
    }
}

impl StatSnapshot {
    #[inline]
    pub fn can_move(&self) -> bool {
        !self.flags.intersects(StatusFlags::MOVEMENT_BLOCKED)
    }

    #[inline]
    pub fn can_attack(&self) -> bool {
        !self.flags.contains(StatusFlags::STUNNED)
    }

    #[inline]
    pub fn can_cast(&self) -> bool {
        !self
            .flags
            .intersects(StatusFlags::STUNNED | StatusFlags::SILENCED)
    }
}
