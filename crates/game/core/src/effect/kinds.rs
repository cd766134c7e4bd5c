//! Closed set of status effect kinds.
//!
//! [`EffectKind`] carries the magnitudes of one effect; [`EffectTag`] is its
//! payload-free discriminant used for lookups, immunities and textual names.

use crate::state::DamageTag;

/// A status effect together with its kind-specific magnitudes.
///
/// Ratios are multipliers (`0.5` halves, `1.25` adds a quarter). Periods are
/// expressed in ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    // ========================================================================
    // Negative
    // ========================================================================
    /// Movement speed multiplier (< 1 slows).
    Slow { ratio: f64 },
    /// Chill; combines with Slow as a single take-min speed debuff.
    Cold { ratio: f64 },
    /// Cannot move.
    Freeze,
    /// Cannot move or attack.
    Stun,
    /// Being pushed back; cannot move on its own.
    Knockback,
    /// Periodic poison damage.
    Poison { damage: u32, period: u64 },
    /// Stronger poison tracked separately from Poison.
    BadPoison { damage: u32, period: u64 },
    /// Periodic fire damage.
    Burn { damage: u32, period: u64 },
    /// Damage-taken multiplier (> 1 increases damage).
    Weaken { ratio: f64 },
    /// Healing-received multiplier (< 1 reduces healing).
    Corrosion { ratio: f64 },
    /// Attack interval stretch; instances add up.
    AttackSpeedDown { ratio: f64 },
    /// Outgoing damage multiplier; instances multiply.
    DamageDown { ratio: f64 },
    /// Range multiplier (< 1 shrinks).
    RangeDown { ratio: f64 },
    /// Immunities are disabled.
    Nullify,
    /// Cannot cast abilities.
    Silence,

    // ========================================================================
    // Positive
    // ========================================================================
    /// Movement speed multiplier (> 1 hastens).
    Haste { ratio: f64 },
    /// Attack speed multiplier; only the strongest counts.
    AttackSpeedBoost { ratio: f64 },
    /// Secondary attack speed multiplier stacked on top of the boost.
    TranReady { ratio: f64 },
    /// Outgoing damage bonus; instances add up.
    DamageBoost { ratio: f64 },
    /// Range multiplier; only the strongest counts.
    RangeBoost { ratio: f64 },
    /// Flat range bonus.
    Transcendent,
    /// Charge-based ward that swallows incoming negative effects.
    MysteryShield { charges: u32 },
    /// Hidden from targeting.
    Camo,
    /// Ignores incoming damage.
    Invincible,
    /// Ignores slows.
    Unstoppable,
    /// Periodic healing.
    Regen { heal: u32, period: u64 },
    /// Damage multiplier against bosses.
    BossSlayer { ratio: f64 },

    // ========================================================================
    // Neutral
    // ========================================================================
    /// Halted in place.
    Stop,
    /// Walking the wrong way.
    Betray,
    /// Tower cannot be sold.
    SellBlock,
    /// Busy channelling an ability.
    Casting,
    /// Bounty multiplier paid on death.
    Gold { ratio: f64 },
}

/// Payload-free discriminant of [`EffectKind`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectTag {
    Slow,
    Cold,
    Freeze,
    Stun,
    Knockback,
    Poison,
    BadPoison,
    Burn,
    Weaken,
    Corrosion,
    AttackSpeedDown,
    DamageDown,
    RangeDown,
    Nullify,
    Silence,
    Haste,
    AttackSpeedBoost,
    TranReady,
    DamageBoost,
    RangeBoost,
    Transcendent,
    MysteryShield,
    Camo,
    Invincible,
    Unstoppable,
    Regen,
    BossSlayer,
    Stop,
    Betray,
    SellBlock,
    Casting,
    Gold,
}

/// Health delta an effect issues on each of its periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Periodic {
    /// Signed delta: negative for damage, positive for healing.
    pub delta: i64,
    pub period: u64,
    pub tag: DamageTag,
}

impl EffectKind {
    /// Returns the payload-free tag of this effect.
    pub const fn tag(&self) -> EffectTag {
        match self {
            Self::Slow { .. } => EffectTag::Slow,
            Self::Cold { .. } => EffectTag::Cold,
            Self::Freeze => EffectTag::Freeze,
            Self::Stun => EffectTag::Stun,
            Self::Knockback => EffectTag::Knockback,
            Self::Poison { .. } => EffectTag::Poison,
            Self::BadPoison { .. } => EffectTag::BadPoison,
            Self::Burn { .. } => EffectTag::Burn,
            Self::Weaken { .. } => EffectTag::Weaken,
            Self::Corrosion { .. } => EffectTag::Corrosion,
            Self::AttackSpeedDown { .. } => EffectTag::AttackSpeedDown,
            Self::DamageDown { .. } => EffectTag::DamageDown,
            Self::RangeDown { .. } => EffectTag::RangeDown,
            Self::Nullify => EffectTag::Nullify,
            Self::Silence => EffectTag::Silence,
            Self::Haste { .. } => EffectTag::Haste,
            Self::AttackSpeedBoost { .. } => EffectTag::AttackSpeedBoost,
            Self::TranReady { .. } => EffectTag::TranReady,
            Self::DamageBoost { .. } => EffectTag::DamageBoost,
            Self::RangeBoost { .. } => EffectTag::RangeBoost,
            Self::Transcendent => EffectTag::Transcendent,
            Self::MysteryShield { .. } => EffectTag::MysteryShield,
            Self::Camo => EffectTag::Camo,
            Self::Invincible => EffectTag::Invincible,
            Self::Unstoppable => EffectTag::Unstoppable,
            Self::Regen { .. } => EffectTag::Regen,
            Self::BossSlayer { .. } => EffectTag::BossSlayer,
            Self::Stop => EffectTag::Stop,
            Self::Betray => EffectTag::Betray,
            Self::SellBlock => EffectTag::SellBlock,
            Self::Casting => EffectTag::Casting,
            Self::Gold { .. } => EffectTag::Gold,
        }
    }

    /// Multiplier carried by ratio-based kinds.
    pub const fn ratio(&self) -> Option<f64> {
        match *self {
            Self::Slow { ratio }
            | Self::Cold { ratio }
            | Self::Weaken { ratio }
            | Self::Corrosion { ratio }
            | Self::AttackSpeedDown { ratio }
            | Self::DamageDown { ratio }
            | Self::RangeDown { ratio }
            | Self::Haste { ratio }
            | Self::AttackSpeedBoost { ratio }
            | Self::TranReady { ratio }
            | Self::DamageBoost { ratio }
            | Self::RangeBoost { ratio }
            | Self::BossSlayer { ratio }
            | Self::Gold { ratio } => Some(ratio),
            _ => None,
        }
    }

    /// Integer amount: periodic damage or healing, or shield charges.
    pub const fn amount(&self) -> Option<u32> {
        match *self {
            Self::Poison { damage, .. }
            | Self::BadPoison { damage, .. }
            | Self::Burn { damage, .. } => Some(damage),
            Self::Regen { heal, .. } => Some(heal),
            Self::MysteryShield { charges } => Some(charges),
            _ => None,
        }
    }

    /// Pulse interval of periodic kinds.
    pub const fn period(&self) -> Option<u64> {
        match *self {
            Self::Poison { period, .. }
            | Self::BadPoison { period, .. }
            | Self::Burn { period, .. }
            | Self::Regen { period, .. } => Some(period),
            _ => None,
        }
    }

    /// Replaces whichever magnitudes this kind carries; absent values keep
    /// their current setting and magnitudes the kind does not have are ignored.
    pub fn with_magnitudes(
        mut self,
        ratio: Option<f64>,
        amount: Option<u32>,
        period: Option<u64>,
    ) -> Self {
        match &mut self {
            Self::Slow { ratio: r }
            | Self::Cold { ratio: r }
            | Self::Weaken { ratio: r }
            | Self::Corrosion { ratio: r }
            | Self::AttackSpeedDown { ratio: r }
            | Self::DamageDown { ratio: r }
            | Self::RangeDown { ratio: r }
            | Self::Haste { ratio: r }
            | Self::AttackSpeedBoost { ratio: r }
            | Self::TranReady { ratio: r }
            | Self::DamageBoost { ratio: r }
            | Self::RangeBoost { ratio: r }
            | Self::BossSlayer { ratio: r }
            | Self::Gold { ratio: r } => {
                if let Some(ratio) = ratio {
                    *r = ratio;
                }
            }
            Self::Poison { damage: a, period: p }
            | Self::BadPoison { damage: a, period: p }
            | Self::Burn { damage: a, period: p }
            | Self::Regen { heal: a, period: p } => {
                if let Some(amount) = amount {
                    *a = amount;
                }
                if let Some(period) = period {
                    *p = period;
                }
            }
            Self::MysteryShield { charges } => {
                if let Some(amount) = amount {
                    *charges = amount;
                }
            }
            Self::Freeze
            | Self::Stun
            | Self::Knockback
            | Self::Nullify
            | Self::Silence
            | Self::Transcendent
            | Self::Camo
            | Self::Invincible
            | Self::Unstoppable
            | Self::Stop
            | Self::Betray
            | Self::SellBlock
            | Self::Casting => {}
        }
        self
    }

    /// Health delta issued every `period` ticks, for damage-over-time and
    /// regeneration kinds.
    pub const fn periodic(&self) -> Option<Periodic> {
        match *self {
            Self::Poison { damage, period } | Self::BadPoison { damage, period } => {
                Some(Periodic {
                    delta: -(damage as i64),
                    period,
                    tag: DamageTag::Poison,
                })
            }
            Self::Burn { damage, period } => Some(Periodic {
                delta: -(damage as i64),
                period,
                tag: DamageTag::Fire,
            }),
            Self::Regen { heal, period } => Some(Periodic {
                delta: heal as i64,
                period,
                tag: DamageTag::Magic,
            }),
            _ => None,
        }
    }
}

impl EffectTag {
    /// Damage tag whose outright immunity also wards off this effect.
    pub const fn damage_tag(&self) -> Option<DamageTag> {
        match self {
            Self::Poison | Self::BadPoison => Some(DamageTag::Poison),
            Self::Burn => Some(DamageTag::Fire),
            _ => None,
        }
    }
}
