//! Static classification of effect kinds.

use strum::IntoEnumIterator;

use super::kinds::{EffectKind, EffectTag};

/// Whether an effect helps, hurts, or neither.
///
/// Polarity decides shield interception (only negative effects are
/// intercepted) and drives bulk removal selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

/// How simultaneous instances of the same category combine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StackingPolicy {
    /// Strongest debuff wins (smallest ratio).
    TakeMin,
    /// Strongest buff wins (largest ratio).
    TakeMax,
    /// `1 + Σ(ratio - 1)`.
    Additive,
    /// `Π ratio`.
    Multiplicative,
    /// Every instance acts on its own (flags, periodic pulses).
    Independent,
}

/// Pure lookup tables over the closed set of effect kinds.
pub struct EffectRegistry;

impl EffectRegistry {
    pub const fn polarity_of(tag: EffectTag) -> Polarity {
        use EffectTag::*;
        match tag {
            Slow | Cold | Freeze | Stun | Knockback | Poison | BadPoison | Burn | Weaken
            | Corrosion | AttackSpeedDown | DamageDown | RangeDown | Nullify | Silence => {
                Polarity::Negative
            }
            Haste | AttackSpeedBoost | TranReady | DamageBoost | RangeBoost | Transcendent
            | MysteryShield | Camo | Invincible | Unstoppable | Regen | BossSlayer => {
                Polarity::Positive
            }
            Stop | Betray | SellBlock | Casting | Gold => Polarity::Neutral,
        }
    }

    pub const fn stacking_policy_of(tag: EffectTag) -> StackingPolicy {
        use EffectTag::*;
        match tag {
            Slow | Cold | Corrosion | RangeDown => StackingPolicy::TakeMin,
            Weaken | Haste | AttackSpeedBoost | TranReady | RangeBoost | BossSlayer | Gold => {
                StackingPolicy::TakeMax
            }
            AttackSpeedDown | DamageBoost | MysteryShield => StackingPolicy::Additive,
            DamageDown => StackingPolicy::Multiplicative,
            Freeze | Stun | Knockback | Poison | BadPoison | Burn | Nullify | Silence
            | Transcendent | Camo | Invincible | Unstoppable | Regen | Stop | Betray
            | SellBlock | Casting => StackingPolicy::Independent,
        }
    }

    /// Parses a textual effect name, logging names that match no kind.
    pub fn parse_tag(name: &str) -> Option<EffectTag> {
        match name.parse::<EffectTag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                tracing::warn!(kind = name, "unknown effect kind");
                None
            }
        }
    }

    /// Classifies a textual effect name.
    ///
    /// Unknown names are logged and treated as neutral and independent so
    /// that a bad content entry never takes aggregation down.
    pub fn classify_name(name: &str) -> (Polarity, StackingPolicy) {
        match Self::parse_tag(name) {
            Some(tag) => (Self::polarity_of(tag), Self::stacking_policy_of(tag)),
            None => (Polarity::Neutral, StackingPolicy::Independent),
        }
    }

    /// Default-magnitude prototype for a tag.
    ///
    /// Ratios start at the identity `1.0`, amounts at zero, periods at one
    /// tick and shields at a single charge. Reconstruction fills in the real
    /// magnitudes with [`EffectKind::with_magnitudes`].
    pub const fn prototype(tag: EffectTag) -> EffectKind {
        const RATIO: f64 = 1.0;
        const PERIOD: u64 = 1;
        match tag {
            EffectTag::Slow => EffectKind::Slow { ratio: RATIO },
            EffectTag::Cold => EffectKind::Cold { ratio: RATIO },
            EffectTag::Freeze => EffectKind::Freeze,
            EffectTag::Stun => EffectKind::Stun,
            EffectTag::Knockback => EffectKind::Knockback,
            EffectTag::Poison => EffectKind::Poison {
                damage: 0,
                period: PERIOD,
            },
            EffectTag::BadPoison => EffectKind::BadPoison {
                damage: 0,
                period: PERIOD,
            },
            EffectTag::Burn => EffectKind::Burn {
                damage: 0,
                period: PERIOD,
            },
            EffectTag::Weaken => EffectKind::Weaken { ratio: RATIO },
            EffectTag::Corrosion => EffectKind::Corrosion { ratio: RATIO },
            EffectTag::AttackSpeedDown => EffectKind::AttackSpeedDown { ratio: RATIO },
            EffectTag::DamageDown => EffectKind::DamageDown { ratio: RATIO },
            EffectTag::RangeDown => EffectKind::RangeDown { ratio: RATIO },
            EffectTag::Nullify => EffectKind::Nullify,
            EffectTag::Silence => EffectKind::Silence,
            EffectTag::Haste => EffectKind::Haste { ratio: RATIO },
            EffectTag::AttackSpeedBoost => EffectKind::AttackSpeedBoost { ratio: RATIO },
            EffectTag::TranReady => EffectKind::TranReady { ratio: RATIO },
            EffectTag::DamageBoost => EffectKind::DamageBoost { ratio: RATIO },
            EffectTag::RangeBoost => EffectKind::RangeBoost { ratio: RATIO },
            EffectTag::Transcendent => EffectKind::Transcendent,
            EffectTag::MysteryShield => EffectKind::MysteryShield { charges: 1 },
            EffectTag::Camo => EffectKind::Camo,
            EffectTag::Invincible => EffectKind::Invincible,
            EffectTag::Unstoppable => EffectKind::Unstoppable,
            EffectTag::Regen => EffectKind::Regen {
                heal: 0,
                period: PERIOD,
            },
            EffectTag::BossSlayer => EffectKind::BossSlayer { ratio: RATIO },
            EffectTag::Stop => EffectKind::Stop,
            EffectTag::Betray => EffectKind::Betray,
            EffectTag::SellBlock => EffectKind::SellBlock,
            EffectTag::Casting => EffectKind::Casting,
            EffectTag::Gold => EffectKind::Gold { ratio: RATIO },
        }
    }

    /// All tags of the given polarity, in declaration order.
    pub fn tags_with(polarity: Polarity) -> impl Iterator<Item = EffectTag> {
        EffectTag::iter().filter(move |tag| Self::polarity_of(*tag) == polarity)
    }
}

impl EffectKind {
    #[inline]
    pub const fn polarity(&self) -> Polarity {
        EffectRegistry::polarity_of(self.tag())
    }

    #[inline]
    pub const fn stacking_policy(&self) -> StackingPolicy {
        EffectRegistry::stacking_policy_of(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_partition_covers_every_kind() {
        let negative = EffectRegistry::tags_with(Polarity::Negative).count();
        let positive = EffectRegistry::tags_with(Polarity::Positive).count();
        let neutral = EffectRegistry::tags_with(Polarity::Neutral).count();

        assert_eq!(negative, 15);
        assert_eq!(positive, 12);
        assert_eq!(neutral, 5);
        assert_eq!(negative + positive + neutral, EffectTag::iter().count());
    }

    #[test]
    fn combination_rules_match_categories() {
        assert_eq!(
            EffectRegistry::stacking_policy_of(EffectTag::Slow),
            StackingPolicy::TakeMin
        );
        assert_eq!(
            EffectRegistry::stacking_policy_of(EffectTag::Weaken),
            StackingPolicy::TakeMax
        );
        assert_eq!(
            EffectRegistry::stacking_policy_of(EffectTag::AttackSpeedDown),
            StackingPolicy::Additive
        );
        assert_eq!(
            EffectRegistry::stacking_policy_of(EffectTag::DamageDown),
            StackingPolicy::Multiplicative
        );
        assert_eq!(
            EffectRegistry::stacking_policy_of(EffectTag::Stun),
            StackingPolicy::Independent
        );
    }

    #[test]
    fn unknown_names_degrade_to_neutral_independent() {
        assert_eq!(
            EffectRegistry::classify_name("definitely_not_a_kind"),
            (Polarity::Neutral, StackingPolicy::Independent)
        );
        assert_eq!(
            EffectRegistry::classify_name("bad_poison"),
            (Polarity::Negative, StackingPolicy::Independent)
        );
    }

    #[test]
    fn prototypes_carry_their_own_tag() {
        for tag in EffectTag::iter() {
            assert_eq!(EffectRegistry::prototype(tag).tag(), tag);
        }
    }
}
