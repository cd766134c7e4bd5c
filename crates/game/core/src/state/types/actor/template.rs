//! Spawn-time description of an actor.
//!
//! Templates come from content files or are built in code with the builder
//! methods. They carry raw, unvalidated numbers; [`Actor::from_template`]
//! clamps them into range.
//!
//! [`Actor::from_template`]: super::Actor::from_template

use crate::lifecycle::DeathHook;
use crate::state::types::immunity::{DamageTag, Immunity};

/// Which registry an actor lives in.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[strum(serialize_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Enemy,
    Tower,
}

/// Data-driven rule that reshapes incoming damage for one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialRule {
    /// Only damage carrying one of these tags gets through.
    DamageTypeFilter { allowed: Vec<DamageTag> },
    /// No single hit deals more than `max`.
    DamageCap { max: u32 },
}

impl SpecialRule {
    /// Reshapes a negative delta. Positive deltas pass through untouched.
    pub fn reshape(&self, delta: f64, tag: DamageTag) -> f64 {
        if delta >= 0.0 {
            return delta;
        }
        match self {
            Self::DamageTypeFilter { allowed } if !allowed.contains(&tag) => 0.0,
            Self::DamageTypeFilter { .. } => delta,
            Self::DamageCap { max } => delta.max(-f64::from(*max)),
        }
    }
}

/// Blueprint for spawning an actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ActorTemplate {
    pub name: String,
    pub kind: ActorKind,
    pub max_hp: i64,
    pub shield: i64,
    /// Gold paid to the player when this actor is killed.
    pub bounty: u32,
    /// Multiplier applied to this actor's damage against bosses.
    pub boss_damage_ratio: f64,
    pub boss: bool,
    pub sturdy: bool,
    pub unstoppable: bool,
    pub invincible: bool,
    pub nullified: bool,
    pub immunities: Vec<Immunity>,
    pub rules: Vec<SpecialRule>,
    pub on_death: Vec<DeathHook>,
}

impl Default for ActorTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: ActorKind::Enemy,
            max_hp: 1,
            shield: 0,
            bounty: 0,
            boss_damage_ratio: 1.0,
            boss: false,
            sturdy: false,
            unstoppable: false,
            invincible: false,
            nullified: false,
            immunities: Vec::new(),
            rules: Vec::new(),
            on_death: Vec::new(),
        }
    }
}

impl ActorTemplate {
    pub fn enemy(name: impl Into<String>, max_hp: i64) -> Self {
        Self {
            name: name.into(),
            kind: ActorKind::Enemy,
            max_hp,
            ..Self::default()
        }
    }

    pub fn tower(name: impl Into<String>, max_hp: i64) -> Self {
        Self {
            name: name.into(),
            kind: ActorKind::Tower,
            max_hp,
            ..Self::default()
        }
    }

    pub fn with_shield(mut self, shield: i64) -> Self {
        self.shield = shield;
        self
    }

    pub fn with_bounty(mut self, bounty: u32) -> Self {
        self.bounty = bounty;
        self
    }

    pub fn with_boss_damage_ratio(mut self, ratio: f64) -> Self {
        self.boss_damage_ratio = ratio;
        self
    }

    pub fn with_immunity(mut self, immunity: Immunity) -> Self {
        self.immunities.push(immunity);
        self
    }

    pub fn with_rule(mut self, rule: SpecialRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_death_hook(mut self, hook: DeathHook) -> Self {
        self.on_death.push(hook);
        self
    }

    pub fn boss(mut self) -> Self {
        self.boss = true;
        self
    }

    pub fn sturdy(mut self) -> Self {
        self.sturdy = true;
        self
    }

    pub fn unstoppable(mut self) -> Self {
        self.unstoppable = true;
        self
    }

    pub fn invincible(mut self) -> Self {
        self.invincible = true;
        self
    }

    pub fn nullified(mut self) -> Self {
        self.nullified = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_zeroes_disallowed_damage_only() {
        let rule = SpecialRule::DamageTypeFilter {
            allowed: vec![DamageTag::Magic],
        };
        assert_eq!(rule.reshape(-40.0, DamageTag::Physical), 0.0);
        assert_eq!(rule.reshape(-40.0, DamageTag::Magic), -40.0);
        assert_eq!(rule.reshape(15.0, DamageTag::Physical), 15.0);
    }

    #[test]
    fn cap_limits_a_single_hit() {
        let rule = SpecialRule::DamageCap { max: 25 };
        assert_eq!(rule.reshape(-100.0, DamageTag::Fire), -25.0);
        assert_eq!(rule.reshape(-10.0, DamageTag::Fire), -10.0);
    }
}
