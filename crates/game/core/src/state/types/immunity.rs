//! Damage tags and immunity tags.
//!
//! An immunity is written the way content authors name it: `poison` (immune
//! outright), `poisonresist` (halved), `poisonvamp` (converted to healing), or
//! an effect name such as `slow` or `freeze`. Damage tags win when a name is
//! both a damage tag and an effect name, so `poison` means poison damage; the
//! attach path treats outright immunity to a damage tag as immunity to the
//! effects that deal it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::effect::EffectTag;

/// Category of incoming damage.
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
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DamageTag {
    Physical,
    Fire,
    Ice,
    Poison,
    Lightning,
    Magic,
    Explosion,
}

/// A single immunity an actor can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Immunity {
    /// Damage of this tag is ignored.
    Damage(DamageTag),
    /// Damage of this tag is reduced.
    Resist(DamageTag),
    /// Damage of this tag heals instead.
    Vamp(DamageTag),
    /// Effects of this kind cannot be attached.
    Effect(EffectTag),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown immunity tag '{0}'")]
pub struct UnknownImmunity(pub String);

impl fmt::Display for Immunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Damage(tag) => write!(f, "{tag}"),
            Self::Resist(tag) => write!(f, "{tag}resist"),
            Self::Vamp(tag) => write!(f, "{tag}vamp"),
            Self::Effect(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for Immunity {
    type Err = UnknownImmunity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(tag) = name
            .strip_suffix("resist")
            .and_then(|base| base.parse::<DamageTag>().ok())
        {
            return Ok(Self::Resist(tag));
        }
        if let Some(tag) = name
            .strip_suffix("vamp")
            .and_then(|base| base.parse::<DamageTag>().ok())
        {
            return Ok(Self::Vamp(tag));
        }
        if let Ok(tag) = name.parse::<DamageTag>() {
            return Ok(Self::Damage(tag));
        }
        if let Ok(tag) = name.parse::<EffectTag>() {
            return Ok(Self::Effect(tag));
        }
        Err(UnknownImmunity(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Immunity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Immunity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed set of immunities carried by an actor for its whole lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImmunitySet(BTreeSet<Immunity>);

impl ImmunitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, immunity: Immunity) -> bool {
        self.0.insert(immunity)
    }

    /// Raw membership test; callers decide whether nullification applies.
    pub fn contains(&self, immunity: &Immunity) -> bool {
        self.0.contains(immunity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Immunity> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Immunity> for ImmunitySet {
    fn from_iter<I: IntoIterator<Item = Immunity>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixed_and_plain_names() {
        assert_eq!("poisonresist".parse(), Ok(Immunity::Resist(DamageTag::Poison)));
        assert_eq!("firevamp".parse(), Ok(Immunity::Vamp(DamageTag::Fire)));
        assert_eq!("poison".parse(), Ok(Immunity::Damage(DamageTag::Poison)));
        assert_eq!("slow".parse(), Ok(Immunity::Effect(EffectTag::Slow)));
        assert_eq!("bad_poison".parse(), Ok(Immunity::Effect(EffectTag::BadPoison)));
        assert_eq!(
            "stoneskin".parse::<Immunity>(),
            Err(UnknownImmunity("stoneskin".to_string()))
        );
    }

    #[test]
    fn display_matches_parse() {
        for immunity in [
            Immunity::Damage(DamageTag::Ice),
            Immunity::Resist(DamageTag::Explosion),
            Immunity::Vamp(DamageTag::Poison),
            Immunity::Effect(EffectTag::Freeze),
        ] {
            assert_eq!(immunity.to_string().parse(), Ok(immunity));
        }
    }
}
