//! Flat persistence form of effect instances.
//!
//! A save file stores each instance field by field with a textual kind name.
//! Reconstruction goes through [`EffectRegistry::prototype`], so a record
//! written by an older build with fewer kinds still loads, and a record naming
//! a kind this build does not know is skipped with a warning.

use super::instance::{EffectSpec, StatusEffectInstance};
use super::registry::EffectRegistry;
use crate::state::{ActorId, EffectId, Tick};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRecord {
    pub id: u64,
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ratio: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub amount: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub period: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: Option<u32>,
    pub start: u64,
    pub duration: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub expired: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sturdy_halved: bool,
}

impl EffectRecord {
    /// Captures every field of an instance verbatim.
    pub fn capture(effect: &StatusEffectInstance) -> Self {
        let kind = effect.kind();
        Self {
            id: effect.id().0,
            kind: effect.tag().to_string(),
            ratio: kind.ratio(),
            amount: kind.amount(),
            period: kind.period(),
            origin: effect.origin().map(|o| o.0),
            start: effect.start().0,
            duration: effect.duration(),
            expired: effect.is_expired(),
            sturdy_halved: effect.sturdy_halved(),
        }
    }

    /// Rebuilds the instance, or `None` if the kind name is unknown.
    pub fn restore(&self) -> Option<StatusEffectInstance> {
        let tag = EffectRegistry::parse_tag(&self.kind)?;
        let kind = EffectRegistry::prototype(tag).with_magnitudes(self.ratio, self.amount, self.period);
        let spec = EffectSpec {
            kind,
            duration: self.duration,
            origin: self.origin.map(ActorId),
        };
        let mut effect =
            StatusEffectInstance::new(EffectId(self.id), spec, Tick(self.start), self.sturdy_halved);
        if self.expired {
            effect.expire();
        }
        Some(effect)
    }
}
