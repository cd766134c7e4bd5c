//! Per-actor collection of live status effects.
//!
//! # Tick-based Duration
//!
//! Instances store their start tick and duration. The owner's tick calls
//! [`EffectBag::sweep`] once, which flags every instance whose time is up and
//! drops all flagged instances in the same pass. Instances flagged early by
//! [`EffectBag::remove_by`] stay in the bag until that sweep, but aggregation
//! already skips them.

use super::instance::StatusEffectInstance;
use super::kinds::EffectTag;
use super::registry::Polarity;
use crate::state::{ActorId, EffectId, Tick};

/// Insertion-ordered set of effect instances owned by one actor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectBag {
    effects: Vec<StatusEffectInstance>,
}

/// Which instances a bulk removal targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSelector {
    All,
    Polarity(Polarity),
    Tag(EffectTag),
    Id(EffectId),
}

impl EffectSelector {
    pub fn matches(&self, effect: &StatusEffectInstance) -> bool {
        match self {
            Self::All => true,
            Self::Polarity(polarity) => effect.polarity() == *polarity,
            Self::Tag(tag) => effect.tag() == *tag,
            Self::Id(id) => effect.id() == *id,
        }
    }
}

impl EffectBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an instance. Whether the attempt should go ahead at all is
    /// decided before this call.
    pub fn insert(&mut self, effect: StatusEffectInstance) {
        self.effects.push(effect);
    }

    /// Flags every instance whose duration has run out at `now`, then drops
    /// all flagged instances. Returns the dropped instances in bag order.
    pub fn sweep(&mut self, now: Tick, sturdy_percent: u32) -> Vec<StatusEffectInstance> {
        for effect in &mut self.effects {
            if !effect.is_expired() && effect.has_run_out(now, sturdy_percent) {
                effect.expire();
            }
        }

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(StatusEffectInstance::is_expired);
        self.effects = kept;
        removed
    }

    /// Flags every live instance matching `predicate`. Physical removal
    /// happens on the next sweep. Returns how many instances were flagged.
    pub fn remove_by(&mut self, mut predicate: impl FnMut(&StatusEffectInstance) -> bool) -> usize {
        let mut flagged = 0;
        for effect in self.effects.iter_mut().filter(|e| !e.is_expired()) {
            if predicate(effect) {
                effect.expire();
                flagged += 1;
            }
        }
        flagged
    }

    /// Flags live instances picked by `selector`, optionally restricted to a
    /// single origin.
    pub fn remove_selected(&mut self, selector: EffectSelector, origin: Option<ActorId>) -> usize {
        self.remove_by(|effect| {
            selector.matches(effect) && origin.is_none_or(|o| effect.origin() == Some(o))
        })
    }

    /// Live (not yet flagged) instances in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter().filter(|e| !e.is_expired())
    }

    /// All instances, including those flagged but not yet swept.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    /// Checks whether a live instance of `tag` is present.
    pub fn has_active(&self, tag: EffectTag) -> bool {
        self.active().any(|e| e.tag() == tag)
    }

    /// Checks whether a live instance of `tag` from `origin` is present.
    pub fn has_active_from(&self, tag: EffectTag, origin: ActorId) -> bool {
        self.active()
            .any(|e| e.tag() == tag && e.origin() == Some(origin))
    }

    pub fn get(&self, id: EffectId) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.id() == id)
    }

    /// Instance at `index` in insertion order.
    pub(crate) fn get_at_mut(&mut self, index: usize) -> Option<&mut StatusEffectInstance> {
        self.effects.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl FromIterator<StatusEffectInstance> for EffectBag {
    fn from_iter<I: IntoIterator<Item = StatusEffectInstance>>(iter: I) -> Self {
        Self {
            effects: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectKind, EffectSpec};

    fn push(bag: &mut EffectBag, id: u64, kind: EffectKind, start: u64, duration: u64) {
        bag.insert(StatusEffectInstance::new(
            EffectId(id),
            EffectSpec::new(kind, duration),
            Tick(start),
            false,
        ));
    }

    #[test]
    fn sweep_drops_run_out_instances_and_keeps_order() {
        let mut bag = EffectBag::new();
        push(&mut bag, 1, EffectKind::Stun, 0, 5);
        push(&mut bag, 2, EffectKind::Slow { ratio: 0.5 }, 0, 50);
        push(&mut bag, 3, EffectKind::Camo, 0, 50);

        let removed = bag.sweep(Tick(5), 50);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), EffectId(1));
        let ids: Vec<_> = bag.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![EffectId(2), EffectId(3)]);
    }

    #[test]
    fn removal_is_deferred_until_the_next_sweep() {
        let mut bag = EffectBag::new();
        push(&mut bag, 1, EffectKind::Haste { ratio: 1.5 }, 0, 100);
        push(&mut bag, 2, EffectKind::Weaken { ratio: 1.2 }, 0, 100);

        let flagged = bag.remove_selected(EffectSelector::Polarity(Polarity::Positive), None);

        assert_eq!(flagged, 1);
        assert_eq!(bag.len(), 2);
        assert!(!bag.has_active(EffectTag::Haste));
        assert_eq!(bag.active().count(), 1);

        bag.sweep(Tick(1), 50);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn origin_filter_limits_removal() {
        let mut bag = EffectBag::new();
        let a = ActorId(1);
        let b = ActorId(2);
        bag.insert(StatusEffectInstance::new(
            EffectId(1),
            EffectSpec::new(EffectKind::Slow { ratio: 0.5 }, 10).from_origin(a),
            Tick(0),
            false,
        ));
        bag.insert(StatusEffectInstance::new(
            EffectId(2),
            EffectSpec::new(EffectKind::Slow { ratio: 0.7 }, 10).from_origin(b),
            Tick(0),
            false,
        ));

        assert_eq!(bag.remove_selected(EffectSelector::Tag(EffectTag::Slow), Some(a)), 1);
        assert!(!bag.has_active_from(EffectTag::Slow, a));
        assert!(bag.has_active_from(EffectTag::Slow, b));
    }
}
