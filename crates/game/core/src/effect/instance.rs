//! Status effect instances attached to actors.

use super::kinds::{EffectKind, EffectTag};
use super::registry::Polarity;
use crate::state::{ActorId, EffectId, Tick};

/// Request to attach an effect: what, for how long, and on whose behalf.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub kind: EffectKind,
    /// Lifetime in ticks.
    pub duration: u64,
    pub origin: Option<ActorId>,
}

impl EffectSpec {
    pub fn new(kind: EffectKind, duration: u64) -> Self {
        Self {
            kind,
            duration,
            origin: None,
        }
    }

    /// Builder: attribute the effect to an actor.
    pub fn from_origin(mut self, origin: ActorId) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// A single live effect on an actor.
///
/// Fixed at creation except for the `expired` flag (set by the expiry sweep
/// or an explicit removal) and the remaining charges of a mystery shield
/// (spent by the shield arbiter).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    id: EffectId,
    kind: EffectKind,
    polarity: Polarity,
    origin: Option<ActorId>,
    start: Tick,
    duration: u64,
    expired: bool,
    /// Captured at insertion: the owner was sturdy and the effect negative.
    sturdy_halved: bool,
}

impl StatusEffectInstance {
    pub fn new(id: EffectId, spec: EffectSpec, start: Tick, sturdy_halved: bool) -> Self {
        Self {
            id,
            kind: spec.kind,
            polarity: spec.kind.polarity(),
            origin: spec.origin,
            start,
            duration: spec.duration,
            expired: false,
            sturdy_halved,
        }
    }

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    pub fn tag(&self) -> EffectTag {
        self.kind.tag()
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn origin(&self) -> Option<ActorId> {
        self.origin
    }

    pub fn start(&self) -> Tick {
        self.start
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Absolute tick at which the nominal duration runs out.
    pub fn expires_at(&self) -> Tick {
        self.start + self.duration
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn sturdy_halved(&self) -> bool {
        self.sturdy_halved
    }

    /// Remaining mystery shield charges, `None` for any other kind.
    pub fn charges(&self) -> Option<u32> {
        match self.kind {
            EffectKind::MysteryShield { charges } => Some(charges),
            _ => None,
        }
    }

    /// Whether the instance has outlived its duration at `now`.
    ///
    /// The sturdy check runs first: a sturdy-halved effect ends once the
    /// configured share of its duration has elapsed.
    pub fn has_run_out(&self, now: Tick, sturdy_percent: u32) -> bool {
        let elapsed = now.since(self.start);
        if self.sturdy_halved
            && elapsed.saturating_mul(100) >= self.duration.saturating_mul(sturdy_percent as u64)
        {
            return true;
        }
        elapsed >= self.duration
    }

    /// Signed health delta due at `now`, if this is a periodic effect whose
    /// period boundary falls on this tick.
    pub fn pulse_at(&self, now: Tick) -> Option<(i64, crate::state::DamageTag)> {
        if self.expired {
            return None;
        }
        let periodic = self.kind.periodic()?;
        let elapsed = now.since(self.start);
        if periodic.period == 0 || elapsed == 0 || elapsed % periodic.period != 0 {
            return None;
        }
        Some((periodic.delta, periodic.tag))
    }

    pub(crate) fn reassign_id(&mut self, id: EffectId) {
        self.id = id;
    }

    pub(crate) fn expire(&mut self) {
        self.expired = true;
    }

    /// Spends one mystery shield charge and returns how many remain.
    pub(crate) fn consume_charge(&mut self) -> u32 {
        match &mut self.kind {
            EffectKind::MysteryShield { charges } => {
                *charges = charges.saturating_sub(1);
                *charges
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(kind: EffectKind, duration: u64, sturdy: bool) -> StatusEffectInstance {
        StatusEffectInstance::new(
            EffectId(1),
            EffectSpec::new(kind, duration),
            Tick(10),
            sturdy,
        )
    }

    #[test]
    fn runs_out_after_full_duration() {
        let slow = instance(EffectKind::Slow { ratio: 0.5 }, 20, false);
        assert!(!slow.has_run_out(Tick(29), 50));
        assert!(slow.has_run_out(Tick(30), 50));
    }

    #[test]
    fn sturdy_halved_runs_out_at_half_duration() {
        let slow = instance(EffectKind::Slow { ratio: 0.5 }, 20, true);
        assert!(!slow.has_run_out(Tick(19), 50));
        assert!(slow.has_run_out(Tick(20), 50));
    }

    #[test]
    fn pulses_on_period_boundaries_only() {
        let poison = instance(EffectKind::Poison { damage: 4, period: 5 }, 100, false);
        assert_eq!(poison.pulse_at(Tick(10)), None);
        assert_eq!(poison.pulse_at(Tick(13)), None);
        assert_eq!(
            poison.pulse_at(Tick(15)),
            Some((-4, crate::state::DamageTag::Poison))
        );
        assert_eq!(
            poison.pulse_at(Tick(20)),
            Some((-4, crate::state::DamageTag::Poison))
        );
    }

    #[test]
    fn charges_count_down_to_zero() {
        let mut shield = instance(EffectKind::MysteryShield { charges: 2 }, 100, false);
        assert_eq!(shield.consume_charge(), 1);
        assert_eq!(shield.consume_charge(), 0);
        assert_eq!(shield.consume_charge(), 0);
        assert_eq!(shield.charges(), Some(0));
    }
}
