//! Mystery shield interception of negative effects.

use super::bag::EffectBag;
use super::instance::EffectSpec;
use super::registry::Polarity;
use crate::state::EffectId;

/// Decision on an attempted effect insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShieldVerdict {
    /// Insert the effect normally.
    Allowed,
    /// A shield swallowed the effect; it must not be inserted.
    Blocked { shield: EffectId, remaining: u32 },
}

/// Arbiter between incoming negative effects and active mystery shields.
pub struct ShieldArbiter;

impl ShieldArbiter {
    /// Checks `incoming` against the shields in `bag`.
    ///
    /// Only negative effects are intercepted. Among live shields with charges
    /// left, the one expiring soonest pays; ties go to the earlier inserted
    /// shield. A shield spent down to zero is flagged expired.
    pub fn intercept(bag: &mut EffectBag, incoming: &EffectSpec) -> ShieldVerdict {
        if incoming.kind.polarity() != Polarity::Negative {
            return ShieldVerdict::Allowed;
        }

        // Picked by position: a spent copy may share the live shield's id.
        let candidate = bag
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_expired() && e.charges().is_some_and(|c| c > 0))
            .min_by_key(|(_, e)| e.expires_at())
            .map(|(index, _)| index);

        let Some(shield) = candidate.and_then(|index| bag.get_at_mut(index)) else {
            return ShieldVerdict::Allowed;
        };

        let remaining = shield.consume_charge();
        if remaining == 0 {
            shield.expire();
        }

        ShieldVerdict::Blocked {
            shield: shield.id(),
            remaining,
        }
    }
}
