//! Death hook descriptors.
//!
//! Hooks are plain data registered on an actor at spawn (from its template) or
//! later by gameplay code. The lifecycle controller interprets them when the
//! actor dies.

use crate::effect::EffectKind;
use crate::state::DamageTag;

/// One reaction to an actor's death.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathHook {
    /// Heal every living actor on the same side.
    HealAllies { amount: u32 },
    /// Grant plain shield to every living actor on the same side.
    ShieldAllies { amount: u32 },
    /// Attach an effect to the killer.
    CurseKiller { effect: EffectKind, duration: u64 },
    /// Damage the killer after `delay` ticks, if it is still alive by then.
    DelayedBurst {
        delay: u64,
        damage: u32,
        tag: DamageTag,
    },
    /// Emit a death announcement event and nothing else.
    Announce,
}

impl DeathHook {
    /// Short name used in logs and events.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HealAllies { .. } => "heal_allies",
            Self::ShieldAllies { .. } => "shield_allies",
            Self::CurseKiller { .. } => "curse_killer",
            Self::DelayedBurst { .. } => "delayed_burst",
            Self::Announce => "announce",
        }
    }

    /// Whether the hook does nothing without a resolvable killer.
    pub const fn needs_killer(&self) -> bool {
        matches!(self, Self::CurseKiller { .. } | Self::DelayedBurst { .. })
    }
}
