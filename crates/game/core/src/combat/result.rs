//! Outcome types of health delta resolution.

/// What happened to a health delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AppliedOutcome {
    /// The delta went through the pipeline (possibly reduced to nothing).
    Applied,
    /// Target was already dead; nothing changed.
    AlreadyDead,
    /// Target was invincible and the delta was still damage; nothing changed.
    Invincible,
}

/// Result of [`DamagePipeline::apply`](super::DamagePipeline::apply).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedResult {
    pub outcome: AppliedOutcome,
    /// `old_hp - new_hp`: positive for damage taken, negative for healing.
    pub effective_delta: i64,
    /// Damage swallowed by the plain shield.
    pub shield_absorbed: u32,
    /// This delta triggered the death transition.
    pub actor_died: bool,
}

impl AppliedResult {
    pub const fn unchanged(outcome: AppliedOutcome) -> Self {
        Self {
            outcome,
            effective_delta: 0,
            shield_absorbed: 0,
            actor_died: false,
        }
    }

    pub const fn already_dead() -> Self {
        Self::unchanged(AppliedOutcome::AlreadyDead)
    }

    pub const fn invincible() -> Self {
        Self::unchanged(AppliedOutcome::Invincible)
    }

    /// HP lost by the target, zero for heals.
    pub fn damage_taken(&self) -> u64 {
        self.effective_delta.max(0) as u64
    }

    /// HP gained by the target, zero for damage.
    pub fn healed(&self) -> u64 {
        self.effective_delta.min(0).unsigned_abs()
    }
}
