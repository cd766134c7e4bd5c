/// Engine configuration constants and tunable parameters.
///
/// Compile-time capacities live as associated constants; the remaining fields
/// are balance knobs that content files may override (see `defense-content`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineConfig {
    /// Share of the nominal duration (in percent) that a negative effect lasts
    /// on a sturdy actor.
    pub sturdy_duration_percent: u32,
    /// Damage multiplier when the target resists the damage tag.
    pub resist_ratio: f64,
    /// Fraction of incoming damage turned into healing by vampiric immunity.
    pub vamp_ratio: f64,
    /// Flat range bonus granted by Transcendent.
    pub transcendent_range_bonus: f64,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_DEATH_HOOKS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STURDY_DURATION_PERCENT: u32 = 50;
    pub const DEFAULT_RESIST_RATIO: f64 = 0.5;
    pub const DEFAULT_VAMP_RATIO: f64 = 0.5;
    pub const DEFAULT_TRANSCENDENT_RANGE_BONUS: f64 = 0.25;

    pub fn new() -> Self {
        Self {
            sturdy_duration_percent: Self::DEFAULT_STURDY_DURATION_PERCENT,
            resist_ratio: Self::DEFAULT_RESIST_RATIO,
            vamp_ratio: Self::DEFAULT_VAMP_RATIO,
            transcendent_range_bonus: Self::DEFAULT_TRANSCENDENT_RANGE_BONUS,
        }
    }

    pub fn with_sturdy_duration_percent(mut self, percent: u32) -> Self {
        self.sturdy_duration_percent = percent.min(100);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
