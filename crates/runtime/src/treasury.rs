//! Player gold, credited from the death log.

use serde::{Deserialize, Serialize};

/// Gold balance owned by the runtime.
///
/// The engine never touches gold directly; it records a reward on each death
/// and the runtime pays it out here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    gold: i64,
}

impl Treasury {
    pub fn new(gold: i64) -> Self {
        Self { gold }
    }

    pub fn gold(&self) -> i64 {
        self.gold
    }

    /// Adds `delta` (negative to spend) and returns the new balance.
    pub fn change_gold(&mut self, delta: i64) -> i64 {
        self.gold = self.gold.saturating_add(delta);
        self.gold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_gold_returns_the_balance() {
        let mut treasury = Treasury::new(10);
        assert_eq!(treasury.change_gold(5), 15);
        assert_eq!(treasury.change_gold(-20), -5);
        assert_eq!(treasury.gold(), -5);
    }

    #[test]
    fn change_gold_saturates() {
        let mut treasury = Treasury::new(i64::MAX - 1);
        assert_eq!(treasury.change_gold(10), i64::MAX);
    }
}
