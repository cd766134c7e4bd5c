//! Ratio accumulation following a stacking policy.
//!
//! Every stat category collects the ratios of its contributing instances into
//! one [`RatioStack`] and resolves them in a single step:
//!
//! | policy         | result            | empty |
//! |----------------|-------------------|-------|
//! | TakeMin        | `min(r)`          | 1.0   |
//! | TakeMax        | `max(r)`          | 1.0   |
//! | Additive       | `1 + Σ(r - 1)`    | 1.0   |
//! | Multiplicative | `Π r`             | 1.0   |
//! | Independent    | always 1.0        | 1.0   |

use crate::effect::StackingPolicy;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioStack {
    policy: StackingPolicy,
    acc: f64,
    count: u32,
}

impl RatioStack {
    pub fn new(policy: StackingPolicy) -> Self {
        let acc = match policy {
            StackingPolicy::Additive => 0.0,
            _ => 1.0,
        };
        Self {
            policy,
            acc,
            count: 0,
        }
    }

    /// Folds one ratio into the stack. Non-finite ratios are skipped.
    pub fn push(&mut self, ratio: f64) {
        if !ratio.is_finite() {
            tracing::warn!(ratio, policy = %self.policy, "non-finite ratio ignored");
            return;
        }
        self.acc = match (self.policy, self.count) {
            (StackingPolicy::TakeMin | StackingPolicy::TakeMax, 0) => ratio,
            (StackingPolicy::TakeMin, _) => self.acc.min(ratio),
            (StackingPolicy::TakeMax, _) => self.acc.max(ratio),
            (StackingPolicy::Additive, _) => self.acc + (ratio - 1.0),
            (StackingPolicy::Multiplicative, _) => self.acc * ratio,
            (StackingPolicy::Independent, _) => 1.0,
        };
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn resolve(&self) -> f64 {
        if self.count == 0 {
            return 1.0;
        }
        match self.policy {
            StackingPolicy::Additive => 1.0 + self.acc,
            StackingPolicy::Independent => 1.0,
            _ => self.acc,
        }
    }
}

impl Extend<f64> for RatioStack {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for ratio in iter {
            self.push(ratio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(policy: StackingPolicy, ratios: &[f64]) -> f64 {
        let mut stack = RatioStack::new(policy);
        stack.extend(ratios.iter().copied());
        stack.resolve()
    }

    #[test]
    fn empty_stacks_are_neutral() {
        for policy in [
            StackingPolicy::TakeMin,
            StackingPolicy::TakeMax,
            StackingPolicy::Additive,
            StackingPolicy::Multiplicative,
            StackingPolicy::Independent,
        ] {
            assert_eq!(resolve(policy, &[]), 1.0);
        }
    }

    #[test]
    fn policies_combine_as_documented() {
        assert_eq!(resolve(StackingPolicy::TakeMin, &[0.7, 0.5, 0.9]), 0.5);
        assert_eq!(resolve(StackingPolicy::TakeMax, &[1.25, 1.5]), 1.5);
        assert!((resolve(StackingPolicy::Additive, &[1.2, 1.1]) - 1.3).abs() < 1e-12);
        assert!((resolve(StackingPolicy::Multiplicative, &[0.8, 0.5]) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn take_max_keeps_a_lone_ratio_below_one() {
        assert_eq!(resolve(StackingPolicy::TakeMax, &[0.8]), 0.8);
    }

    #[test]
    fn non_finite_ratios_are_skipped() {
        assert_eq!(resolve(StackingPolicy::TakeMin, &[f64::NAN, 0.6]), 0.6);
        assert_eq!(resolve(StackingPolicy::Multiplicative, &[f64::INFINITY]), 1.0);
    }
}
