//! Built-in activity rules.
//!
//! Neighbourhood activities arrive in ascending predecessor index order, so
//! positional rules such as [`BinaryRule`] read "left to right" by cell index.

use crate::numeric::Numeric;
use crate::perturbation::mix_seed;
use crate::rule::{ActivityRule, RuleError};
use netomata_data::Neighbourhood;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Sum of the predecessor activities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl ActivityRule for Sum {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, _cell: usize, _timestep: usize) -> Result<f64, RuleError> {
        Ok(total(&n.activities))
    }
}

/// Starts from `+0.0`, so an empty neighbourhood sums to positive zero.
fn total(activities: &[f64]) -> f64 {
    activities.iter().fold(0.0, |acc, a| acc + a)
}

/// Sum of activity times edge weight over the predecessors.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedSum;

impl ActivityRule for WeightedSum {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, _cell: usize, _timestep: usize) -> Result<f64, RuleError> {
        Ok(n
            .iter()
            .fold(0.0, |acc, (_, activity, weight)| acc + activity * weight))
    }
}

/// Most frequent predecessor activity.
///
/// Activities are compared with `==`, so `0.0` and `-0.0` vote together. A
/// NaN activity is an error. Ties are broken by a generator seeded from
/// `(seed, cell, timestep)`, so a run is reproducible and independent of
/// evaluation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Majority {
    pub seed: u64,
}

impl ActivityRule for Majority {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, cell: usize, timestep: usize) -> Result<f64, RuleError> {
        if n.is_empty() {
            return Err(RuleError::new("majority rule needs at least one neighbour"));
        }

        // (value, count) in order of first appearance
        let mut counts: Vec<(f64, usize)> = Vec::new();
        for &a in &n.activities {
            if a.is_nan() {
                return Err(RuleError::new("majority rule cannot vote on NaN activities"));
            }
            // -0.0 + 0.0 is +0.0
            let a = a + 0.0;
            match counts.iter_mut().find(|(v, _)| *v == a) {
                Some((_, count)) => *count += 1,
                None => counts.push((a, 1)),
            }
        }

        let best = counts.iter().map(|&(_, count)| count).max().unwrap_or(0);
        let tied: Vec<f64> = counts
            .iter()
            .filter(|&&(_, count)| count == best)
            .map(|&(v, _)| v)
            .collect();

        if tied.len() == 1 {
            return Ok(tied[0]);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(mix_seed(self.seed, cell, timestep));
        Ok(tied[rng.gen_range(0..tied.len())])
    }
}

/// Totalistic rule as numbered in NKS.
///
/// The rule number, written in base `colors`, is indexed by the sum of the
/// neighbourhood activities: digit `s` (counting from the least significant)
/// is the next activity when the activities sum to `s`. With `n` neighbours
/// there are `n * (colors - 1) + 1` possible sums.
#[derive(Debug, Clone, Copy)]
pub struct Totalistic {
    pub colors: u32,
    pub rule: u64,
}

impl ActivityRule for Totalistic {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, _cell: usize, _timestep: usize) -> Result<f64, RuleError> {
        if !(2..=36).contains(&self.colors) {
            return Err(RuleError::new(format!(
                "totalistic rules support 2 to 36 colors, got {}",
                self.colors
            )));
        }
        let k = u64::from(self.colors);
        let digits = n.len() as u32 * (self.colors - 1) + 1;
        if let Some(limit) = k.checked_pow(digits) {
            if self.rule >= limit {
                return Err(RuleError::new("rule number out of range"));
            }
        }

        let sum = total(&n.activities);
        if sum < 0.0 || sum.fract() != 0.0 || sum >= f64::from(digits) {
            return Err(RuleError::new(format!(
                "activities must be colors in [0, {}), got a sum of {sum}",
                self.colors
            )));
        }
        let digit = k
            .checked_pow(sum as u32)
            .map_or(0, |place| (self.rule / place) % k);
        Ok(digit as f64)
    }
}

/// How the neighbourhoods of a [`BinaryRule`] are listed against the bits
/// of the rule number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Neighbourhood `0...0` maps to the most significant bit.
    #[default]
    Lexicographic,
    /// Neighbourhood `0...0` maps to the least significant bit, as in NKS
    /// (rule 30, rule 110...).
    Nks,
}

/// Binary rule over the word formed by the neighbourhood activities.
///
/// Non-zero activities read as 1. The word is read most significant first, in
/// neighbourhood order, and selects one bit of `rule`. Up to six neighbours
/// are supported.
#[derive(Debug, Clone, Copy)]
pub struct BinaryRule {
    pub rule: u64,
    pub scheme: Scheme,
}

impl BinaryRule {
    #[must_use]
    pub fn nks(rule: u64) -> Self {
        Self {
            rule,
            scheme: Scheme::Nks,
        }
    }
}

impl ActivityRule for BinaryRule {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, _cell: usize, _timestep: usize) -> Result<f64, RuleError> {
        if n.len() > 6 {
            return Err(RuleError::new(format!(
                "binary rules support at most 6 neighbours, got {}",
                n.len()
            )));
        }
        let states: u32 = 1 << n.len();
        if states < 64 && self.rule >> states != 0 {
            return Err(RuleError::new("rule number out of range"));
        }

        let word = n
            .activities
            .iter()
            .fold(0_u64, |acc, &a| (acc << 1) | u64::from(a != 0.0));
        let bit = match self.scheme {
            Scheme::Lexicographic => u64::from(states) - 1 - word,
            Scheme::Nks => word,
        };
        Ok(((self.rule >> bit) & 1) as f64)
    }
}

/// Conway's Game of Life.
///
/// Expects a Moore neighbourhood that includes the cell itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameOfLife;

impl ActivityRule for GameOfLife {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, _cell: usize, _timestep: usize) -> Result<f64, RuleError> {
        let live = total(&n.activities);
        let alive = if n.current_activity == 1.0 {
            let others = live - 1.0;
            others == 2.0 || others == 3.0
        } else {
            live == 3.0
        };
        Ok(if alive { 1.0 } else { 0.0 })
    }
}

/// Makes a binary rule reversible.
///
/// The next activity is the wrapped rule's result XOR the cell's own activity
/// one step before the current one. Non-zero values read as 1. The cell must
/// be among its own predecessors and the run needs at least one row of past
/// conditions.
#[derive(Debug, Clone, Copy)]
pub struct Reversible<R> {
    pub rule: R,
}

impl<R: ActivityRule> Reversible<R> {
    #[must_use]
    pub fn new(rule: R) -> Self {
        Self { rule }
    }
}

impl<R: ActivityRule> ActivityRule for Reversible<R> {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, cell: usize, timestep: usize) -> Result<f64, RuleError> {
        if n.past_activities.is_empty() {
            return Err(RuleError::new(
                "reversible rule needs at least one row of past activities",
            ));
        }
        let previous = n.past_activity_of(cell, 1).ok_or_else(|| {
            RuleError::new(format!(
                "reversible rule needs cell {cell} in its own neighbourhood"
            ))
        })?;

        let output = self.rule.apply(n, cell, timestep)?;
        let regular = output.to_activity().ok_or_else(|| {
            RuleError::new(format!(
                "wrapped rule returned a {}, expected a number",
                output.kind()
            ))
        })?;
        Ok(f64::from(u8::from(regular != 0.0) ^ u8::from(previous != 0.0)))
    }
}

/// Wireworld, with states empty (0), electron head (1), electron tail (2)
/// and conductor (3).
///
/// A conductor becomes a head when one or two of its neighbourhood
/// activities are heads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wireworld;

impl ActivityRule for Wireworld {
    type Output = f64;

    fn apply(&self, n: &Neighbourhood, _cell: usize, _timestep: usize) -> Result<f64, RuleError> {
        match n.current_activity {
            s if s == 0.0 => Ok(0.0),
            s if s == 1.0 => Ok(2.0),
            s if s == 2.0 => Ok(3.0),
            s if s == 3.0 => {
                let heads = n.activities.iter().filter(|&&a| a == 1.0).count();
                Ok(if heads == 1 || heads == 2 { 1.0 } else { 3.0 })
            }
            other => Err(RuleError::new(format!(
                "wireworld states are 0 to 3, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hood(activities: &[f64]) -> Neighbourhood {
        let len = activities.len();
        Neighbourhood::new(activities.to_vec(), (0..len).collect(), vec![1.0; len], 0.0)
    }

    #[test]
    fn test_sum_and_weighted_sum() {
        let n = Neighbourhood::new(vec![1.0, 2.0], vec![0, 1], vec![0.5, -1.0], 0.0);
        assert_eq!(Sum.apply(&n, 0, 1), Ok(3.0));
        assert_eq!(WeightedSum.apply(&n, 0, 1), Ok(-1.5));
        assert_eq!(Sum.apply(&Neighbourhood::default(), 0, 1), Ok(0.0));
    }

    #[test]
    fn test_empty_sums_are_positive_zero() {
        let empty = Neighbourhood::default();
        assert!(Sum.apply(&empty, 0, 1).unwrap().is_sign_positive());
        assert!(WeightedSum.apply(&empty, 0, 1).unwrap().is_sign_positive());
    }

    #[test]
    fn test_majority() {
        let rule = Majority { seed: 3 };
        assert_eq!(rule.apply(&hood(&[1.0, 0.0, 1.0]), 0, 1), Ok(1.0));
        let tie = rule.apply(&hood(&[1.0, 0.0]), 4, 2).unwrap();
        assert!(tie == 0.0 || tie == 1.0);
        assert_eq!(rule.apply(&hood(&[1.0, 0.0]), 4, 2), Ok(tie));
        assert!(rule.apply(&Neighbourhood::default(), 0, 1).is_err());
    }

    #[test]
    fn test_majority_treats_signed_zeros_alike() {
        for seed in 0..20 {
            let winner = Majority { seed }.apply(&hood(&[0.0, -0.0, 1.0]), 0, 1).unwrap();
            assert_eq!(winner, 0.0, "seed {seed}");
            assert!(winner.is_sign_positive(), "seed {seed}");
        }
    }

    #[test]
    fn test_majority_rejects_nan() {
        let err = Majority { seed: 0 }
            .apply(&hood(&[f64::NAN, f64::NAN, 1.0]), 0, 1)
            .unwrap_err();
        assert!(err.message().contains("NaN"));
    }

    #[test]
    fn test_rule_30_nks_table() {
        // 111 110 101 100 011 010 001 000 -> 0 0 0 1 1 1 1 0
        let rule = BinaryRule::nks(30);
        let expected = [
            ([1.0, 1.0, 1.0], 0.0),
            ([1.0, 1.0, 0.0], 0.0),
            ([1.0, 0.0, 1.0], 0.0),
            ([1.0, 0.0, 0.0], 1.0),
            ([0.0, 1.0, 1.0], 1.0),
            ([0.0, 1.0, 0.0], 1.0),
            ([0.0, 0.0, 1.0], 1.0),
            ([0.0, 0.0, 0.0], 0.0),
        ];
        for (activities, next) in expected {
            assert_eq!(rule.apply(&hood(&activities), 0, 1), Ok(next), "{activities:?}");
        }
    }

    #[test]
    fn test_lexicographic_scheme_reverses_table() {
        let rule = BinaryRule {
            rule: 0b0000_0001,
            scheme: Scheme::Lexicographic,
        };
        assert_eq!(rule.apply(&hood(&[1.0, 1.0, 1.0]), 0, 1), Ok(1.0));
        assert_eq!(rule.apply(&hood(&[0.0, 0.0, 0.0]), 0, 1), Ok(0.0));
    }

    #[test]
    fn test_binary_rule_out_of_range() {
        let err = BinaryRule::nks(256).apply(&hood(&[0.0, 1.0, 0.0]), 0, 1).unwrap_err();
        assert_eq!(err.message(), "rule number out of range");
    }

    #[test]
    fn test_totalistic_code_777() {
        // 777 in base 3 is 1001210: sums 0..=6 map to 0,1,2,1,0,0,1
        let rule = Totalistic {
            colors: 3,
            rule: 777,
        };
        let expected = [0.0, 1.0, 2.0, 1.0, 0.0, 0.0, 1.0];
        for (sum, next) in expected.into_iter().enumerate() {
            let activities = [
                (sum.min(2)) as f64,
                (sum.saturating_sub(2).min(2)) as f64,
                (sum.saturating_sub(4).min(2)) as f64,
            ];
            assert_eq!(rule.apply(&hood(&activities), 0, 1), Ok(next), "sum {sum}");
        }
    }

    #[test]
    fn test_totalistic_rejects_bad_input() {
        let rule = Totalistic { colors: 2, rule: 16 };
        assert!(rule.apply(&hood(&[0.0, 1.0, 0.0]), 0, 1).is_err());
        let rule = Totalistic { colors: 2, rule: 6 };
        assert!(rule.apply(&hood(&[0.5, 0.0, 0.0]), 0, 1).is_err());
        let rule = Totalistic { colors: 1, rule: 0 };
        assert!(rule.apply(&hood(&[0.0]), 0, 1).is_err());
    }

    #[test]
    fn test_game_of_life_cases() {
        let live = |others: usize| {
            let mut activities = vec![1.0];
            activities.extend(std::iter::repeat(1.0).take(others));
            activities.resize(9, 0.0);
            let mut n = hood(&activities);
            n.current_activity = 1.0;
            GameOfLife.apply(&n, 0, 1).unwrap()
        };
        assert_eq!(live(1), 0.0);
        assert_eq!(live(2), 1.0);
        assert_eq!(live(3), 1.0);
        assert_eq!(live(4), 0.0);

        let mut dead = hood(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        dead.current_activity = 0.0;
        assert_eq!(GameOfLife.apply(&dead, 0, 1), Ok(1.0));
    }

    fn self_looped(activities: &[f64], past: &[f64]) -> Neighbourhood {
        let mut n = hood(activities);
        n.current_activity = activities[1];
        n.past_activities = vec![past.to_vec()];
        n
    }

    #[test]
    fn test_reversible_xors_own_past() {
        // cell 1 sits in the middle of its neighbourhood 0, 1, 2
        let rule = Reversible::new(BinaryRule::nks(90));
        // rule 90 on 1 0 0 gives 1
        assert_eq!(rule.apply(&self_looped(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]), 1, 1), Ok(1.0));
        assert_eq!(rule.apply(&self_looped(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), 1, 1), Ok(0.0));
        // rule 90 on 1 0 1 gives 0
        assert_eq!(rule.apply(&self_looped(&[1.0, 0.0, 1.0], &[0.0, 2.0, 0.0]), 1, 1), Ok(1.0));
    }

    #[test]
    fn test_reversible_needs_past_and_self_loop() {
        let rule = Reversible::new(BinaryRule::nks(90));
        let err = rule.apply(&hood(&[1.0, 0.0, 0.0]), 1, 1).unwrap_err();
        assert!(err.message().contains("past activities"));

        let n = self_looped(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]);
        let err = rule.apply(&n, 5, 1).unwrap_err();
        assert_eq!(err.message(), "reversible rule needs cell 5 in its own neighbourhood");
    }

    #[test]
    fn test_reversible_passes_on_inner_errors() {
        let rule = Reversible::new(BinaryRule::nks(256));
        let err = rule
            .apply(&self_looped(&[1.0, 0.0, 0.0], &[0.0, 0.0, 0.0]), 1, 1)
            .unwrap_err();
        assert_eq!(err.message(), "rule number out of range");
    }

    #[test]
    fn test_wireworld_transitions() {
        let with_current = |activities: &[f64], current: f64| {
            let mut n = hood(activities);
            n.current_activity = current;
            Wireworld.apply(&n, 0, 1)
        };
        assert_eq!(with_current(&[1.0, 1.0], 0.0), Ok(0.0));
        assert_eq!(with_current(&[3.0], 1.0), Ok(2.0));
        assert_eq!(with_current(&[1.0], 2.0), Ok(3.0));
        assert_eq!(with_current(&[3.0, 1.0, 0.0], 3.0), Ok(1.0));
        assert_eq!(with_current(&[1.0, 1.0, 3.0], 3.0), Ok(1.0));
        assert_eq!(with_current(&[1.0, 1.0, 1.0], 3.0), Ok(3.0));
        assert_eq!(with_current(&[2.0, 3.0], 3.0), Ok(3.0));
        assert!(with_current(&[0.0], 4.0).is_err());
    }
}
