//! Post-timestep perturbation hooks.
//!
//! A perturbation runs once per timestep, after every cell of that timestep
//! has been computed, and may rewrite the completed row in place. The row it
//! leaves behind is what the next timestep reads.

use crate::rule::RuleError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait Perturbation {
    fn perturb(&self, timestep: usize, activities: &mut [f64]) -> Result<(), RuleError>;
}

impl<F> Perturbation for F
where
    F: Fn(usize, &mut [f64]) -> Result<(), RuleError>,
{
    fn perturb(&self, timestep: usize, activities: &mut [f64]) -> Result<(), RuleError> {
        self(timestep, activities)
    }
}

/// Applies a per-cell function `(cell, activity, timestep) -> activity` to
/// each cell of the row, in ascending cell order.
#[derive(Debug, Clone, Copy)]
pub struct PerCell<F>(pub F);

impl<F> Perturbation for PerCell<F>
where
    F: Fn(usize, f64, usize) -> f64,
{
    fn perturb(&self, timestep: usize, activities: &mut [f64]) -> Result<(), RuleError> {
        for (cell, activity) in activities.iter_mut().enumerate() {
            *activity = (self.0)(cell, *activity, timestep);
        }
        Ok(())
    }
}

/// Pushes each activity away from 1/2 by a random fraction of `amount`:
/// `a + sign(a - 1/2) * U[0, 1) * amount`.
///
/// Randomness is derived from `(seed, cell, timestep)`, so a run is
/// reproducible regardless of evaluation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Noise {
    pub amount: f64,
    pub seed: u64,
}

impl Noise {
    fn sample(&self, cell: usize, timestep: usize) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(mix_seed(self.seed, cell, timestep));
        rng.gen::<f64>()
    }
}

impl Perturbation for Noise {
    fn perturb(&self, timestep: usize, activities: &mut [f64]) -> Result<(), RuleError> {
        for (cell, activity) in activities.iter_mut().enumerate() {
            let direction = *activity - 0.5;
            let sign = if direction > 0.0 {
                1.0
            } else if direction < 0.0 {
                -1.0
            } else {
                0.0
            };
            *activity += sign * self.sample(cell, timestep) * self.amount;
        }
        Ok(())
    }
}

/// Folds a cell and timestep into a base seed (SplitMix64 finalizer).
pub(crate) fn mix_seed(seed: u64, cell: usize, timestep: usize) -> u64 {
    let mut z = seed
        ^ (cell as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (timestep as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
