//! Configuration management for evolution runs.
//!
//! This module provides strongly-typed configuration structures that map to
//! a `config.toml` file. Every section has defaults, so a partial file (or no
//! file at all) is valid.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [run]
//! timesteps = 100
//!
//! [engine]
//! parallel = true
//! threads = 4
//! progress_interval = 50
//!
//! [rule]
//! kind = "nks"
//! number = 30
//!
//! [perturbation]
//! kind = "noise"
//! amount = 1.05
//! seed = 7
//! ```

use crate::perturbation::Noise;
use crate::rule::DynRule;
use crate::rules::{
    BinaryRule, GameOfLife, Majority, Reversible, Scheme, Sum, Totalistic, WeightedSum, Wireworld,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub timesteps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { timesteps: 100 }
    }
}

/// How the evolution loop is executed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Evaluate the cells of a timestep on the Rayon pool.
    pub parallel: bool,
    /// Worker threads for parallel runs; Rayon's default when unset.
    pub threads: Option<usize>,
    /// Log progress every this many timesteps; 0 disables progress logs.
    pub progress_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            progress_interval: crate::metrics::DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    #[default]
    Sum,
    WeightedSum,
    Majority,
    Totalistic,
    Binary,
    Nks,
    GameOfLife,
    /// NKS-numbered binary rule made reversible; needs past conditions.
    Reversible,
    Wireworld,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RuleConfig {
    pub kind: RuleKind,
    /// Rule number for `totalistic`, `binary`, `nks` and `reversible`.
    pub number: u64,
    /// Number of colors for `totalistic`.
    pub colors: u32,
    /// Tie-break seed for `majority`.
    pub seed: u64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            kind: RuleKind::Sum,
            number: 0,
            colors: 2,
            seed: 0,
        }
    }
}

impl RuleConfig {
    #[must_use]
    pub fn build(&self) -> DynRule {
        match self.kind {
            RuleKind::Sum => Box::new(Sum),
            RuleKind::WeightedSum => Box::new(WeightedSum),
            RuleKind::Majority => Box::new(Majority { seed: self.seed }),
            RuleKind::Totalistic => Box::new(Totalistic {
                colors: self.colors,
                rule: self.number,
            }),
            RuleKind::Binary => Box::new(BinaryRule {
                rule: self.number,
                scheme: Scheme::Lexicographic,
            }),
            RuleKind::Nks => Box::new(BinaryRule::nks(self.number)),
            RuleKind::GameOfLife => Box::new(GameOfLife),
            RuleKind::Reversible => Box::new(Reversible::new(BinaryRule::nks(self.number))),
            RuleKind::Wireworld => Box::new(Wireworld),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PerturbationKind {
    #[default]
    None,
    Noise,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PerturbationConfig {
    pub kind: PerturbationKind,
    pub amount: f64,
    pub seed: u64,
}

impl PerturbationConfig {
    #[must_use]
    pub fn build(&self) -> Option<Noise> {
        match self.kind {
            PerturbationKind::None => None,
            PerturbationKind::Noise => Some(Noise {
                amount: self.amount,
                seed: self.seed,
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub run: RunConfig,
    pub engine: EngineConfig,
    pub rule: RuleConfig,
    pub perturbation: PerturbationConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.run.timesteps >= 1, "Timesteps must be at least 1");

        if let Some(threads) = self.engine.threads {
            anyhow::ensure!(threads > 0, "Thread count must be positive");
            anyhow::ensure!(threads <= 1024, "Thread count too large (max 1024)");
        }

        // rule numbers are range-checked per neighbourhood size at run time
        if self.rule.kind == RuleKind::Totalistic {
            anyhow::ensure!(
                (2..=36).contains(&self.rule.colors),
                "Totalistic colors must be in [2, 36]"
            );
        }

        if self.perturbation.kind == PerturbationKind::Noise {
            anyhow::ensure!(
                self.perturbation.amount.is_finite() && self.perturbation.amount >= 0.0,
                "Noise amount must be finite and non-negative"
            );
        }

        Ok(())
    }

    /// Parses and validates configuration from TOML.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.run).as_bytes());
        hasher.update(format!("{:?}", self.rule).as_bytes());
        hasher.update(format!("{:?}", self.perturbation).as_bytes());
        hex::encode(hasher.finalize())
    }
}
