//! Error types for the evolution engine.
//!
//! Every variant aborts the whole run; no partial activity history is ever
//! returned alongside an error.

use crate::rule::RuleError;
use thiserror::Error;

/// Main error type for evolution runs.
#[derive(Error, Debug)]
pub enum EvolveError {
    /// Malformed inputs, detected before any evolution work begins
    #[error("Validation error: {0}")]
    Validation(String),

    /// An input entry could not be interpreted as a number
    #[error("Conversion error: {location} is not a number (found {found})")]
    Conversion {
        location: String,
        found: &'static str,
    },

    /// The activity rule failed
    #[error("error calling activity_rule for cell {cell} at timestep {timestep}: {source}")]
    RuleInvocation {
        cell: usize,
        timestep: usize,
        #[source]
        source: RuleError,
    },

    /// The activity rule returned something that is not a number
    #[error("activity_rule did not return a number for cell {cell} at timestep {timestep} (found {found})")]
    RuleReturnType {
        cell: usize,
        timestep: usize,
        found: &'static str,
    },

    /// The perturbation hook failed
    #[error("error calling perturbation at timestep {timestep}: {source}")]
    Perturbation {
        timestep: usize,
        #[source]
        source: RuleError,
    },
}

/// Result type alias for evolution operations.
pub type Result<T> = std::result::Result<T, EvolveError>;

impl EvolveError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a new conversion error for the entry at `location`.
    #[must_use]
    pub fn conversion<S: Into<String>>(location: S, found: &'static str) -> Self {
        Self::Conversion {
            location: location.into(),
            found,
        }
    }

    /// Whether the error was raised by (or about) the activity rule.
    #[must_use]
    pub fn is_rule_error(&self) -> bool {
        matches!(
            self,
            Self::RuleInvocation { .. } | Self::RuleReturnType { .. }
        )
    }
}
