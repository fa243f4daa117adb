use crate::numeric::Numeric;
use netomata_data::Neighbourhood;
use thiserror::Error;

/// Failure raised by an externally supplied rule or perturbation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    #[must_use]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for RuleError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// Computes a cell's next activity from its neighbourhood.
///
/// Called once per cell per timestep with the cell index and the timestep
/// being computed (1-based, since timestep 0 is the initial conditions). The
/// output goes through [`Numeric`]; a value that is not a number aborts the
/// run.
///
/// Any `Fn(&Neighbourhood, usize, usize) -> Result<O, RuleError>` is a rule.
pub trait ActivityRule {
    type Output: Numeric;

    fn apply(
        &self,
        neighbourhood: &Neighbourhood,
        cell: usize,
        timestep: usize,
    ) -> Result<Self::Output, RuleError>;
}

impl<F, O> ActivityRule for F
where
    F: Fn(&Neighbourhood, usize, usize) -> Result<O, RuleError>,
    O: Numeric,
{
    type Output = O;

    fn apply(
        &self,
        neighbourhood: &Neighbourhood,
        cell: usize,
        timestep: usize,
    ) -> Result<O, RuleError> {
        self(neighbourhood, cell, timestep)
    }
}

/// Boxed rule with a plain `f64` output, as built from configuration.
pub type DynRule = Box<dyn ActivityRule<Output = f64> + Send + Sync>;
