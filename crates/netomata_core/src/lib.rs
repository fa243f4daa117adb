//! # Netomata Core
//!
//! The evolution engine for network automata: a network of cells whose next
//! activity depends only on the cells that feed into it.
//!
//! This crate contains:
//! - A sparse predecessor index built once from a dense adjacency matrix
//! - Neighbourhood assembly for each (cell, timestep) pair
//! - The synchronous evolution loop, sequential or Rayon-parallel
//! - Typed rule and perturbation hooks with explicit numeric coercion
//! - A handful of classic activity rules (elementary, totalistic, Life)
//! - Configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use netomata_core::{evolve, Neighbourhood, RuleError};
//!
//! // A 3-cycle: 0 -> 1 -> 2 -> 0
//! let adjacency = vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]];
//! let sum = |n: &Neighbourhood, _c: usize, _t: usize| -> Result<f64, RuleError> {
//!     Ok(n.activities.iter().sum())
//! };
//!
//! let history = evolve(&[1, 0, 0], &adjacency, 3, &sum).unwrap();
//! assert_eq!(history.row(2), &[0.0, 0.0, 1.0]);
//! ```

/// Configuration management for evolution runs
pub mod config;
/// Error types for the evolution engine
pub mod error;
/// The timestep loop driving activity rules
pub mod evolution;
/// Growable list of cell indices
pub mod index_list;
/// Run metrics and logging setup
pub mod metrics;
/// Neighbourhood assembly from the predecessor index
pub mod neighbourhood;
/// Explicit conversion of input and rule values to activities
pub mod numeric;
/// Post-timestep perturbation hooks
pub mod perturbation;
/// Sparse predecessor index built from the adjacency matrix
pub mod predecessors;
/// The activity rule contract
pub mod rule;
/// Built-in activity rules
pub mod rules;

pub use config::AppConfig;
pub use error::{EvolveError, Result};
pub use evolution::{evolve, Evolver};
pub use index_list::IndexList;
pub use metrics::{init_logging, Metrics};
pub use netomata_data::{ActivityHistory, Neighbourhood};
pub use numeric::Numeric;
pub use perturbation::{Noise, PerCell, Perturbation};
pub use predecessors::{PredecessorIndex, Predecessors};
pub use rule::{ActivityRule, RuleError};
