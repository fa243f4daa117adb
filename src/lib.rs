//! # Netomata
//!
//! Network automata: load a network file, evolve it under a configured rule
//! and write the activity history.

/// JSON network files
pub mod network_file;
/// Config-driven evolution runs
pub mod runner;

pub use netomata_core::{ActivityHistory, AppConfig, EvolveError, Neighbourhood};
pub use network_file::{NetworkFile, NetworkFileError};
pub use runner::{history_to_json, run};
