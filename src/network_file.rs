//! JSON network files.
//!
//! Entries are kept as raw JSON values; the engine converts them and reports
//! the first non-numeric entry by position.

use netomata_core::numeric::convert_row;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkFileError {
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid network file: {0}")]
    Invalid(#[from] netomata_core::EvolveError),
}

pub type Result<T> = std::result::Result<T, NetworkFileError>;

/// Initial state and wiring of a network automaton.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NetworkFile {
    pub initial_conditions: Vec<Value>,
    pub adjacency_matrix: Vec<Vec<Value>>,
    /// Rows preceding the initial conditions, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub past_conditions: Vec<Vec<Value>>,
}

impl NetworkFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.adjacency_matrix.first().map_or(0, Vec::len)
    }

    /// Past condition rows as activities.
    pub fn past_activities(&self) -> Result<Vec<Vec<f64>>> {
        let rows: Vec<Vec<f64>> = self
            .past_conditions
            .iter()
            .enumerate()
            .map(|(i, row)| convert_row(row, &format!("past_conditions[{i}]")))
            .collect::<netomata_core::Result<_>>()?;
        Ok(rows)
    }
}
