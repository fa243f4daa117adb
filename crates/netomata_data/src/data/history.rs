use serde::{Deserialize, Serialize};

/// Activities of every cell at every timestep, row-major by timestep.
///
/// Rows are allocated up front and zero-filled; the evolution loop writes each
/// slot of rows `1..timesteps` exactly once.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct ActivityHistory {
    rows: Vec<Vec<f64>>,
}

impl ActivityHistory {
    /// Allocates a zeroed `timesteps x num_cells` grid.
    #[must_use]
    pub fn new(timesteps: usize, num_cells: usize) -> Self {
        Self {
            rows: (0..timesteps).map(|_| vec![0.0; num_cells]).collect(),
        }
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn timesteps(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn row(&self, timestep: usize) -> &[f64] {
        &self.rows[timestep]
    }

    pub fn row_mut(&mut self, timestep: usize) -> &mut [f64] {
        &mut self.rows[timestep]
    }

    #[must_use]
    pub fn get(&self, timestep: usize, cell: usize) -> Option<f64> {
        self.rows.get(timestep).and_then(|row| row.get(cell)).copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<&[f64]> {
        self.rows.last().map(Vec::as_slice)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Splits the grid into the completed rows `0..timestep` (read-only) and
    /// the writable row `timestep`.
    ///
    /// # Panics
    /// Panics if `timestep` is 0 or out of range.
    pub fn step_rows(&mut self, timestep: usize) -> (&[Vec<f64>], &mut [f64]) {
        assert!(timestep >= 1, "timestep 0 has no previous row");
        let (done, rest) = self.rows.split_at_mut(timestep);
        (done, &mut rest[0])
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }

    /// SHA-256 over the bit patterns of every activity, hex encoded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update((self.timesteps() as u64).to_le_bytes());
        hasher.update((self.num_cells() as u64).to_le_bytes());
        for row in &self.rows {
            for value in row {
                hasher.update(value.to_bits().to_le_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}
