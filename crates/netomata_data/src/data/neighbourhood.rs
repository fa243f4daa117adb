use serde::{Deserialize, Serialize};

/// The cells that feed into a given cell, as seen from one timestep.
///
/// `activities`, `neighbour_indices` and `weights` are parallel: entry `i` of
/// each describes the same predecessor. Predecessors appear in ascending cell
/// index order. `current_activity` is the cell's own activity at the previous
/// timestep, whether or not the cell is its own predecessor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Neighbourhood {
    pub activities: Vec<f64>,
    pub neighbour_indices: Vec<usize>,
    pub weights: Vec<f64>,
    pub current_activity: f64,
    /// Activities of the predecessors at earlier timesteps, oldest first.
    /// Each row is parallel to `neighbour_indices`. Empty unless the run was
    /// given past conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub past_activities: Vec<Vec<f64>>,
}

impl Neighbourhood {
    pub fn new(
        activities: Vec<f64>,
        neighbour_indices: Vec<usize>,
        weights: Vec<f64>,
        current_activity: f64,
    ) -> Self {
        debug_assert_eq!(activities.len(), neighbour_indices.len());
        debug_assert_eq!(weights.len(), neighbour_indices.len());
        Self {
            activities,
            neighbour_indices,
            weights,
            current_activity,
            past_activities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_past_activities(mut self, past_activities: Vec<Vec<f64>>) -> Self {
        self.past_activities = past_activities;
        self
    }

    /// Number of predecessors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbour_indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbour_indices.is_empty()
    }

    fn position_of(&self, cell_index: usize) -> Option<usize> {
        self.neighbour_indices.binary_search(&cell_index).ok()
    }

    /// Activity of the predecessor with the given cell index, if it is one.
    #[must_use]
    pub fn activity_of(&self, cell_index: usize) -> Option<f64> {
        self.position_of(cell_index).map(|i| self.activities[i])
    }

    /// Weight of the edge from `cell_index` into this cell, if there is one.
    #[must_use]
    pub fn weight_from(&self, cell_index: usize) -> Option<f64> {
        self.position_of(cell_index).map(|i| self.weights[i])
    }

    /// Activity of a predecessor `steps_back` rows before the current one.
    ///
    /// `steps_back = 1` is the most recent past row. Returns `None` when the
    /// cell is not a predecessor or the run does not carry that much history.
    #[must_use]
    pub fn past_activity_of(&self, cell_index: usize, steps_back: usize) -> Option<f64> {
        if steps_back == 0 || steps_back > self.past_activities.len() {
            return None;
        }
        let row = &self.past_activities[self.past_activities.len() - steps_back];
        self.position_of(cell_index).map(|i| row[i])
    }

    /// Iterates over `(cell index, activity, weight)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.neighbour_indices
            .iter()
            .zip(&self.activities)
            .zip(&self.weights)
            .map(|((&idx, &activity), &weight)| (idx, activity, weight))
    }
}
