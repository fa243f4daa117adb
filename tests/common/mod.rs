pub mod macros;

use netomata_core::{ActivityHistory, Neighbourhood, RuleError};
use netomata_lib::NetworkFile;
use serde_json::Value;

/// Sum of predecessor activities.
#[allow(dead_code)]
pub fn sum_rule(n: &Neighbourhood, _cell: usize, _t: usize) -> Result<f64, RuleError> {
    Ok(n.activities.iter().fold(0.0, |acc, a| acc + a))
}

/// Renders a 0/1 row as `#` and `.`.
#[allow(dead_code)]
pub fn render(row: &[f64]) -> String {
    row.iter().map(|&a| if a != 0.0 { '#' } else { '.' }).collect()
}

#[allow(dead_code)]
pub fn render_history(history: &ActivityHistory) -> Vec<String> {
    history.rows().iter().map(|row| render(row)).collect()
}

/// Builds adjacency matrices and initial conditions for tests.
///
/// `adjacency[r][c]` is the weight of the edge from `r` into `c`.
#[allow(dead_code)]
pub struct NetworkBuilder {
    adjacency: Vec<Vec<f64>>,
    initial: Vec<f64>,
    past: Vec<Vec<f64>>,
}

#[allow(dead_code)]
impl NetworkBuilder {
    /// `n` isolated cells, all inactive.
    pub fn new(n: usize) -> Self {
        Self {
            adjacency: vec![vec![0.0; n]; n],
            initial: vec![0.0; n],
            past: Vec::new(),
        }
    }

    /// Directed cycle `0 -> 1 -> ... -> n-1 -> 0`.
    pub fn cycle(n: usize) -> Self {
        let mut builder = Self::new(n);
        for i in 0..n {
            builder.adjacency[i][(i + 1) % n] = 1.0;
        }
        builder
    }

    /// Ring where every cell reads itself and the `radius` cells on each side.
    pub fn ring(n: usize, radius: usize) -> Self {
        let mut builder = Self::new(n);
        for c in 0..n {
            for d in 0..=radius {
                builder.adjacency[(c + d) % n][c] = 1.0;
                builder.adjacency[(c + n - d) % n][c] = 1.0;
            }
        }
        builder
    }

    /// `width x height` torus with Moore neighbourhoods that include the cell.
    pub fn torus(width: usize, height: usize) -> Self {
        let mut builder = Self::new(width * height);
        for y in 0..height {
            for x in 0..width {
                let c = y * width + x;
                for dy in [height - 1, 0, 1] {
                    for dx in [width - 1, 0, 1] {
                        let r = ((y + dy) % height) * width + (x + dx) % width;
                        builder.adjacency[r][c] = 1.0;
                    }
                }
            }
        }
        builder
    }

    pub fn with_edge(mut self, from: usize, to: usize, weight: f64) -> Self {
        self.adjacency[from][to] = weight;
        self
    }

    pub fn with_activity(mut self, cell: usize, activity: f64) -> Self {
        self.initial[cell] = activity;
        self
    }

    pub fn with_initial(mut self, initial: Vec<f64>) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_past(mut self, row: Vec<f64>) -> Self {
        self.past.push(row);
        self
    }

    pub fn past(&self) -> Vec<Vec<f64>> {
        self.past.clone()
    }

    pub fn build(self) -> (Vec<f64>, Vec<Vec<f64>>) {
        (self.initial, self.adjacency)
    }

    pub fn into_network_file(self) -> NetworkFile {
        let to_values = |row: Vec<f64>| row.into_iter().map(Value::from).collect::<Vec<_>>();
        NetworkFile {
            initial_conditions: to_values(self.initial),
            adjacency_matrix: self.adjacency.into_iter().map(to_values).collect(),
            past_conditions: self.past.into_iter().map(to_values).collect(),
        }
    }
}
