use crate::error::{EvolveError, Result};
use crate::index_list::IndexList;
use crate::numeric::Numeric;

/// Incoming edges of one cell: source indices in ascending order and the
/// weight of each edge, in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predecessors {
    pub indices: IndexList,
    pub weights: Vec<f64>,
}

impl Predecessors {
    fn push(&mut self, source: usize, weight: f64) {
        self.indices.push(source);
        self.weights.push(weight);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Sparse view of an adjacency matrix: for every cell, the cells with a
/// non-zero edge into it.
///
/// Built with one column-major scan of the dense matrix (O(N²)), after which
/// storage is O(E) in the number of non-zero edges.
///
/// # Examples
/// ```
/// use netomata_core::PredecessorIndex;
///
/// let adjacency = vec![vec![0.0, 2.0], vec![1.0, 1.0]];
/// let index = PredecessorIndex::build(&adjacency).unwrap();
/// assert_eq!(index.predecessors(0).indices.as_slice(), &[1]);
/// assert_eq!(index.predecessors(1).indices.as_slice(), &[0, 1]);
/// assert_eq!(index.predecessors(1).weights, vec![2.0, 1.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PredecessorIndex {
    cells: Vec<Predecessors>,
}

impl PredecessorIndex {
    /// Builds the index, converting every entry through [`Numeric`].
    ///
    /// Row 0 defines the number of cells. The matrix must be square. A zero
    /// weight is tested exactly, so `-0.0` is absent and `1e-300` is an edge.
    pub fn build<T: Numeric>(adjacency_matrix: &[Vec<T>]) -> Result<Self> {
        let num_cells = validate_shape(adjacency_matrix)?;

        let mut cells = Vec::with_capacity(num_cells);
        for c in 0..num_cells {
            let mut preds = Predecessors::default();
            for (r, row) in adjacency_matrix.iter().enumerate() {
                let entry = &row[c];
                let weight = entry.to_activity().ok_or_else(|| {
                    EvolveError::conversion(format!("adjacency_matrix[{r}][{c}]"), entry.kind())
                })?;
                if weight != 0.0 {
                    preds.push(r, weight);
                }
            }
            cells.push(preds);
        }

        let index = Self { cells };
        tracing::debug!(
            cells = num_cells,
            edges = index.edge_count(),
            "Built predecessor index"
        );
        Ok(index)
    }

    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Incoming edges of `cell`.
    ///
    /// # Panics
    /// Panics if `cell >= num_cells()`.
    #[must_use]
    pub fn predecessors(&self, cell: usize) -> &Predecessors {
        &self.cells[cell]
    }

    /// Total number of non-zero edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.cells.iter().map(Predecessors::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predecessors> {
        self.cells.iter()
    }
}

fn validate_shape<T>(adjacency_matrix: &[Vec<T>]) -> Result<usize> {
    let first = adjacency_matrix
        .first()
        .ok_or_else(|| EvolveError::validation("the adjacency_matrix must have at least one row"))?;
    let num_cells = first.len();
    if adjacency_matrix.len() != num_cells {
        return Err(EvolveError::validation(format!(
            "the adjacency_matrix must be square: {} rows but row 0 has {} columns",
            adjacency_matrix.len(),
            num_cells
        )));
    }
    if let Some((r, row)) = adjacency_matrix
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != num_cells)
    {
        return Err(EvolveError::validation(format!(
            "adjacency_matrix row {r} has {} columns, expected {num_cells}",
            row.len()
        )));
    }
    Ok(num_cells)
}
