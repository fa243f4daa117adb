//! The timestep loop.
//!
//! Every timestep `t` in `1..timesteps` is computed from the frozen row
//! `t - 1` only: cells are evaluated in ascending index order but none of them
//! can observe a value written during the same timestep. The perturbation
//! hook, if any, then rewrites the completed row before it becomes the input
//! of timestep `t + 1`.

use crate::error::{EvolveError, Result};
use crate::metrics::Metrics;
use crate::neighbourhood::assemble;
use crate::numeric::{convert_row, Numeric};
use crate::perturbation::Perturbation;
use crate::predecessors::PredecessorIndex;
use crate::rule::ActivityRule;
use netomata_data::ActivityHistory;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evolves a network with the given rule and no perturbation.
///
/// Row 0 of the result is `initial_conditions`; the rule is invoked
/// `(timesteps - 1) * num_cells` times.
pub fn evolve<T, R>(
    initial_conditions: &[T],
    adjacency_matrix: &[Vec<T>],
    timesteps: usize,
    activity_rule: &R,
) -> Result<ActivityHistory>
where
    T: Numeric,
    R: ActivityRule + ?Sized,
{
    Evolver::new(activity_rule).run(initial_conditions, adjacency_matrix, timesteps)
}

/// Configurable evolution run.
///
/// The rule and perturbation are borrowed for the lifetime of the evolver and
/// never retained by the history it produces. Metrics accumulate across every
/// run of the same evolver.
///
/// # Examples
/// ```
/// use netomata_core::{Evolver, Neighbourhood, PerCell, RuleError};
///
/// let adjacency = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
/// let mean = |n: &Neighbourhood, _c: usize, _t: usize| -> Result<f64, RuleError> {
///     Ok(n.activities.iter().sum::<f64>() / n.len() as f64)
/// };
/// let nudge = PerCell(|c: usize, a: f64, _t: usize| if c == 0 { a + 1.0 } else { a });
///
/// let history = Evolver::new(&mean)
///     .with_perturbation(&nudge)
///     .run(&[0.0, 2.0], &adjacency, 2)
///     .unwrap();
/// assert_eq!(history.row(1), &[2.0, 1.0]);
/// ```
pub struct Evolver<'a, R: ?Sized> {
    rule: &'a R,
    perturbation: Option<&'a (dyn Perturbation + Sync)>,
    past_conditions: Vec<Vec<f64>>,
    metrics: Metrics,
}

impl<'a, R> Evolver<'a, R>
where
    R: ActivityRule + ?Sized,
{
    #[must_use]
    pub fn new(rule: &'a R) -> Self {
        Self {
            rule,
            perturbation: None,
            past_conditions: Vec::new(),
            metrics: Metrics::default(),
        }
    }

    /// Installs a hook run on every completed timestep row.
    #[must_use]
    pub fn with_perturbation(mut self, perturbation: &'a (dyn Perturbation + Sync)) -> Self {
        self.perturbation = Some(perturbation);
        self
    }

    /// Activities that existed before timestep 0, oldest first.
    ///
    /// With `k` rows supplied, every neighbourhood carries the `k` rows that
    /// precede its current row, narrowed to the cell's predecessors.
    #[must_use]
    pub fn with_past_conditions(mut self, past_conditions: Vec<Vec<f64>>) -> Self {
        self.past_conditions = past_conditions;
        self
    }

    /// Logs progress every `interval` timesteps; 0 disables progress logs.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.metrics = Metrics::new(interval);
        self
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs the evolution on the calling thread.
    pub fn run<T: Numeric>(
        &self,
        initial_conditions: &[T],
        adjacency_matrix: &[Vec<T>],
        timesteps: usize,
    ) -> Result<ActivityHistory> {
        let (index, mut history) = self.prepare(initial_conditions, adjacency_matrix, timesteps)?;
        log_start(&index, timesteps, false);
        let started = Instant::now();

        let result = (1..timesteps).try_for_each(|t| {
            let step_started = Instant::now();
            let (completed, current) = history.step_rows(t);
            let previous = completed[t - 1].as_slice();
            let past = self.past_window(completed, t);

            for (cell, slot) in current.iter_mut().enumerate() {
                *slot = step_cell(self.rule, &self.metrics, &index, previous, &past, cell, t)?;
            }
            self.finish_timestep(t, current, step_started)
        });

        log_finish(result, history, started)
    }

    fn prepare<T: Numeric>(
        &self,
        initial_conditions: &[T],
        adjacency_matrix: &[Vec<T>],
        timesteps: usize,
    ) -> Result<(PredecessorIndex, ActivityHistory)> {
        if timesteps == 0 {
            return Err(EvolveError::validation("timesteps must be at least 1"));
        }
        if let Some(first_row) = adjacency_matrix.first() {
            if initial_conditions.len() != first_row.len() {
                return Err(EvolveError::validation(format!(
                    "the length of the initial conditions list ({}) does not match the given adjacency matrix ({})",
                    initial_conditions.len(),
                    first_row.len()
                )));
            }
        }
        if let Some((i, row)) = self
            .past_conditions
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != initial_conditions.len())
        {
            return Err(EvolveError::validation(format!(
                "past_conditions row {i} has {} entries, expected {}",
                row.len(),
                initial_conditions.len()
            )));
        }

        let initial = convert_row(initial_conditions, "initial_conditions")?;
        let index = PredecessorIndex::build(adjacency_matrix)?;

        let mut history = ActivityHistory::new(timesteps, index.num_cells());
        history.row_mut(0).copy_from_slice(&initial);
        Ok((index, history))
    }

    /// The rows preceding row `t - 1` in `past_conditions ++ history`.
    fn past_window<'s>(&'s self, completed: &'s [Vec<f64>], t: usize) -> Vec<&'s [f64]> {
        let k = self.past_conditions.len();
        (t - 1..t - 1 + k)
            .map(|j| {
                if j < k {
                    self.past_conditions[j].as_slice()
                } else {
                    completed[j - k].as_slice()
                }
            })
            .collect()
    }

    fn finish_timestep(&self, t: usize, current: &mut [f64], step_started: Instant) -> Result<()> {
        if let Some(perturbation) = self.perturbation {
            perturbation
                .perturb(t, current)
                .map_err(|source| EvolveError::Perturbation {
                    timestep: t,
                    source,
                })?;
            self.metrics.record_perturbation();
        }
        self.metrics
            .record_timestep(t, current.len(), step_started.elapsed());
        Ok(())
    }
}

#[cfg(feature = "parallel")]
impl<'a, R> Evolver<'a, R>
where
    R: ActivityRule + Sync + ?Sized,
{
    /// Runs the evolution with the cells of each timestep spread over the
    /// Rayon thread pool.
    ///
    /// Produces the same history as [`Evolver::run`] for rules that depend
    /// only on their arguments. If several cells fail within one timestep,
    /// which of their errors is reported is unspecified.
    pub fn run_parallel<T: Numeric>(
        &self,
        initial_conditions: &[T],
        adjacency_matrix: &[Vec<T>],
        timesteps: usize,
    ) -> Result<ActivityHistory> {
        let (index, mut history) = self.prepare(initial_conditions, adjacency_matrix, timesteps)?;
        log_start(&index, timesteps, true);
        let started = Instant::now();

        let rule = self.rule;
        let metrics = &self.metrics;
        let result = (1..timesteps).try_for_each(|t| {
            let step_started = Instant::now();
            let (completed, current) = history.step_rows(t);
            let previous = completed[t - 1].as_slice();
            let past = self.past_window(completed, t);

            current
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(cell, slot)| {
                    *slot = step_cell(rule, metrics, &index, previous, &past, cell, t)?;
                    Ok::<(), EvolveError>(())
                })?;
            self.finish_timestep(t, current, step_started)
        });

        log_finish(result, history, started)
    }
}

fn step_cell<R: ActivityRule + ?Sized>(
    rule: &R,
    metrics: &Metrics,
    index: &PredecessorIndex,
    previous: &[f64],
    past: &[&[f64]],
    cell: usize,
    t: usize,
) -> Result<f64> {
    let neighbourhood = assemble(index.predecessors(cell), previous, cell, past);
    metrics.record_rule_invocation();

    let value = rule
        .apply(&neighbourhood, cell, t)
        .map_err(|source| EvolveError::RuleInvocation {
            cell,
            timestep: t,
            source,
        })?;
    value
        .to_activity()
        .ok_or_else(|| EvolveError::RuleReturnType {
            cell,
            timestep: t,
            found: value.kind(),
        })
}

fn log_start(index: &PredecessorIndex, timesteps: usize, parallel: bool) {
    tracing::info!(
        cells = index.num_cells(),
        edges = index.edge_count(),
        timesteps = timesteps,
        parallel = parallel,
        "Evolution started"
    );
}

fn log_finish(
    result: Result<()>,
    history: ActivityHistory,
    started: Instant,
) -> Result<ActivityHistory> {
    match result {
        Ok(()) => {
            tracing::info!(
                timesteps = history.timesteps(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Evolution finished"
            );
            Ok(history)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Evolution aborted");
            Err(err)
        }
    }
}
