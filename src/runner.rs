//! Runs a network file under an [`AppConfig`].

use crate::network_file::NetworkFile;
use anyhow::Context;
use netomata_core::{ActivityHistory, ActivityRule, AppConfig, Evolver};

/// Evolves `network` with the rule, perturbation and engine settings of
/// `config`.
pub fn run(network: &NetworkFile, config: &AppConfig) -> anyhow::Result<ActivityHistory> {
    config.validate()?;

    let rule = config.rule.build();
    let noise = config.perturbation.build();
    let past = network
        .past_activities()
        .context("Failed to read past conditions")?;

    let mut evolver = Evolver::new(&*rule)
        .with_past_conditions(past)
        .with_progress_interval(config.engine.progress_interval);
    if let Some(noise) = &noise {
        evolver = evolver.with_perturbation(noise);
    }

    tracing::info!(
        config = %config.fingerprint(),
        rule = ?config.rule.kind,
        cells = network.num_cells(),
        "Running network"
    );

    let timesteps = config.run.timesteps;
    let history = if config.engine.parallel {
        run_parallel(&evolver, network, timesteps, config.engine.threads)?
    } else {
        evolver.run(
            &network.initial_conditions,
            &network.adjacency_matrix,
            timesteps,
        )?
    };

    let metrics = evolver.metrics();
    let active_cells = history
        .last()
        .map_or(0, |row| row.iter().filter(|&&a| a != 0.0).count());
    tracing::info!(
        rule_invocations = metrics.rule_invocations(),
        perturbations = metrics.perturbations(),
        elapsed_ms = metrics.elapsed().as_millis() as u64,
        active_cells,
        fingerprint = %history.fingerprint(),
        "Run complete"
    );
    Ok(history)
}

/// Serializes `history` as JSON rows.
///
/// JSON has no encoding for NaN or infinity, so a history holding either is
/// rejected instead of being written with `null` entries.
pub fn history_to_json(history: &ActivityHistory) -> anyhow::Result<String> {
    for (timestep, row) in history.rows().iter().enumerate() {
        if let Some(cell) = row.iter().position(|a| !a.is_finite()) {
            anyhow::bail!(
                "Activity of cell {cell} at timestep {timestep} is {}, which JSON cannot represent",
                row[cell]
            );
        }
    }
    Ok(serde_json::to_string(history)?)
}

#[cfg(feature = "parallel")]
fn run_parallel<R: ActivityRule + Sync + ?Sized>(
    evolver: &Evolver<'_, R>,
    network: &NetworkFile,
    timesteps: usize,
    threads: Option<usize>,
) -> anyhow::Result<ActivityHistory> {
    let evolve = || {
        evolver.run_parallel(
            &network.initial_conditions,
            &network.adjacency_matrix,
            timesteps,
        )
    };
    let history = match threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to build thread pool")?
            .install(evolve)?,
        None => evolve()?,
    };
    Ok(history)
}

#[cfg(not(feature = "parallel"))]
fn run_parallel<R: ActivityRule + ?Sized>(
    evolver: &Evolver<'_, R>,
    network: &NetworkFile,
    timesteps: usize,
    _threads: Option<usize>,
) -> anyhow::Result<ActivityHistory> {
    tracing::warn!("Built without the `parallel` feature; running sequentially");
    Ok(evolver.run(
        &network.initial_conditions,
        &network.adjacency_matrix,
        timesteps,
    )?)
}
