//! Metrics collection for evolution runs.
//!
//! Provides structured logging and counters for monitoring long runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Progress is logged every this many timesteps unless configured otherwise.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100;

/// Counters shared by every timestep of a run.
///
/// Atomic so that rule invocations can be counted from Rayon workers.
pub struct Metrics {
    timesteps: AtomicU64,
    rule_invocations: AtomicU64,
    perturbations: AtomicU64,
    progress_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

impl Metrics {
    /// Creates a new metrics collector. An interval of 0 disables progress logs.
    #[must_use]
    pub fn new(progress_interval: u64) -> Self {
        Self {
            timesteps: AtomicU64::new(0),
            rule_invocations: AtomicU64::new(0),
            perturbations: AtomicU64::new(0),
            progress_interval,
            start_time: Instant::now(),
        }
    }

    /// Records a completed timestep with its duration.
    pub fn record_timestep(&self, timestep: usize, cells: usize, duration: Duration) {
        let done = self.timesteps.fetch_add(1, Ordering::Relaxed) + 1;

        if self.progress_interval > 0 && done % self.progress_interval == 0 {
            tracing::info!(
                timestep = timestep,
                cells = cells,
                rule_invocations = self.rule_invocations(),
                duration_us = duration.as_micros() as u64,
                "Evolution progress"
            );
        }
    }

    pub fn record_rule_invocation(&self) {
        self.rule_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_perturbation(&self) {
        self.perturbations.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of timesteps computed (timestep 0 is not counted).
    #[must_use]
    pub fn timesteps(&self) -> u64 {
        self.timesteps.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rule_invocations(&self) -> u64 {
        self.rule_invocations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn perturbations(&self) -> u64 {
        self.perturbations.load(Ordering::Relaxed)
    }

    /// Gets elapsed time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Defaults to `info`; `RUST_LOG` overrides it. Logs go to stderr so that
/// histories written to stdout stay parseable.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
