use anyhow::{Context, Result};
use clap::Parser;
use netomata_core::{init_logging, AppConfig};
use netomata_lib::{history_to_json, run, NetworkFile};
use std::fs;
use std::io::Write;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network file (JSON) with initial conditions and adjacency matrix
    #[arg(short, long)]
    network: String,

    /// Custom config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Number of timesteps, including the initial conditions
    #[arg(short, long)]
    timesteps: Option<usize>,

    /// Evaluate cells in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Write the history here instead of stdout
    #[arg(short, long)]
    output: Option<String>,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {path}"))?;
            AppConfig::from_toml(&content).with_context(|| format!("Invalid config {path}"))?
        }
        None => AppConfig::default(),
    };
    if let Some(timesteps) = args.timesteps {
        config.run.timesteps = timesteps;
    }
    if args.parallel {
        config.engine.parallel = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(&args)?;
    let network = NetworkFile::load(&args.network)
        .with_context(|| format!("Failed to load network {}", args.network))?;

    let history = run(&network, &config)?;
    let json = history_to_json(&history)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {path}"))?;
            tracing::info!(path = %path, "History written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
