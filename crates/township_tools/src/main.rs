//! Township - Development Tools

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use township_tools::simulate::{simulate, SimulateOptions};
use township_tools::validate::validate_data_directory;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "township-tools")]
#[command(about = "Development tools for Township")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// Run a scripted session and print the final state as JSON
    Simulate {
        /// Path to data directory
        #[arg(long, default_value = "assets/data")]
        data: PathBuf,
        /// RON file with a list of player actions
        #[arg(long)]
        script: PathBuf,
        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,
        /// Acknowledge pending events before every EndTurn
        #[arg(long)]
        auto_events: bool,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            tracing::info!("Validating data files in: {}", path.display());
            match validate_data_directory(&path) {
                Ok(summary) => tracing::info!(
                    buildings = summary.buildings,
                    active_events = summary.active_events,
                    inactive_events = summary.inactive_events,
                    "Validation passed"
                ),
                Err(e) => {
                    tracing::error!("Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Simulate {
            data,
            script,
            seed,
            auto_events,
        } => {
            let options = SimulateOptions {
                data,
                script,
                seed,
                auto_events,
            };
            let output = simulate(&options).and_then(|report| {
                tracing::info!(
                    applied = report.applied,
                    rejected = report.rejected.len(),
                    "Script finished"
                );
                Ok(serde_json::to_string_pretty(&report.summary)?)
            });
            match output {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("Simulation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
