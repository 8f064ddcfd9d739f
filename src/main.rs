//! Binary entry point for quakelens.
//!
//! This binary provides the CLI interface for the earthquake dashboard.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::process::ExitCode;

use quakelens::cli::{
    cmd_events, cmd_layers_add, cmd_layers_deselect, cmd_layers_list, cmd_layers_select,
    cmd_regions, cmd_request, cmd_tasks,
};
use quakelens::config::{CONFIG_PATH_ENV, QuakelensConfig};
use quakelens::observability;

/// Quakelens - an earthquake analysis dashboard for the terminal.
#[derive(Parser)]
#[command(name = "quakelens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List the monitored region catalog.
    Regions,

    /// Fetch and list earthquakes near a region.
    Events {
        /// Region name (defaults to the configured default region).
        region: Option<String>,

        /// Override the proximity radius in kilometers.
        #[arg(long)]
        radius_km: Option<f64>,

        /// Override the magnitude floor.
        #[arg(long)]
        min_magnitude: Option<f64>,

        /// Skip the event cache and force a fresh fetch.
        #[arg(long)]
        no_cache: bool,
    },

    /// Request an analysis product for an event.
    Request {
        /// Target event id.
        event_id: String,

        /// Analysis kind: intf or cd.
        #[arg(short, long, default_value = "intf")]
        analysis: String,

        /// Submit as this user instead of the configured identity.
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show the requested-analysis worklist.
    Tasks,

    /// Manage the layer working set.
    Layers {
        /// Layer subcommand.
        #[command(subcommand)]
        action: LayerAction,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Layer subcommands.
#[derive(Subcommand)]
enum LayerAction {
    /// List the working set.
    List,

    /// Add an analysis product by filename.
    Add {
        /// Product filename, e.g. `us7000m9g4-earthquake-intf`.
        filename: String,
    },

    /// Select a layer for display, fetching its payload if needed.
    Select {
        /// Layer filename.
        filename: String,
    },

    /// Deselect a layer.
    Deselect {
        /// Layer filename.
        filename: String,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: &QuakelensConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Regions => cmd_regions(config),

        Commands::Events {
            region,
            radius_km,
            min_magnitude,
            no_cache,
        } => cmd_events(config, region.as_deref(), radius_km, min_magnitude, no_cache).await,

        Commands::Request {
            event_id,
            analysis,
            user,
        } => cmd_request(config, &event_id, &analysis, user.as_deref()).await,

        Commands::Tasks => cmd_tasks(config).await,

        Commands::Layers { action } => match action {
            LayerAction::List => cmd_layers_list(config),
            LayerAction::Add { filename } => cmd_layers_add(config, &filename),
            LayerAction::Select { filename } => cmd_layers_select(config, &filename).await,
            LayerAction::Deselect { filename } => cmd_layers_deselect(config, &filename),
        },

        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "quakelens", &mut std::io::stdout());
            Ok(())
        },
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<QuakelensConfig, Box<dyn std::error::Error>> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        let config = QuakelensConfig::load_from_file(std::path::Path::new(config_path))?;
        return Ok(config.with_env_overrides());
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        if !config_path.trim().is_empty() {
            let config = QuakelensConfig::load_from_file(std::path::Path::new(&config_path))?;
            return Ok(config.with_env_overrides());
        }
    }

    // Otherwise, load from default location
    Ok(QuakelensConfig::load_default())
}
