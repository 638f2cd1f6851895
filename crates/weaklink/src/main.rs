//! Weaklink CLI - impact, circuit and path diagnostics over inventory exports.
//!
//! Every command reads a JSON Lines connection export, builds the analysis
//! input in memory and prints the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use weaklink::Direction;

mod cli;

/// Weaklink: network inventory impact analysis.
#[derive(Parser)]
#[command(name = "weaklink")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Engine configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find resources that no longer reach an endpoint
    Impact {
        /// Connection export (JSON Lines)
        #[arg(short, long)]
        edges: PathBuf,

        /// Endpoint resource key (repeatable)
        #[arg(short = 'p', long = "endpoint", required = true)]
        endpoints: Vec<String>,

        /// Follow connection orientation instead of treating links as bidirectional
        #[arg(long)]
        directed: bool,

        /// Also report weak nodes (single points of failure)
        #[arg(short, long)]
        weak: bool,

        /// Override impact.weak-link-threshold
        #[arg(long, requires = "weak")]
        threshold: Option<usize>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate the integrity of a circuit over its path
    Circuit {
        /// Connections on the circuit path (JSON Lines)
        #[arg(short, long)]
        edges: PathBuf,

        /// A-point resource key
        #[arg(short, long)]
        a_point: String,

        /// Z-point resource key
        #[arg(short, long)]
        z_point: String,

        /// Last persisted health record (JSON); defaults to healthy
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Print the new health record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enumerate simple paths between resources
    Paths {
        /// Connection export (JSON Lines)
        #[arg(short, long)]
        edges: PathBuf,

        /// Start resource key
        #[arg(short, long)]
        start: String,

        /// End resource key; without it every maximal path is listed
        #[arg(short = 't', long)]
        end: Option<String>,

        /// Maximum connections per path (0 = unbounded)
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,

        /// Traversal direction (OUTBOUND or INBOUND)
        #[arg(long)]
        direction: Option<Direction>,

        /// Resource keys never to enter (repeatable)
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// Only follow connections that are Up
        #[arg(long)]
        only_up: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = cli::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Impact {
            edges,
            endpoints,
            directed,
            weak,
            threshold,
            json,
        } => cli::impact::run(
            &config,
            &edges,
            &endpoints,
            &cli::impact::ImpactArgs {
                directed,
                weak,
                threshold,
                json,
            },
        ),
        Commands::Circuit {
            edges,
            a_point,
            z_point,
            previous,
            json,
        } => cli::circuit::run(&config, &edges, &a_point, &z_point, previous.as_deref(), json),
        Commands::Paths {
            edges,
            start,
            end,
            max_depth,
            direction,
            exclude,
            only_up,
            json,
        } => cli::paths::run(
            &config,
            &edges,
            &cli::paths::PathsArgs {
                start,
                end,
                max_depth,
                direction,
                exclude,
                only_up,
                json,
            },
        ),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
