//! CLI frontend for the Reef grid-world simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reef",
    about = "Reef: a discrete-event grid-world simulation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a directory with a sample world and image list
    Init {
        /// Directory to create
        dir: PathBuf,
    },

    /// Load a world and report skipped lines and entity counts
    Check {
        /// World description file
        #[arg(short, long, default_value = "world.sav")]
        world: PathBuf,

        /// Image list file (optional; missing files fall back to placeholders)
        #[arg(short, long, default_value = "imagelist")]
        images: PathBuf,

        /// Grid rows (1 to 1024)
        #[arg(
            long,
            default_value = "48",
            value_parser = clap::value_parser!(i32).range(1..=1024)
        )]
        rows: i32,

        /// Grid columns (1 to 1024)
        #[arg(
            long,
            default_value = "64",
            value_parser = clap::value_parser!(i32).range(1..=1024)
        )]
        cols: i32,
    },

    /// Run the simulation for a number of clock steps
    Run {
        /// World description file
        #[arg(short, long, default_value = "world.sav")]
        world: PathBuf,

        /// Image list file (optional; missing files fall back to placeholders)
        #[arg(short, long, default_value = "imagelist")]
        images: PathBuf,

        /// Grid rows (1 to 1024)
        #[arg(
            long,
            default_value = "48",
            value_parser = clap::value_parser!(i32).range(1..=1024)
        )]
        rows: i32,

        /// Grid columns (1 to 1024)
        #[arg(
            long,
            default_value = "64",
            value_parser = clap::value_parser!(i32).range(1..=1024)
        )]
        cols: i32,

        /// Number of clock steps to run
        #[arg(short = 'n', long, default_value = "100")]
        steps: u64,

        /// Simulated milliseconds per step
        #[arg(long, default_value = "100")]
        step_ms: u64,

        /// RNG seed for deterministic runs
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Multiplier applied to every entity period
        #[arg(long, default_value = "1.0")]
        time_scale: f64,

        /// Show the full event log and info-level logging
        #[arg(short, long)]
        verbose: bool,

        /// Print the final grid as text
        #[arg(long)]
        map: bool,

        /// Print a JSON snapshot instead of the summary
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Run { verbose: true, .. }));

    let result = match cli.command {
        Commands::Init { dir } => commands::init::run(&dir),
        Commands::Check {
            world,
            images,
            rows,
            cols,
        } => commands::check::run(&commands::WorldSource {
            world,
            images,
            rows,
            cols,
        }),
        Commands::Run {
            world,
            images,
            rows,
            cols,
            steps,
            step_ms,
            seed,
            time_scale,
            verbose,
            map,
            json,
        } => commands::run::run(
            &commands::WorldSource {
                world,
                images,
                rows,
                cols,
            },
            &commands::run::RunOptions {
                steps,
                step_ms,
                seed,
                time_scale,
                verbose,
                map,
                json,
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
