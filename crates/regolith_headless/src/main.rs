//! Headless Regolith runner.
//!
//! This binary runs the simulation without a UI, controlled via JSON on
//! stdin/stdout. Designed for scripted play, CI data checks and determinism
//! verification.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p regolith_headless
//!
//! # Advance a fresh game and print the final state
//! cargo run -p regolith_headless -- simulate --ticks 3600
//!
//! # Check a data directory
//! cargo run -p regolith_headless -- validate --data assets/data
//!
//! # Verify determinism
//! cargo run -p regolith_headless -- verify --ticks 5000 --runs 5
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use regolith_core::catalog::Catalog;
use regolith_core::simulation::Simulation;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use regolith_headless::{
    loader::{load_catalog, load_game_data, resolve_data_dir},
    protocol::Response,
    runner::{run_determinism_check, HeadlessRunner},
};

#[derive(Parser)]
#[command(name = "regolith_headless")]
#[command(about = "Headless Regolith runner for scripted play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory (default: $REGOLITH_DATA_DIR or assets/data)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON-lines protocol on stdin/stdout
    Run,

    /// Advance a fresh game and print the final state
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "3600")]
        ticks: u64,
    },

    /// Load and validate a data directory
    Validate,

    /// Verify determinism by running the same game multiple times
    Verify {
        /// Ticks per run
        #[arg(short, long, default_value = "5000")]
        ticks: u64,

        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout is for protocol output
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => cmd_run(cli.data),
        Commands::Simulate { ticks } => cmd_simulate(cli.data, ticks),
        Commands::Validate => cmd_validate(cli.data),
        Commands::Verify { ticks, runs } => cmd_verify(cli.data, ticks, runs),
    }
}

/// Load the catalog or report why not.
fn catalog_or_exit(data: Option<PathBuf>) -> Result<Arc<Catalog>, ExitCode> {
    let loaded = resolve_data_dir(data).and_then(|dir| load_catalog(&dir));
    loaded.map_err(|e| {
        tracing::error!("Failed to load game data: {}", e);
        ExitCode::FAILURE
    })
}

/// Serve the protocol on stdin/stdout.
fn cmd_run(data: Option<PathBuf>) -> ExitCode {
    let catalog = match catalog_or_exit(data) {
        Ok(c) => c,
        Err(code) => return code,
    };

    tracing::info!("Starting interactive session");
    let mut runner = HeadlessRunner::new(catalog);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    match runner.run(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Session failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run a fresh game for a fixed number of ticks.
fn cmd_simulate(data: Option<PathBuf>, ticks: u64) -> ExitCode {
    let catalog = match catalog_or_exit(data) {
        Ok(c) => c,
        Err(code) => return code,
    };

    tracing::info!("Simulating {} ticks", ticks);
    let mut sim = Simulation::new(catalog);
    let start = std::time::Instant::now();
    for _ in 0..ticks {
        sim.advance_tick();
    }
    let elapsed = start.elapsed();

    let runner = HeadlessRunner::from_simulation(sim);
    let report = Response::State(Box::new(runner.state_report()));
    print!("{}", report.to_json_line());

    eprintln!(
        "Simulated {} ticks in {:.2?} ({:.0} ticks/sec)",
        ticks,
        elapsed,
        ticks as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    eprintln!(
        "Final state hash: {:016x}",
        runner.simulation().state_hash()
    );
    ExitCode::SUCCESS
}

/// Report every problem in a data directory.
fn cmd_validate(data: Option<PathBuf>) -> ExitCode {
    let dir = match resolve_data_dir(data) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("FAIL: {e}");
            return ExitCode::FAILURE;
        }
    };

    let game_data = match load_game_data(&dir) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("FAIL: {e}");
            return ExitCode::FAILURE;
        }
    };

    let problems = game_data.validate();
    if !problems.is_empty() {
        eprintln!("FAIL: {} problem(s) in {}", problems.len(), dir.display());
        for problem in &problems {
            eprintln!("  - {problem}");
        }
        return ExitCode::FAILURE;
    }

    match Catalog::from_data(game_data) {
        Ok(catalog) => {
            eprintln!("PASS: {} is valid", dir.display());
            eprintln!("  Resources:   {}", catalog.resources.len());
            eprintln!("  Buildings:   {}", catalog.buildings.len());
            eprintln!("  Commands:    {}", catalog.commands.len());
            eprintln!("  Research:    {}", catalog.research.len());
            eprintln!("  Projects:    {}", catalog.projects.len());
            eprintln!("  Events:      {}", catalog.events.len());
            eprintln!("  Adversaries: {}", catalog.adversaries.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("FAIL: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Verify determinism.
fn cmd_verify(data: Option<PathBuf>, ticks: u64, runs: u32) -> ExitCode {
    let catalog = match catalog_or_exit(data) {
        Ok(c) => c,
        Err(code) => return code,
    };

    tracing::info!("Verifying determinism: {} ticks, {} runs", ticks, runs);
    let hashes = run_determinism_check(&catalog, ticks, runs);

    if hashes.windows(2).all(|w| w[0] == w[1]) {
        eprintln!("PASS: All {runs} runs produced identical results");
        if let Some(hash) = hashes.first() {
            eprintln!("  Final hash: {hash:016x}");
        }
        ExitCode::SUCCESS
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        for (run, hash) in hashes.iter().enumerate() {
            eprintln!("  Run {run}: {hash:016x}");
        }
        ExitCode::FAILURE
    }
}
