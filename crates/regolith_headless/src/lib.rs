//! Headless driver for the Regolith simulation.
//!
//! This crate loads a data directory, builds the catalog and drives a
//! simulation from JSON commands on stdin, with responses on stdout. This
//! enables:
//!
//! - **Scripted play**: a controller process plays without a UI
//! - **CI verification**: data validation and determinism checks
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from the controller (tick, run_command, etc.)
//! - **stdout**: Responses and state reports (JSON)
//! - **stderr**: Logs (human-readable)
//!
//! See [`protocol`] module for the full command/response format.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! echo '{"cmd":"tick","count":60}' | cargo run -p regolith_headless -- run
//!
//! # Check a data directory
//! cargo run -p regolith_headless -- validate --data assets/data
//!
//! # Verify determinism
//! cargo run -p regolith_headless -- verify --ticks 5000 --runs 4
//! ```

pub mod loader;
pub mod protocol;
pub mod runner;

pub use loader::{default_data_dir, load_catalog, load_game_data, LoadError};
pub use protocol::{Command, Response, StateReport};
pub use runner::{run_determinism_check, HeadlessRunner};
