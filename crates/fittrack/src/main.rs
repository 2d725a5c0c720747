//! # Fittrack CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/fittrackapp/`: Core library (model, storage backends, commands, API)
//! - `crates/fittrack/`: This CLI, a client of the library
//!
//! Everything from the library's `api.rs` inward is UI agnostic. Argument parsing,
//! logging setup, rendering and exit codes all live here.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
