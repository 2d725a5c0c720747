//! # CLI Behavior
//!
//! This is **one possible UI client** for fittrack, not the application itself.
//!
//! Every calculation (`progress`, `workload`, `convert`) is logged to the active
//! backend's history. `history` without a subcommand lists it; `--search`, `--type`
//! and `--sort` pick a different view and are mutually exclusive.
//!
//! The memory backend lives only as long as one invocation, so it is mainly useful
//! with `--json` in scripts and for trying things out.
//!
//! ## Module Structure
//!
//! - `commands`: Entry point, logging setup and dispatch to the API
//! - `render`: Tables, detail views, profile block and messages
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
