//! # Fittrack Architecture
//!
//! Fittrack is a **UI-agnostic fitness tracking library**: it computes weight-loss
//! pacing, workload recommendations and distance conversions, and logs every result
//! as a history entry in one of three interchangeable storage backends. The `fittrack`
//! binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/fittrack)                                      │
//! │  - Parses arguments, renders output, installs logging       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, owns the backend selector                   │
//! │  - Normalizes inputs (sort fields, backend names)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, fitness.rs)                  │
//! │  - Calculations plus the writes they imply                  │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait, one contract for all backends           │
//! │  - MemStore, FileStore, SqliteStore, BackendSelector        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types. It never
//! writes to stdout or stderr and never exits the process. Diagnostics go through
//! `tracing`; installing a subscriber is the client's job.
//!
//! ## Testing Strategy
//!
//! 1. **Storage** (`store/*.rs`): each backend tested on its own, plus
//!    `tests/backend_contract.rs` holding all three to the same behavior.
//! 2. **Commands** (`commands/*.rs`): business logic against `MemStore`.
//! 3. **API** (`api.rs`): dispatch to the active backend.
//! 4. **CLI**: end-to-end runs of the binary in `crates/fittrack/tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade for all clients
//! - [`commands`]: Business operations
//! - [`fitness`]: Pure calculations
//! - [`model`]: Profiles, history entries, sort fields, backend kinds
//! - [`store`]: Storage contract and backends
//! - [`config`]: Layered configuration
//! - [`error`]: Error type

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod fitness;
pub mod model;
pub mod store;
