//! # CLI Layer
//!
//! The **only** place in fittrack that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Parses arguments
//! - Formats output for humans
//!
//! Flow: parse → init logging → load config (with `--backend` override) → open the
//! API → dispatch → render. Errors bubble up to `main` as `anyhow::Error`.

use super::render::{self, EntryView};
use super::setup::{Cli, Commands, HistoryCommands, HistoryView, ProfileCommands};
use anyhow::{Context, Result};
use clap::Parser;
use fittrackapp::api::FitTrackApi;
use fittrackapp::commands::history::EntryEdit;
use fittrackapp::commands::CmdResult;
use fittrackapp::config::FitTrackConfig;
use fittrackapp::model::{parse_date, ProfileSnapshot};
use serde::Serialize;
use std::io::IsTerminal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config =
        FitTrackConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(backend) = &cli.backend {
        config.storage.backend = backend.clone();
    }
    debug!(?config, "configuration resolved");

    if let Commands::Config { template } = &cli.command {
        return print_config(&config, *template, cli.json);
    }

    let mut api = FitTrackApi::open(&config)?;
    let (result, view) = dispatch(&mut api, cli.command)?;

    if cli.json {
        print!("{}", render::render_json(&result)?);
    } else {
        let use_color = std::io::stdout().is_terminal();
        print!("{}", render::render_result(&result, view, use_color));
    }
    Ok(())
}

/// `-v` and `-vv` win over `RUST_LOG`; without them `RUST_LOG` applies, else `warn`.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(api: &mut FitTrackApi, command: Commands) -> Result<(CmdResult, EntryView)> {
    let result = match command {
        Commands::Progress {
            current,
            target,
            date,
            workouts,
            duration,
        } => {
            let snapshot = ProfileSnapshot::new(current, target, parse_date(&date)?, workouts, duration);
            api.calculate_progress(&snapshot)?
        }
        Commands::Workload { workouts, duration } => api.check_workload(workouts, duration)?,
        Commands::Convert { miles } => api.convert_miles(miles)?,
        Commands::History { action, view } => return history(api, action, view),
        Commands::Profile { action } => match action.unwrap_or(ProfileCommands::Show) {
            ProfileCommands::Show => api.show_profile()?,
            ProfileCommands::Delete => api.delete_profile()?,
        },
        Commands::Backend { kind } => api.select_backend(&kind)?,
        // Printed before the API is opened
        Commands::Config { .. } => CmdResult::default(),
    };
    Ok((result, EntryView::Table))
}

fn history(
    api: &mut FitTrackApi,
    action: Option<HistoryCommands>,
    view: HistoryView,
) -> Result<(CmdResult, EntryView)> {
    let action = action.unwrap_or(HistoryCommands::List { view });
    let (result, shape) = match action {
        HistoryCommands::List { view } => (list_view(api, &view)?, EntryView::Table),
        HistoryCommands::Show { id } => (api.show_entry(id)?, EntryView::Detail),
        HistoryCommands::Edit {
            id,
            operation_type,
            details,
            date,
            active,
        } => {
            let changes = EntryEdit {
                date: date.as_deref().map(parse_date).transpose()?,
                operation_type,
                details,
                active,
            };
            (api.edit_entry(id, changes)?, EntryView::Detail)
        }
        HistoryCommands::Delete { id } => (api.delete_entry(id)?, EntryView::Table),
        HistoryCommands::Activate { id } => (api.set_entry_active(id, true)?, EntryView::Table),
        HistoryCommands::Deactivate { id } => (api.set_entry_active(id, false)?, EntryView::Table),
    };
    Ok((result, shape))
}

fn list_view(api: &FitTrackApi, view: &HistoryView) -> Result<CmdResult> {
    let result = if let Some(term) = &view.search {
        api.search_history(term)?
    } else if let Some(operation_type) = &view.operation_type {
        api.filter_history(operation_type)?
    } else if let Some(field) = &view.sort {
        api.sort_history(field, !view.desc)?
    } else {
        api.list_history()?
    };
    Ok(result)
}

#[derive(Serialize)]
struct ResolvedConfig {
    backend: String,
    data_dir: String,
    database: String,
}

fn print_config(config: &FitTrackConfig, template: bool, json: bool) -> Result<()> {
    if template {
        print!("{}", FitTrackConfig::template());
        return Ok(());
    }
    let storage = &config.storage;
    let resolved = ResolvedConfig {
        backend: storage.backend()?.to_string(),
        data_dir: storage.data_dir().display().to_string(),
        database: storage.database().display().to_string(),
    };
    if json {
        print!("{}", render::render_json(&resolved)?);
    } else {
        println!("storage.backend  = {}", resolved.backend);
        println!("storage.data_dir = {}", resolved.data_dir);
        println!("storage.database = {}", resolved.database);
    }
    Ok(())
}
