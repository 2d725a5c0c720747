//! # Rendering
//!
//! Turns `CmdResult` values into terminal text. Layout (column widths, truncation)
//! is computed with `unicode-width` so non-ASCII operation types and details line up;
//! colors come from `console` styles and are only applied when `use_color` is set.

use console::Style;
use fittrackapp::commands::{CmdMessage, CmdResult, MessageLevel};
use fittrackapp::model::{HistoryEntry, ProfileSnapshot};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const DATE_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 8;
const GAP: &str = "  ";

struct Palette {
    header: Style,
    id: Style,
    inactive: Style,
    label: Style,
    info: Style,
    success: Style,
    warning: Style,
    error: Style,
}

impl Palette {
    fn new(use_color: bool) -> Self {
        let style = |s: Style| s.force_styling(use_color);
        Self {
            header: style(Style::new().bold()),
            id: style(Style::new().yellow()),
            inactive: style(Style::new().dim()),
            label: style(Style::new().bold()),
            info: style(Style::new()),
            success: style(Style::new().green()),
            warning: style(Style::new().yellow()),
            error: style(Style::new().red()),
        }
    }
}

/// How entries in a result should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryView {
    Table,
    Detail,
}

pub fn render_result(result: &CmdResult, view: EntryView, use_color: bool) -> String {
    let palette = Palette::new(use_color);
    let mut out = String::new();

    if !result.entries.is_empty() {
        match view {
            EntryView::Table => out.push_str(&entry_table(&result.entries, &palette)),
            EntryView::Detail => {
                for entry in &result.entries {
                    out.push_str(&entry_detail(entry, &palette));
                }
            }
        }
    }
    if let Some(profile) = &result.profile {
        out.push_str(&profile_block(profile, &palette));
    }
    out.push_str(&messages(&result.messages, &palette));
    out
}

pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn entry_table(entries: &[HistoryEntry], palette: &Palette) -> String {
    let ids: Vec<String> = entries.iter().map(|e| e.id.to_string()).collect();
    let id_width = ids.iter().map(|s| s.width()).chain(Some(2)).max().unwrap_or(2);
    let type_width = entries
        .iter()
        .map(|e| e.operation_type.width())
        .chain(Some(4))
        .max()
        .unwrap_or(4);
    let fixed = id_width + DATE_WIDTH + type_width + STATUS_WIDTH + GAP.len() * 4;
    let details_width = LINE_WIDTH.saturating_sub(fixed).max(10);

    let mut out = String::new();
    let header = format!(
        "{}{GAP}{}{GAP}{}{GAP}{}{GAP}{}",
        pad("ID", id_width),
        pad("Date", DATE_WIDTH),
        pad("Type", type_width),
        pad("Status", STATUS_WIDTH),
        "Details",
    );
    out.push_str(&palette.header.apply_to(header).to_string());
    out.push('\n');

    for (entry, id) in entries.iter().zip(&ids) {
        let first_line = entry.details.lines().next().unwrap_or("");
        let mut details = truncate_to_width(first_line, details_width);
        if first_line.len() < entry.details.trim_end().len() && !details.ends_with('…') {
            details.push('…');
        }
        let rest = format!(
            "{}{GAP}{}{GAP}{}{GAP}{}",
            pad(&entry.date.format("%Y-%m-%d").to_string(), DATE_WIDTH),
            pad(&entry.operation_type, type_width),
            pad(entry.status_label(), STATUS_WIDTH),
            details,
        );
        let id_cell = palette.id.apply_to(pad(id, id_width));
        if entry.active {
            out.push_str(&format!("{}{GAP}{}\n", id_cell, rest));
        } else {
            out.push_str(&format!("{}{GAP}{}\n", id_cell, palette.inactive.apply_to(rest)));
        }
    }
    out
}

fn entry_detail(entry: &HistoryEntry, palette: &Palette) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        palette.label.apply_to("Entry"),
        palette.id.apply_to(entry.id)
    ));
    out.push_str(&format!("  Date:    {}\n", entry.date.format("%Y-%m-%d")));
    out.push_str(&format!("  Type:    {}\n", entry.operation_type));
    out.push_str(&format!("  Status:  {}\n", entry.status_label()));
    out.push_str("  Details:\n");
    for line in entry.details.lines() {
        out.push_str(&format!("    {}\n", line));
    }
    out
}

fn profile_block(profile: &ProfileSnapshot, palette: &Palette) -> String {
    let rows = [
        ("Current weight", format!("{} kg", profile.current_weight)),
        ("Target weight", format!("{} kg", profile.target_weight)),
        ("Target date", profile.target_date.format("%Y-%m-%d").to_string()),
        ("Workouts this week", profile.workouts_this_week.to_string()),
        (
            "Average workout",
            format!("{} min", profile.avg_workout_duration),
        ),
    ];
    let label_width = rows.iter().map(|(l, _)| l.width()).max().unwrap_or(0);

    let mut out = format!("{}\n", palette.label.apply_to("Profile"));
    for (label, value) in rows {
        out.push_str(&format!("  {}  {}\n", pad(label, label_width), value));
    }
    out
}

fn messages(messages: &[CmdMessage], palette: &Palette) -> String {
    messages
        .iter()
        .map(|msg| {
            let style = match msg.level {
                MessageLevel::Info => &palette.info,
                MessageLevel::Success => &palette.success,
                MessageLevel::Warning => &palette.warning,
                MessageLevel::Error => &palette.error,
            };
            format!("{}\n", style.apply_to(&msg.content))
        })
        .collect()
}

/// Left-aligns `s` in a column `width` cells wide.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}
