//! Saved filter output formatting.

use anniv_filter_rs::{FlatFilterConfig, SavedFilter, ViewType};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{format_created_at, truncate_id, truncate_str};

/// JSON output structure for the presets list command.
#[derive(Serialize)]
pub struct PresetsListOutput<'a> {
    pub view: ViewType,
    pub presets: &'a [SavedFilter],
}

/// Formats saved filters as JSON.
pub fn format_presets_json(
    view: ViewType,
    presets: &[SavedFilter],
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&PresetsListOutput { view, presets })
}

/// Formats saved filters as a table.
pub fn format_presets_table(view: ViewType, presets: &[SavedFilter], use_colors: bool) -> String {
    if presets.is_empty() {
        return format!("No saved {view} filters.\n");
    }

    let mut output = String::new();

    let header = format!("{:<8} {:<24} {:<16} {}", "ID", "Name", "Created", "Filter");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for preset in presets {
        output.push_str(&format!(
            "{:<8} {:<24} {:<16} {}\n",
            truncate_id(&preset.id.to_string()),
            truncate_str(&preset.name, 24),
            format_created_at(preset.created_at.as_ref()),
            truncate_str(&describe_config(&preset.config), 60),
        ));
    }

    output
}

/// Formats one saved filter as JSON.
pub fn format_preset_details_json(preset: &SavedFilter) -> Result<String, serde_json::Error> {
    let output = serde_json::json!({
        "preset": preset,
        "filterGroup": preset.config.compile(),
    });
    serde_json::to_string_pretty(&output)
}

/// Formats one saved filter for display.
pub fn format_preset_details_table(preset: &SavedFilter, use_colors: bool) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!("{}\n\n", preset.name.green().bold()));
    } else {
        output.push_str(&format!("{}\n\n", preset.name));
    }

    output.push_str(&format!("ID:      {}\n", preset.id));
    let created = format_created_at(preset.created_at.as_ref());
    if !created.is_empty() {
        output.push_str(&format!("Created: {created}\n"));
    }

    let parts = config_parts(&preset.config);
    if parts.is_empty() {
        output.push_str("Filter:  (matches everyone)\n");
    } else {
        output.push_str("Filter:\n");
        for part in parts {
            output.push_str(&format!("  {part}\n"));
        }
    }

    output
}

/// Formats the result of saving a filter.
pub fn format_saved_preset(preset: &SavedFilter, view: ViewType, use_colors: bool) -> String {
    let id = truncate_id(&preset.id.to_string());
    if use_colors {
        format!(
            "Saved {view} filter '{}' ({})\n",
            preset.name.green(),
            id.dimmed()
        )
    } else {
        format!("Saved {view} filter '{}' ({id})\n", preset.name)
    }
}

/// Formats the result of deleting a filter.
pub fn format_deleted_preset(preset: &SavedFilter, view: ViewType) -> String {
    format!("Deleted {view} filter '{}'\n", preset.name)
}

/// Summarizes the active settings of a flat config on one line.
fn describe_config(config: &FlatFilterConfig) -> String {
    let parts = config_parts(config);
    if parts.is_empty() {
        "(everyone)".to_string()
    } else {
        parts.join(", ")
    }
}

fn config_parts(config: &FlatFilterConfig) -> Vec<String> {
    config
        .compile()
        .conditions
        .iter()
        .map(|c| {
            if c.value.is_null() {
                format!("{} {}", c.field, c.operator)
            } else {
                format!("{} {} {}", c.field, c.operator, c.value)
            }
        })
        .collect()
}
