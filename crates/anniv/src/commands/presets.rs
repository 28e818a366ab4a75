//! Presets command implementation.
//!
//! Lists and manages saved filters. Each view keeps its own list under the
//! `advanced-filters-<view>` key of the preset file.

use anniv_filter_rs::{FlatFilterConfig, ViewType};

use super::config::load_config;
use super::{CommandContext, Result};
use crate::output::{
    format_deleted_preset, format_preset_details_json, format_preset_details_table,
    format_presets_json, format_presets_table, format_saved_preset,
};

/// Executes the presets list command.
pub async fn execute_list(ctx: &CommandContext, view: ViewType) -> Result<()> {
    let presets = load_config()?.preset_store()?;
    let filters = presets.list(view).await?;

    if ctx.json_output {
        println!("{}", format_presets_json(view, &filters)?);
    } else if !ctx.quiet {
        print!("{}", format_presets_table(view, &filters, ctx.use_colors));
    }

    Ok(())
}

/// Executes the presets show command.
pub async fn execute_show(ctx: &CommandContext, view: ViewType, id_or_name: &str) -> Result<()> {
    let presets = load_config()?.preset_store()?;
    let preset = presets.find(view, id_or_name).await?;

    if ctx.json_output {
        println!("{}", format_preset_details_json(&preset)?);
    } else if !ctx.quiet {
        print!("{}", format_preset_details_table(&preset, ctx.use_colors));
    }

    Ok(())
}

// ============================================================================
// Presets Save Command
// ============================================================================

/// Executes the presets save command.
///
/// # Errors
///
/// Returns an error if the name is blank or the preset file cannot be written.
pub async fn execute_save(
    ctx: &CommandContext,
    view: ViewType,
    name: &str,
    config: FlatFilterConfig,
) -> Result<()> {
    let presets = load_config()?.preset_store()?;
    if config.is_inactive() && !ctx.quiet && !ctx.json_output {
        eprintln!("Note: no filter options given; this filter matches everyone");
    }

    let saved = presets.save(view, name, config).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "created",
            "view": view,
            "preset": saved,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        print!("{}", format_saved_preset(&saved, view, ctx.use_colors));
    }

    Ok(())
}

// ============================================================================
// Presets Delete Command
// ============================================================================

/// Executes the presets delete command.
///
/// The preset is looked up by id or name first, so a close name gets a
/// suggestion instead of a silent no-op.
pub async fn execute_delete(ctx: &CommandContext, view: ViewType, id_or_name: &str) -> Result<()> {
    let presets = load_config()?.preset_store()?;
    let preset = presets.find(view, id_or_name).await?;
    let deleted = presets.delete(view, &preset.id).await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if deleted { "deleted" } else { "unchanged" },
            "view": view,
            "id": preset.id,
            "name": preset.name,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        print!("{}", format_deleted_preset(&preset, view));
    }

    Ok(())
}
