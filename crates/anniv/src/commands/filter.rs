//! Filter command implementation.
//!
//! Runs a filter over an attendee export and prints the matches or their
//! shirt totals.

use anniv_filter_rs::filter::{ExecutionMode, FilterOutcome};
use anniv_filter_rs::ShirtSummary;
use tracing::warn;

use super::config::load_config;
use super::input::{resolve_group, Dataset};
use super::{CommandContext, Result};
use crate::cli::{InputArgs, SelectionArgs};
use crate::output::{
    format_people_json, format_people_table, format_summary_json, format_summary_table,
};

/// Options for the filter command.
#[derive(Debug)]
pub struct FilterOptions<'a> {
    pub input: &'a InputArgs,
    pub selection: &'a SelectionArgs,
    pub mode: Option<ExecutionMode>,
    pub summary: bool,
    pub limit: Option<usize>,
}

/// Executes the filter command.
///
/// If the offloaded run fails, the unfiltered list is shown with a warning
/// instead of failing the command.
///
/// # Errors
///
/// Returns an error if the input files cannot be read or the named preset
/// does not exist.
pub async fn execute(ctx: &CommandContext, opts: &FilterOptions<'_>) -> Result<()> {
    let config = load_config()?;
    let dataset = Dataset::load(opts.input).await?;
    let group = resolve_group(ctx, &config, opts.selection).await?;

    let runner = config.runner(opts.mode);
    let outcome = match runner
        .run(&dataset.people, &group, &dataset.task_info)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "filter run failed, showing unfiltered data");
            ctx.notice(&format!("{e}; showing all people unfiltered"));
            FilterOutcome::unfiltered(&dataset.people)
        }
    };

    if ctx.verbose {
        eprintln!(
            "Matched {} of {} people in {:.1} ms ({})",
            outcome.count,
            dataset.people.len(),
            outcome.duration_ms,
            runner.effective_mode(dataset.people.len())
        );
    }

    if opts.summary {
        let summary = ShirtSummary::from_people(&outcome.results);
        if ctx.json_output {
            println!("{}", format_summary_json(&summary)?);
        } else if !ctx.quiet {
            print!("{}", format_summary_table(&summary, ctx.use_colors));
        }
        return Ok(());
    }

    if ctx.json_output {
        println!("{}", format_people_json(&outcome, opts.limit)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_people_table(&outcome, opts.limit, ctx.use_colors)
        );
    }

    Ok(())
}
