//! Mark command implementation.
//!
//! Applies one change (paid, unpaid, shirt given) to every person matching a
//! filter and rewrites the attendee export in place.

use std::collections::HashSet;

use anniv_filter_rs::store::write_atomic;
use anniv_filter_rs::{ManagePermission, Person, PersonId};
use owo_colors::OwoColorize;
use tracing::info;

use super::config::load_config;
use super::input::{resolve_group, Dataset};
use super::{CommandContext, CommandError, Result};
use crate::cli::{InputArgs, MarkArgs, SelectionArgs};

/// The attribute change applied to each matching person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Paid,
    Unpaid,
    Given,
}

impl Change {
    pub fn from_args(args: &MarkArgs) -> Self {
        if args.paid {
            Change::Paid
        } else if args.unpaid {
            Change::Unpaid
        } else {
            Change::Given
        }
    }

    fn attribute(&self) -> (&'static str, bool) {
        match self {
            Change::Paid => ("paid", true),
            Change::Unpaid => ("paid", false),
            Change::Given => ("shirtGiven", true),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Change::Paid => "paid",
            Change::Unpaid => "unpaid",
            Change::Given => "given",
        }
    }

    /// Applies the change, returning true if the person was modified.
    pub fn apply(&self, person: &mut Person) -> bool {
        let (name, value) = self.attribute();
        if person.attribute(name).and_then(|v| v.as_bool()) == Some(value) {
            return false;
        }
        person.set_attribute(name, value);
        true
    }
}

/// Options for the mark command.
#[derive(Debug)]
pub struct MarkOptions<'a> {
    pub input: &'a InputArgs,
    pub user: &'a str,
    pub change: Change,
    pub selection: &'a SelectionArgs,
    pub dry_run: bool,
}

/// Executes the mark command.
///
/// # Errors
///
/// Returns `CommandError::Permission` if the user is not a configured
/// manager. A failed filter run aborts without writing anything.
pub async fn execute(ctx: &CommandContext, opts: &MarkOptions<'_>) -> Result<()> {
    let config = load_config()?;
    if !config.managers().can_manage(opts.user) {
        return Err(CommandError::Permission {
            user: opts.user.to_string(),
        });
    }

    let mut dataset = Dataset::load(opts.input).await?;
    let group = resolve_group(ctx, &config, opts.selection).await?;
    let outcome = config
        .runner(None)
        .run(&dataset.people, &group, &dataset.task_info)
        .await?;

    let matched: HashSet<PersonId> = outcome.results.into_iter().map(|p| p.id).collect();
    let changed = apply_change(&mut dataset.people, &matched, opts.change);

    if !opts.dry_run && !changed.is_empty() {
        let mut text = serde_json::to_string_pretty(&dataset.people)?;
        text.push('\n');
        write_atomic(&opts.input.people, text.as_bytes()).await?;
        info!(
            user = opts.user,
            change = opts.change.label(),
            changed = changed.len(),
            "updated attendee export"
        );
    }

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if opts.dry_run { "dry_run" } else { "success" },
            "change": opts.change.label(),
            "matched": matched.len(),
            "changed": changed.len(),
            "ids": changed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let verb = if opts.dry_run { "Would mark" } else { "Marked" };
        let count = changed.len().to_string();
        let count = if ctx.use_colors {
            count.green().to_string()
        } else {
            count
        };
        println!(
            "{verb} {count} of {} matching people as {}",
            matched.len(),
            opts.change.label()
        );
    }

    Ok(())
}

/// Applies `change` to every person in `matched`, returning the ids that
/// actually changed, in file order.
fn apply_change(people: &mut [Person], matched: &HashSet<PersonId>, change: Change) -> Vec<PersonId> {
    people
        .iter_mut()
        .filter(|p| matched.contains(&p.id))
        .filter_map(|p| change.apply(p).then(|| p.id.clone()))
        .collect()
}
