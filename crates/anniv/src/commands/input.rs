//! Loading attendee exports and resolving which filter to apply.

use std::path::Path;

use anniv_filter_rs::filter::{FilterGroup, FlatFilterConfig};
use anniv_filter_rs::{Person, PresetError, TaskInfoTable};
use serde_json::Value;
use tracing::debug;

use super::config::Config;
use super::{CommandContext, CommandError, Result};
use crate::cli::{InputArgs, SelectionArgs};

/// People and task info read from the input files.
pub struct Dataset {
    pub people: Vec<Person>,
    pub task_info: TaskInfoTable,
}

impl Dataset {
    pub async fn load(input: &InputArgs) -> Result<Self> {
        let people = load_people(&input.people).await?;
        let task_info = match &input.tasks {
            Some(path) => load_task_info(path).await?,
            None => TaskInfoTable::new(),
        };
        debug!(
            people = people.len(),
            task_info = task_info.len(),
            "loaded dataset"
        );
        Ok(Self { people, task_info })
    }
}

async fn read_json(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        CommandError::Input(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| CommandError::Input(format!("{} is not valid JSON: {}", path.display(), e)))
}

/// Reads a JSON array of people.
pub async fn load_people(path: &Path) -> Result<Vec<Person>> {
    let value = read_json(path).await?;
    if !value.is_array() {
        return Err(CommandError::Input(format!(
            "{} must contain a JSON array of people",
            path.display()
        )));
    }
    serde_json::from_value(value)
        .map_err(|e| CommandError::Input(format!("{}: {}", path.display(), e)))
}

/// Reads a JSON object of task info keyed by person id.
pub async fn load_task_info(path: &Path) -> Result<TaskInfoTable> {
    let value = read_json(path).await?;
    serde_json::from_value(value)
        .map_err(|e| CommandError::Input(format!("{}: {}", path.display(), e)))
}

/// Reads a filter file holding either a condition group or a flat config.
pub async fn load_group(path: &Path) -> Result<FilterGroup> {
    let value = read_json(path).await?;
    parse_group(value).map_err(|e| CommandError::Input(format!("{}: {}", path.display(), e)))
}

fn parse_group(value: Value) -> serde_json::Result<FilterGroup> {
    let is_group = value.as_object().is_some_and(|object| {
        object.contains_key("conditions") || object.contains_key("nestedGroups")
    });

    if is_group {
        serde_json::from_value(value)
    } else {
        Ok(FlatFilterConfig::decode(value)?.compile())
    }
}

/// Resolves the filter for a command from a group file, a saved preset, or
/// the flat options.
///
/// Flat options given together with a file or preset narrow it further. A
/// preset store that cannot be read is reported and skipped.
pub async fn resolve_group(
    ctx: &CommandContext,
    config: &Config,
    selection: &SelectionArgs,
) -> Result<FilterGroup> {
    let flat = selection.flat.to_config();

    let base = if let Some(path) = &selection.group {
        Some(load_group(path).await?)
    } else if let Some(needle) = &selection.preset {
        let presets = config.preset_store()?;
        match presets.find(selection.view, needle).await {
            Ok(preset) => Some(preset.config.compile()),
            Err(e @ PresetError::NotFound { .. }) => return Err(e.into()),
            Err(e) => {
                ctx.notice(&format!("{e}; continuing without the saved filter"));
                None
            }
        }
    } else {
        None
    };

    Ok(match base {
        Some(group) if flat.is_inactive() => group,
        Some(group) => FilterGroup::all()
            .with_group(group)
            .with_group(flat.compile()),
        None => flat.compile(),
    })
}
