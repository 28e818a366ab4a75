//! Per-person notes/tasks metadata.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::value::{is_truthy, to_number};
use super::PersonId;

/// Notes and tasks summary for one attendee.
///
/// Supplied alongside the attendee list. Every field defaults when missing,
/// `null` or of the wrong type, so one bad entry never rejects the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInfo {
    #[serde(deserialize_with = "flag")]
    pub has_notes: bool,
    #[serde(deserialize_with = "flag")]
    pub has_tasks: bool,
    #[serde(deserialize_with = "count")]
    pub incomplete_tasks_count: u32,
    #[serde(deserialize_with = "count")]
    pub notes_count: u32,
    #[serde(deserialize_with = "count")]
    pub tasks_count: u32,
    #[serde(deserialize_with = "label", skip_serializing_if = "Option::is_none")]
    pub highest_priority: Option<String>,
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.is_some_and(|value| is_truthy(&value)))
}

/// Non-negative whole counts; anything else reads as 0.
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = Option::<Value>::deserialize(deserializer)?
        .map(|value| to_number(&value))
        .unwrap_or(0.0);
    Ok(if n.is_finite() && n > 0.0 {
        n.min(f64::from(u32::MAX)) as u32
    } else {
        0
    })
}

fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

impl TaskInfo {
    /// Returns true if the person has at least one unfinished task.
    pub fn has_overdue_tasks(&self) -> bool {
        self.has_tasks && self.incomplete_tasks_count > 0
    }
}

/// Side-table of task info keyed by the person id's display form.
pub type TaskInfoTable = HashMap<String, TaskInfo>;

/// Looks up the task info for a person id.
pub fn task_info_for<'a>(table: &'a TaskInfoTable, id: &PersonId) -> Option<&'a TaskInfo> {
    match id {
        PersonId::Text(s) => table.get(s.as_str()),
        PersonId::Number(_) => table.get(&id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_info_defaults_missing_fields() {
        let info: TaskInfo = serde_json::from_value(json!({"hasTasks": true})).unwrap();
        assert!(info.has_tasks);
        assert!(!info.has_notes);
        assert_eq!(info.incomplete_tasks_count, 0);
        assert!(info.highest_priority.is_none());
    }

    #[test]
    fn test_task_info_tolerates_null_and_wrong_types() {
        let table: TaskInfoTable = serde_json::from_value(json!({
            "1": {"hasNotes": null, "hasTasks": 1, "incompleteTasksCount": null},
            "2": {"tasksCount": "3", "notesCount": -2, "highestPriority": 4},
            "3": {"hasTasks": true, "incompleteTasksCount": 2}
        }))
        .unwrap();

        assert_eq!(table["1"], TaskInfo { has_tasks: true, ..Default::default() });
        assert_eq!(table["2"].tasks_count, 3);
        assert_eq!(table["2"].notes_count, 0);
        assert!(table["2"].highest_priority.is_none());
        assert!(table["3"].has_overdue_tasks());
    }

    #[test]
    fn test_has_overdue_tasks() {
        let mut info = TaskInfo {
            has_tasks: true,
            ..Default::default()
        };
        assert!(!info.has_overdue_tasks());

        info.incomplete_tasks_count = 2;
        assert!(info.has_overdue_tasks());

        info.has_tasks = false;
        assert!(!info.has_overdue_tasks());
    }

    #[test]
    fn test_task_info_for_numeric_and_text_ids() {
        let table: TaskInfoTable = serde_json::from_value(json!({
            "1": {"hasNotes": true},
            "p-2": {"hasTasks": true}
        }))
        .unwrap();

        assert!(task_info_for(&table, &PersonId::from(1)).is_some_and(|i| i.has_notes));
        assert!(task_info_for(&table, &PersonId::from("p-2")).is_some_and(|i| i.has_tasks));
        assert!(task_info_for(&table, &PersonId::from(2)).is_none());
    }
}
