//! Filter evaluation against attendee records.
//!
//! This module provides the [`FilterEvaluator`] for evaluating a [`FilterGroup`]
//! against people, plus the free functions [`evaluate_condition`] and
//! [`evaluate_group`] for one-off checks.
//!
//! Evaluation is total: malformed operands resolve to a fixed answer for their
//! operator instead of failing, so one bad record or condition never aborts a
//! batch.
//!
//! # Example
//!
//! ```
//! use anniv_filter_rs::filter::{Condition, FilterContext, FilterEvaluator, FilterGroup, Operator};
//! use anniv_filter_rs::models::{Person, TaskInfoTable};
//!
//! let group = FilterGroup::all()
//!     .with_condition(Condition::new("paymentStatus", Operator::Equals, "paid"));
//!
//! let task_info = TaskInfoTable::new();
//! let context = FilterContext::new(&task_info);
//! let evaluator = FilterEvaluator::new(&group, &context);
//!
//! let people = vec![Person::new(1).with("paid", true), Person::new(2)];
//! let matched = evaluator.filter_people(&people);
//! assert_eq!(matched.len(), 1);
//! ```

use serde_json::Value;

use crate::models::value::{is_truthy, strict_equals, to_display_string, to_number};
use crate::models::{task_info_for, Person, TaskInfo, TaskInfoTable};

use super::ast::{Condition, FilterGroup, GroupOperator, Operator};
use super::resolver::{resolve_field, Field};

/// Context for filter evaluation.
///
/// Holds the per-person task info side-table that `hasNotes`, `hasTasks` and
/// `hasOverdueTasks` read from.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterContext<'a> {
    task_info: Option<&'a TaskInfoTable>,
}

impl<'a> FilterContext<'a> {
    /// Creates a new filter context over a task info table.
    pub fn new(task_info: &'a TaskInfoTable) -> Self {
        Self {
            task_info: Some(task_info),
        }
    }

    /// Returns the task info for a person, if any.
    pub fn task_info_for(&self, person: &Person) -> Option<&'a TaskInfo> {
        self.task_info
            .and_then(|table| task_info_for(table, &person.id))
    }
}

/// Evaluates a filter group against people.
#[derive(Debug)]
pub struct FilterEvaluator<'a> {
    group: &'a FilterGroup,
    context: &'a FilterContext<'a>,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    ///
    /// # Arguments
    ///
    /// * `group` - The root group to evaluate
    /// * `context` - The context containing the task info table
    pub fn new(group: &'a FilterGroup, context: &'a FilterContext<'a>) -> Self {
        Self { group, context }
    }

    /// Returns true if the person matches the root group.
    pub fn matches(&self, person: &Person) -> bool {
        self.evaluate_group(self.group, person)
    }

    /// Filters a slice of people, returning those that match in their
    /// original order.
    pub fn filter_people<'b>(&self, people: &'b [Person]) -> Vec<&'b Person> {
        people.iter().filter(|person| self.matches(person)).collect()
    }

    /// Evaluates a group: OR needs any member to match, AND needs all.
    ///
    /// Direct conditions come first, then nested groups. An empty group
    /// matches.
    fn evaluate_group(&self, group: &FilterGroup, person: &Person) -> bool {
        if group.is_empty() {
            return true;
        }

        let mut outcomes = group
            .conditions
            .iter()
            .map(|condition| self.evaluate_condition(condition, person))
            .chain(
                group
                    .nested_groups
                    .iter()
                    .map(|nested| self.evaluate_group(nested, person)),
            );

        match group.operator {
            GroupOperator::Or => outcomes.any(|matched| matched),
            GroupOperator::And => outcomes.all(|matched| matched),
        }
    }

    fn evaluate_condition(&self, condition: &Condition, person: &Person) -> bool {
        let task_info = self.context.task_info_for(person);
        let field = resolve_field(person, Field::parse(&condition.field), task_info);
        compare(&field, &condition.operator, &condition.value)
    }
}

/// Evaluates a single condition against a person.
pub fn evaluate_condition(person: &Person, condition: &Condition, task_info: &TaskInfoTable) -> bool {
    let context = FilterContext::new(task_info);
    FilterEvaluator::new(&FilterGroup::all(), &context).evaluate_condition(condition, person)
}

/// Evaluates a group (recursively) against a person.
pub fn evaluate_group(person: &Person, group: &FilterGroup, task_info: &TaskInfoTable) -> bool {
    let context = FilterContext::new(task_info);
    FilterEvaluator::new(group, &context).matches(person)
}

/// Applies an operator to a resolved field value and the condition operand.
pub fn compare(field: &Value, operator: &Operator, operand: &Value) -> bool {
    match operator {
        Operator::Equals => strict_equals(field, operand),
        Operator::NotEquals => !strict_equals(field, operand),

        // Set membership needs an array operand.
        Operator::In => operand
            .as_array()
            .is_some_and(|items| items.iter().any(|item| strict_equals(field, item))),
        Operator::NotIn => operand
            .as_array()
            .map_or(true, |items| !items.iter().any(|item| strict_equals(field, item))),

        // Text operators are case-insensitive.
        Operator::Contains => lowercase(field).contains(&lowercase(operand)),
        Operator::NotContains => !lowercase(field).contains(&lowercase(operand)),
        Operator::StartsWith => lowercase(field).starts_with(&lowercase(operand)),
        Operator::EndsWith => lowercase(field).ends_with(&lowercase(operand)),

        // NaN never compares, so non-numeric values never match.
        Operator::GreaterThan => to_number(field) > to_number(operand),
        Operator::LessThan => to_number(field) < to_number(operand),
        Operator::Between => is_between(field, operand),

        // Strict: the string "true" is not true.
        Operator::IsTrue => matches!(field, Value::Bool(true)),
        Operator::IsFalse => matches!(field, Value::Bool(false)),

        Operator::IsEmpty => !is_truthy(field),
        Operator::IsNotEmpty => is_truthy(field),

        Operator::Unknown(_) => true,
    }
}

fn lowercase(value: &Value) -> String {
    to_display_string(value).to_lowercase()
}

/// `lo <= field <= hi` for a `[lo, hi]` operand; any other operand shape fails.
fn is_between(field: &Value, operand: &Value) -> bool {
    let Some([lo, hi]) = operand.as_array().map(Vec::as_slice) else {
        return false;
    };

    let x = to_number(field);
    to_number(lo) <= x && x <= to_number(hi)
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
