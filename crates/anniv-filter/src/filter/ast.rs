//! Condition trees for attendee filters.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operator of a [`Condition`].
///
/// Operator names are the camelCase strings stored in saved filters. Names
/// this crate does not know are kept as [`Operator::Unknown`] rather than
/// rejected, and such conditions always pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Between,
    IsTrue,
    IsFalse,
    IsEmpty,
    IsNotEmpty,
    /// An operator name with no known semantics.
    Unknown(String),
}

impl Operator {
    /// Parses an operator name. Never fails.
    pub fn parse(name: &str) -> Self {
        match name {
            "equals" => Operator::Equals,
            "notEquals" => Operator::NotEquals,
            "in" => Operator::In,
            "notIn" => Operator::NotIn,
            "contains" => Operator::Contains,
            "notContains" => Operator::NotContains,
            "startsWith" => Operator::StartsWith,
            "endsWith" => Operator::EndsWith,
            "greaterThan" => Operator::GreaterThan,
            "lessThan" => Operator::LessThan,
            "between" => Operator::Between,
            "isTrue" => Operator::IsTrue,
            "isFalse" => Operator::IsFalse,
            "isEmpty" => Operator::IsEmpty,
            "isNotEmpty" => Operator::IsNotEmpty,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// Returns the operator name.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Contains => "contains",
            Operator::NotContains => "notContains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::GreaterThan => "greaterThan",
            Operator::LessThan => "lessThan",
            Operator::Between => "between",
            Operator::IsTrue => "isTrue",
            Operator::IsFalse => "isFalse",
            Operator::IsEmpty => "isEmpty",
            Operator::IsNotEmpty => "isNotEmpty",
            Operator::Unknown(name) => name,
        }
    }

    /// Returns true if the operator has no known semantics.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Operator::Unknown(_))
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::Unknown(String::new())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(Operator::parse(name.as_deref().unwrap_or_default()))
    }
}

/// How a [`FilterGroup`] combines its members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    /// Every member must match.
    #[default]
    And,
    /// At least one member must match.
    Or,
}

impl<'de> Deserialize<'de> for GroupOperator {
    /// Only the exact string `"OR"` selects OR; anything else is AND.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<Value>::deserialize(deserializer)?;
        Ok(match name {
            Some(Value::String(s)) if s == "OR" => GroupOperator::Or,
            _ => GroupOperator::And,
        })
    }
}

/// One atomic test: `field operator value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Logical field name (see the resolver for computed fields).
    #[serde(default)]
    pub field: String,

    /// Comparison operator. A missing operator is unknown.
    #[serde(default)]
    pub operator: Operator,

    /// Operand. Its expected shape depends on the operator: a scalar, a
    /// two-element `[lo, hi]` array for `between`, or an array for `in`/`notIn`.
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    /// Creates a condition.
    ///
    /// # Example
    ///
    /// ```
    /// use anniv_filter_rs::filter::{Condition, Operator};
    ///
    /// let paid = Condition::new("paymentStatus", Operator::Equals, "paid");
    /// assert_eq!(paid.value, serde_json::json!("paid"));
    /// ```
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates a condition whose operator takes no operand.
    pub fn flag(field: impl Into<String>, operator: Operator) -> Self {
        Self::new(field, operator, Value::Null)
    }
}

/// A boolean combination of conditions and nested groups.
///
/// Groups own their children, so a group is always a tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    #[serde(default)]
    pub operator: GroupOperator,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub conditions: Vec<Condition>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub nested_groups: Vec<FilterGroup>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FilterGroup {
    /// Creates an empty AND group. An empty group matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates an empty OR group.
    pub fn any() -> Self {
        Self {
            operator: GroupOperator::Or,
            ..Self::default()
        }
    }

    /// Adds a condition, returning the group (builder style).
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a nested group, returning the group (builder style).
    pub fn with_group(mut self, group: FilterGroup) -> Self {
        self.nested_groups.push(group);
        self
    }

    /// Returns true if the group has no conditions and no nested groups.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.nested_groups.is_empty()
    }

    /// Returns the total number of conditions in the tree.
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
            + self
                .nested_groups
                .iter()
                .map(FilterGroup::condition_count)
                .sum::<usize>()
    }

    /// Collects the names of unknown operators anywhere in the tree.
    pub fn unknown_operators(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_unknown_operators(&mut names);
        names
    }

    fn collect_unknown_operators<'a>(&'a self, names: &mut Vec<&'a str>) {
        for condition in &self.conditions {
            if condition.operator.is_unknown() && !names.contains(&condition.operator.as_str()) {
                names.push(condition.operator.as_str());
            }
        }
        for group in &self.nested_groups {
            group.collect_unknown_operators(names);
        }
    }
}
