//! The flat filter configuration saved with presets.
//!
//! A [`FlatFilterConfig`] is a single record of dropdown choices, multi-selects,
//! a search box, an amount range and boolean toggles. [`FlatFilterConfig::compile`]
//! lowers the active parts into one AND [`FilterGroup`], so flat configs run
//! through the same evaluator as hand-built groups.
//!
//! Decoding is lenient: every recognized key has a default, `null` reads as the
//! default, and unrecognized keys are carried in [`FlatFilterConfig::extra`]
//! so a decode/encode cycle never drops data.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::models::value::{is_truthy, to_display_string, to_number};

use super::ast::{Condition, FilterGroup, Operator};

/// Choice value meaning "no restriction".
pub const ALL: &str = "All";

/// Flat filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatFilterConfig {
    #[serde(deserialize_with = "text")]
    pub search: String,

    #[serde(deserialize_with = "choice")]
    pub payment_status: String,
    #[serde(deserialize_with = "choice")]
    pub print_status: String,
    #[serde(deserialize_with = "choice")]
    pub distribution_status: String,
    #[serde(deserialize_with = "choice")]
    pub registration_status: String,
    #[serde(deserialize_with = "choice")]
    pub check_in_status: String,
    #[serde(deserialize_with = "choice")]
    pub age_bracket: String,
    #[serde(deserialize_with = "choice")]
    pub location: String,
    #[serde(deserialize_with = "choice")]
    pub attendance_status: String,

    /// Size categories (`Kids`, `Teen`, `Adult`, `No Order`).
    #[serde(deserialize_with = "list")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "list")]
    pub sizes: Vec<String>,

    /// Lower amount bound, as typed. Empty means unbounded.
    #[serde(deserialize_with = "amount")]
    pub min_amount: String,
    /// Upper amount bound, as typed. Empty means unbounded.
    #[serde(deserialize_with = "amount")]
    pub max_amount: String,

    #[serde(deserialize_with = "toggle")]
    pub has_notes: bool,
    #[serde(deserialize_with = "toggle")]
    pub has_tasks: bool,
    #[serde(deserialize_with = "toggle")]
    pub has_overdue_tasks: bool,
    #[serde(deserialize_with = "toggle")]
    pub missing_contact: bool,
    #[serde(deserialize_with = "toggle")]
    pub missing_size: bool,
    #[serde(deserialize_with = "toggle")]
    pub missing_info: bool,
    #[serde(deserialize_with = "toggle")]
    pub has_shirt_order: bool,

    /// Keys this version does not recognize.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FlatFilterConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            payment_status: ALL.to_string(),
            print_status: ALL.to_string(),
            distribution_status: ALL.to_string(),
            registration_status: ALL.to_string(),
            check_in_status: ALL.to_string(),
            age_bracket: ALL.to_string(),
            location: ALL.to_string(),
            attendance_status: ALL.to_string(),
            categories: Vec::new(),
            sizes: Vec::new(),
            min_amount: String::new(),
            max_amount: String::new(),
            has_notes: false,
            has_tasks: false,
            has_overdue_tasks: false,
            missing_contact: false,
            missing_size: false,
            missing_info: false,
            has_shirt_order: false,
            extra: Map::new(),
        }
    }
}

impl FlatFilterConfig {
    /// Decodes a config, filling defaults for every missing key.
    ///
    /// # Errors
    ///
    /// Fails only when the value is not a JSON object or `null`. Recognized
    /// keys holding a value of the wrong shape fall back to their default.
    pub fn decode(value: Value) -> serde_json::Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            value => serde_json::from_value(value),
        }
    }

    /// Encodes the config as a JSON object, including every recognized key.
    pub fn encode(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Returns true if nothing in the config restricts the result.
    pub fn is_inactive(&self) -> bool {
        self.compile().is_empty()
    }

    /// Lowers the active filters into one AND group.
    ///
    /// Conditions are emitted in a fixed order: search, choices, multi-selects,
    /// amount range, then toggles.
    pub fn compile(&self) -> FilterGroup {
        let mut group = FilterGroup::all();

        let search = self.search.trim();
        if !search.is_empty() {
            group = group.with_condition(Condition::new("name", Operator::Contains, search));
        }

        let choices = [
            ("paymentStatus", &self.payment_status),
            ("printStatus", &self.print_status),
            ("distributionStatus", &self.distribution_status),
            ("registrationStatus", &self.registration_status),
            ("checkInStatus", &self.check_in_status),
            ("ageBracket", &self.age_bracket),
            ("location", &self.location),
            ("attendanceStatus", &self.attendance_status),
        ];
        for (field, choice) in choices {
            if is_active_choice(choice) {
                group = group.with_condition(Condition::new(field, Operator::Equals, choice.as_str()));
            }
        }

        let selections = [("categories", &self.categories), ("shirtSize", &self.sizes)];
        for (field, selected) in selections {
            if !selected.is_empty() {
                group = group.with_condition(Condition::new(field, Operator::In, selected.clone()));
            }
        }

        if let Some((lo, hi)) = self.amount_range() {
            group = group.with_condition(Condition::new("amount", Operator::Between, vec![lo, hi]));
        }

        let toggles = [
            ("hasNotes", self.has_notes),
            ("hasTasks", self.has_tasks),
            ("hasOverdueTasks", self.has_overdue_tasks),
            ("missingContact", self.missing_contact),
            ("missingSize", self.missing_size),
            ("missingInfo", self.missing_info),
            ("hasShirtOrder", self.has_shirt_order),
        ];
        for (field, on) in toggles {
            if on {
                group = group.with_condition(Condition::flag(field, Operator::IsTrue));
            }
        }

        group
    }

    /// The inclusive amount range, if either bound parses.
    fn amount_range(&self) -> Option<(f64, f64)> {
        let lo = parse_bound(&self.min_amount);
        let hi = parse_bound(&self.max_amount);
        match (lo, hi) {
            (None, None) => None,
            (lo, hi) => Some((lo.unwrap_or(-f64::MAX), hi.unwrap_or(f64::MAX))),
        }
    }
}

fn is_active_choice(choice: &str) -> bool {
    !choice.is_empty() && !choice.eq_ignore_ascii_case(ALL)
}

fn parse_bound(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let n = to_number(&Value::from(text));
    n.is_finite().then_some(n)
}

/// Strings as-is, numbers and booleans as their display text.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(_) | Value::Bool(_) => Some(to_display_string(&value)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(scalar_text)
        .unwrap_or_default())
}

fn choice<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(scalar_text)
        .unwrap_or_else(|| ALL.to_string()))
}

/// Keeps the scalar entries of an array. Anything else is an empty selection.
fn list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

/// Accepts a number or a string; amounts come from a text input.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(value) => to_display_string(&value),
    })
}

fn toggle<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.is_some_and(|value| is_truthy(&value)))
}
