//! Attendee records.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::value::{is_truthy, to_display_string};

/// Unique, stable identifier of an attendee.
///
/// Exports carry either numeric or string ids; both are accepted and written
/// back unchanged. Numbers keep their JSON form, so float or very large ids
/// survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonId {
    /// Numeric id.
    Number(Number),
    /// String id.
    Text(String),
}

impl PersonId {
    /// Returns the id as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            PersonId::Number(n) => Value::Number(n.clone()),
            PersonId::Text(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonId::Number(n) => write!(f, "{n}"),
            PersonId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PersonId {
    fn from(id: i64) -> Self {
        PersonId::Number(Number::from(id))
    }
}

impl From<i32> for PersonId {
    fn from(id: i32) -> Self {
        PersonId::Number(Number::from(id))
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        PersonId::Text(id.to_string())
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        PersonId::Text(id)
    }
}

/// One attendee.
///
/// Only `id` is required. Every other attribute lives in `attributes` exactly
/// as it appeared in the export, so unknown attributes are preserved and can
/// still be referenced by filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique id within a collection.
    pub id: PersonId,

    /// All other attributes, keyed by their camelCase export name.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Person {
    /// Creates a person with no attributes.
    pub fn new(id: impl Into<PersonId>) -> Self {
        Self {
            id: id.into(),
            attributes: Map::new(),
        }
    }

    /// Sets an attribute, returning the person (builder style).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets an attribute in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Returns the raw attribute stored under `name`, if any.
    ///
    /// `id` is not part of the attribute map; use [`Person::raw`] for a lookup
    /// that covers it.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the raw value of an attribute, `null` when absent.
    pub fn raw(&self, name: &str) -> Value {
        if name == "id" {
            return self.id.to_value();
        }
        self.attribute(name).cloned().unwrap_or(Value::Null)
    }

    /// Returns a string attribute. Non-string values read as `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Value::as_str)
    }

    /// Returns the truthiness of an attribute. Absent reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(is_truthy)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.text("firstName")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.text("lastName")
    }

    /// Returns `firstName lastName`, trimmed. Missing parts read as empty.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name().unwrap_or_default(),
            self.last_name().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// The shirt size as text. A falsy stored size reads as `''`; other
    /// non-string values use their display form.
    pub fn shirt_size(&self) -> Cow<'_, str> {
        match self.attribute("shirtSize") {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(value) if is_truthy(value) => Cow::Owned(to_display_string(value)),
            _ => Cow::Borrowed(""),
        }
    }

    pub fn contact_number(&self) -> Option<&str> {
        self.text("contactNumber")
    }

    pub fn has_print(&self) -> bool {
        self.flag("hasPrint")
    }

    pub fn is_paid(&self) -> bool {
        self.flag("paid")
    }

    pub fn shirt_given(&self) -> bool {
        self.flag("shirtGiven")
    }

    pub fn registration_status(&self) -> Option<&str> {
        self.text("registrationStatus")
    }

    pub fn check_in_status(&self) -> Option<&str> {
        self.text("checkInStatus")
    }
}
