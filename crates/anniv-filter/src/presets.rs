//! Saved filters ("presets") per view.
//!
//! Each view keeps one list of [`SavedFilter`]s, stored as JSON text under
//! `advanced-filters-<viewType>` in a [`KeyValueStore`]. Every mutation
//! replaces the whole list.
//!
//! Reading is forgiving: a missing key is an empty list and entries that do
//! not decode are skipped with a warning. A stored value that is not a list at
//! all is reported as [`PresetError::Corrupt`] so callers can decide whether
//! to fall back to an empty list.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strsim::levenshtein;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::events::{Event, EventBus, Topic};
use crate::filter::FlatFilterConfig;
use crate::store::{KeyValueStore, StoreError};

/// Prefix of every preset storage key.
pub const STORAGE_KEY_PREFIX: &str = "advanced-filters-";

/// Maximum Levenshtein distance for "did you mean" suggestions.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A view with its own preset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Shirts,
    Registration,
    People,
}

impl ViewType {
    pub const ALL: [ViewType; 3] = [ViewType::Shirts, ViewType::Registration, ViewType::People];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Shirts => "shirts",
            ViewType::Registration => "registration",
            ViewType::People => "people",
        }
    }

    /// The storage key holding this view's presets.
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_KEY_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = PresetError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        ViewType::ALL
            .into_iter()
            .find(|view| view.as_str() == needle)
            .ok_or_else(|| PresetError::UnknownView(s.to_string()))
    }
}

/// Identifier of a saved filter.
///
/// New presets get a uuid. Lists written by older clients may carry numeric
/// (timestamp) ids, which are kept and written back as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PresetId {
    Number(Number),
    Text(String),
}

impl PresetId {
    /// Returns true if `text` names this id.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            PresetId::Text(s) => s == text,
            PresetId::Number(n) => n.to_string() == text,
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetId::Number(n) => write!(f, "{n}"),
            PresetId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PresetId {
    fn from(id: &str) -> Self {
        PresetId::Text(id.to_string())
    }
}

impl From<String> for PresetId {
    fn from(id: String) -> Self {
        PresetId::Text(id)
    }
}

impl PartialEq<str> for PresetId {
    fn eq(&self, other: &str) -> bool {
        self.matches(other)
    }
}

impl PartialEq<&str> for PresetId {
    fn eq(&self, other: &&str) -> bool {
        self.matches(other)
    }
}

/// A named, stored flat filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: PresetId,
    pub name: String,
    #[serde(default)]
    pub config: FlatFilterConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedFilter {
    /// Creates a saved filter with a fresh id.
    pub fn new(name: impl Into<String>, config: FlatFilterConfig) -> Self {
        Self {
            id: PresetId::Text(Uuid::new_v4().to_string()),
            name: name.into(),
            config,
            created_at: Some(Utc::now()),
        }
    }
}

/// Errors from preset operations.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The storage collaborator failed.
    #[error("preset storage failed: {0}")]
    Store(#[from] StoreError),

    /// The stored list could not be decoded.
    #[error("saved filters under '{key}' are corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The list could not be encoded.
    #[error("failed to encode saved filters: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("saved filter name cannot be empty")]
    EmptyName,

    /// No preset matched an id or name.
    #[error("{}", format_not_found(.view, .needle, .suggestion))]
    NotFound {
        view: ViewType,
        needle: String,
        suggestion: Option<String>,
    },

    #[error("unknown view '{0}' (expected shirts, registration or people)")]
    UnknownView(String),
}

fn format_not_found(view: &ViewType, needle: &str, suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!("no saved {view} filter '{needle}'. Did you mean '{name}'?"),
        None => format!("no saved {view} filter '{needle}'"),
    }
}

/// Result type for preset operations.
pub type Result<T> = std::result::Result<T, PresetError>;

/// Decodes a stored preset list.
///
/// Entries that do not decode are dropped with a warning; the rest of the
/// list is kept.
pub fn decode_list(key: &str, text: &str) -> Result<Vec<SavedFilter>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries = serde_json::from_str::<Option<Vec<Value>>>(text)
        .map_err(|source| PresetError::Corrupt {
            key: key.to_string(),
            source,
        })?
        .unwrap_or_default();

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            serde_json::from_value::<SavedFilter>(entry)
                .inspect_err(|e| {
                    warn!(key, index, error = %e, "skipping unreadable saved filter");
                })
                .ok()
        })
        .collect())
}

/// Encodes a preset list for storage.
pub fn encode_list(filters: &[SavedFilter]) -> Result<String> {
    serde_json::to_string(filters).map_err(PresetError::Encode)
}

/// Preset lists backed by a key-value store.
///
/// # Example
///
/// ```
/// use anniv_filter_rs::filter::FlatFilterConfig;
/// use anniv_filter_rs::presets::{PresetStore, ViewType};
/// use anniv_filter_rs::store::MemoryStore;
///
/// # tokio_test_block(async {
/// let presets = PresetStore::new(MemoryStore::new());
/// let unpaid = FlatFilterConfig { payment_status: "unpaid".into(), ..Default::default() };
///
/// let saved = presets.save(ViewType::Shirts, "Unpaid", unpaid).await.unwrap();
/// assert_eq!(presets.list(ViewType::Shirts).await.unwrap(), vec![saved]);
/// # });
/// # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct PresetStore<S> {
    store: S,
    events: Option<EventBus>,
}

impl<S: KeyValueStore> PresetStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            events: None,
        }
    }

    /// Publishes [`Topic::PresetsChanged`] on the bus after every mutation.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Returns the presets of a view, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::Store` if the store fails, or
    /// `PresetError::Corrupt` if the stored list does not decode.
    pub async fn list(&self, view: ViewType) -> Result<Vec<SavedFilter>> {
        let key = view.storage_key();
        let stored = self
            .store
            .get(&key)
            .await
            .inspect_err(|e| warn!(view = %view, error = %e, "failed to read saved filters"))?;

        match stored {
            Some(text) => decode_list(&key, &text),
            None => Ok(Vec::new()),
        }
    }

    /// Finds a preset by id, then by case-insensitive name.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::NotFound` (with a close name suggestion when one
    /// exists) if nothing matches.
    pub async fn find(&self, view: ViewType, id_or_name: &str) -> Result<SavedFilter> {
        let filters = self.list(view).await?;

        if let Some(found) = filters.iter().find(|f| f.id.matches(id_or_name)) {
            return Ok(found.clone());
        }

        let needle = id_or_name.trim().to_lowercase();
        if let Some(found) = filters.iter().find(|f| f.name.to_lowercase() == needle) {
            return Ok(found.clone());
        }

        Err(PresetError::NotFound {
            view,
            needle: id_or_name.to_string(),
            suggestion: find_similar_name(&needle, &filters),
        })
    }

    /// Appends a new preset and persists the list.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::EmptyName` for a blank name, or a storage error.
    pub async fn save(
        &self,
        view: ViewType,
        name: &str,
        config: FlatFilterConfig,
    ) -> Result<SavedFilter> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }

        let mut filters = self.list(view).await?;
        let saved = SavedFilter::new(name, config);
        filters.push(saved.clone());

        self.persist(view, &filters).await?;
        debug!(view = %view, id = %saved.id, "saved filter");
        Ok(saved)
    }

    /// Removes the preset with the given id.
    ///
    /// Returns false (and writes nothing) if no preset has that id.
    pub async fn delete(&self, view: ViewType, id: &PresetId) -> Result<bool> {
        let mut filters = self.list(view).await?;
        let before = filters.len();
        filters.retain(|f| &f.id != id);

        if filters.len() == before {
            return Ok(false);
        }

        self.persist(view, &filters).await?;
        debug!(view = %view, id = %id, "deleted saved filter");
        Ok(true)
    }

    /// Replaces the whole preset list of a view.
    pub async fn replace(&self, view: ViewType, filters: &[SavedFilter]) -> Result<()> {
        self.persist(view, filters).await
    }

    async fn persist(&self, view: ViewType, filters: &[SavedFilter]) -> Result<()> {
        let text = encode_list(filters)?;
        self.store
            .set(&view.storage_key(), text)
            .await
            .inspect_err(|e| warn!(view = %view, error = %e, "failed to write saved filters"))?;

        if let Some(events) = &self.events {
            events.publish(Event::with_subject(Topic::PresetsChanged, view.as_str()));
        }
        Ok(())
    }
}

/// Finds the preset name closest to `needle` within the suggestion distance.
fn find_similar_name(needle: &str, filters: &[SavedFilter]) -> Option<String> {
    filters
        .iter()
        .map(|f| (levenshtein(needle, &f.name.to_lowercase()), &f.name))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name.clone())
}
