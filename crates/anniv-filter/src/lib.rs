//! Filter engine for anniversary attendee records.
//!
//! This crate decides which attendees match a declarative filter: a tree of
//! AND/OR groups of conditions over stored attributes and computed fields
//! (shirt price, size category, payment and registration status, task flags).
//!
//! - [`models`] - attendee records, task info and value coercions
//! - [`pricing`] - shirt price and size category tables
//! - [`filter`] - condition trees, evaluation, batch runs (inline or offloaded)
//! - [`presets`] - saved filter lists per view
//! - [`store`] - key-value storage for presets
//! - [`events`] - change notifications
//! - [`access`] - manager capability check
//! - [`summary`] - shirt totals over a filtered set

pub mod access;
pub mod events;
pub mod filter;
pub mod models;
pub mod presets;
pub mod pricing;
pub mod store;
pub mod summary;

pub use access::{ManagePermission, ManagerList};
pub use events::{Event, EventBus, Topic};
pub use filter::{
    Condition, ExecutionMode, FilterError, FilterGroup, FilterOutcome, FilterRunner,
    FilterSession, FlatFilterConfig, GroupOperator, Operator,
};
pub use models::{Person, PersonId, TaskInfo, TaskInfoTable};
pub use presets::{PresetError, PresetId, PresetStore, SavedFilter, ViewType};
pub use pricing::ShirtCategory;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use summary::ShirtSummary;
