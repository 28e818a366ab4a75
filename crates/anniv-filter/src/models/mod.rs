//! Data models for attendee records and their auxiliary metadata.

mod person;
mod task_info;
pub mod value;

pub use person::{Person, PersonId};
pub use task_info::{task_info_for, TaskInfo, TaskInfoTable};
