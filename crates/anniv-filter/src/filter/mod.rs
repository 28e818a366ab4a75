//! Declarative attendee filters.
//!
//! A filter is a tree of [`FilterGroup`]s. Each group combines its
//! [`Condition`]s and nested groups with AND or OR; each condition compares a
//! logical field of a person against an operand with an [`Operator`].
//!
//! # Operators
//!
//! - `equals`, `notEquals` - strict equality
//! - `in`, `notIn` - membership in an array operand
//! - `contains`, `notContains`, `startsWith`, `endsWith` - case-insensitive text
//! - `greaterThan`, `lessThan`, `between` - numeric comparison
//! - `isTrue`, `isFalse` - exact booleans
//! - `isEmpty`, `isNotEmpty` - truthiness
//!
//! Unrecognized operators always pass.
//!
//! # Fields
//!
//! Computed fields (`paymentStatus`, `amount`, `categories`, `hasNotes`, ...)
//! are derived by the [`resolver`]. Any other field name reads the stored
//! attribute of that name.
//!
//! # Running filters
//!
//! [`FilterEvaluator`] checks people one at a time. [`FilterRunner`] filters a
//! whole collection, inline or on a background [`FilterWorker`], and
//! [`FilterSession`] discards results that a newer run has superseded.
//!
//! # Example
//!
//! ```
//! use anniv_filter_rs::filter::{run_inline, Condition, FilterGroup, Operator};
//! use anniv_filter_rs::models::{Person, TaskInfoTable};
//!
//! let group = FilterGroup::all()
//!     .with_condition(Condition::new("categories", Operator::Equals, "Kids"))
//!     .with_group(
//!         FilterGroup::any()
//!             .with_condition(Condition::new("paymentStatus", Operator::Equals, "unpaid"))
//!             .with_condition(Condition::flag("missingContact", Operator::IsTrue)),
//!     );
//!
//! let people = vec![
//!     Person::new(1).with("shirtSize", "#6 (S) 3-4").with("contactNumber", "0917"),
//!     Person::new(2).with("shirtSize", "L"),
//! ];
//!
//! let outcome = run_inline(&people, &group, &TaskInfoTable::new());
//! assert_eq!(outcome.count, 1);
//! ```

mod ast;
mod error;
mod evaluator;
pub mod flat;
pub mod resolver;
mod runner;
mod session;
mod worker;

pub use ast::{Condition, FilterGroup, GroupOperator, Operator};
pub use error::{FilterError, FilterResult};
pub use evaluator::{compare, evaluate_condition, evaluate_group, FilterContext, FilterEvaluator};
pub use flat::FlatFilterConfig;
pub use runner::{run_inline, ExecutionMode, FilterOutcome, FilterRunner, DEFAULT_OFFLOAD_THRESHOLD};
pub use session::{FilterSession, SessionResult, Ticket};
pub use worker::{handle_message, handle_request, FilterWorker, WorkerRequest, WorkerResponse};

#[cfg(test)]
mod tests;
