//! Stale-response discarding for overlapping filter runs.
//!
//! Each run takes a [`Ticket`] from the session's generation counter. When the
//! run finishes, its result is only delivered if no newer run has started in
//! the meantime; otherwise it is [`SessionResult::Stale`] and the caller keeps
//! whatever the newer run produces.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::models::{Person, TaskInfoTable};

use super::ast::FilterGroup;
use super::error::FilterResult;
use super::runner::{FilterOutcome, FilterRunner};

/// Identifies one run within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What a finished run delivers.
#[derive(Debug)]
pub enum SessionResult {
    /// The run is still the latest; here is its result.
    Fresh(FilterResult<FilterOutcome>),
    /// A newer run started (or the session was cancelled); drop this one.
    Stale,
}

impl SessionResult {
    pub fn is_stale(&self) -> bool {
        matches!(self, SessionResult::Stale)
    }

    /// Returns the fresh result, or `None` if stale.
    pub fn fresh(self) -> Option<FilterResult<FilterOutcome>> {
        match self {
            SessionResult::Fresh(result) => Some(result),
            SessionResult::Stale => None,
        }
    }
}

/// Tracks the latest run so older results can be discarded.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct FilterSession {
    generation: Arc<AtomicU64>,
}

impl FilterSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run, invalidating every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidates every outstanding ticket without starting a run.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns true if no run started after this ticket.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Delivers a result for a ticket, or marks it stale.
    pub fn resolve(&self, ticket: Ticket, result: FilterResult<FilterOutcome>) -> SessionResult {
        if self.is_current(ticket) {
            SessionResult::Fresh(result)
        } else {
            trace!(generation = ticket.0, "discarding stale filter result");
            SessionResult::Stale
        }
    }

    /// Runs a filter under a fresh ticket and resolves its result.
    pub async fn run(
        &self,
        runner: &FilterRunner,
        people: &[Person],
        group: &FilterGroup,
        task_info: &TaskInfoTable,
    ) -> SessionResult {
        let ticket = self.begin();
        let result = runner.run(people, group, task_info).await;
        self.resolve(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{run_inline, Condition, Operator};

    fn outcome(people: &[Person], group: &FilterGroup) -> FilterResult<FilterOutcome> {
        Ok(run_inline(people, group, &TaskInfoTable::new()))
    }

    #[test]
    fn test_latest_ticket_is_fresh() {
        let session = FilterSession::new();
        let ticket = session.begin();
        assert!(session.is_current(ticket));

        let result = session.resolve(ticket, outcome(&[], &FilterGroup::all()));
        assert!(!result.is_stale());
    }

    #[test]
    fn test_older_ticket_is_stale() {
        let session = FilterSession::new();
        let people = vec![
            Person::new(1).with("paid", true),
            Person::new(2),
        ];
        let first_group = FilterGroup::all();
        let second_group = FilterGroup::all()
            .with_condition(Condition::new("paymentStatus", Operator::Equals, "paid"));

        let first = session.begin();
        let second = session.begin();
        assert!(first < second);

        // Second run finishes first, first run finishes late.
        let second_result = session.resolve(second, outcome(&people, &second_group));
        let first_result = session.resolve(first, outcome(&people, &first_group));

        assert!(first_result.is_stale());
        let delivered = second_result.fresh().unwrap().unwrap();
        assert_eq!(delivered.count, 1);
    }

    #[test]
    fn test_cancel_invalidates_outstanding() {
        let session = FilterSession::new();
        let ticket = session.begin();
        session.cancel();

        assert!(!session.is_current(ticket));
        assert!(session
            .resolve(ticket, outcome(&[], &FilterGroup::all()))
            .is_stale());
    }

    #[test]
    fn test_clones_share_generation() {
        let session = FilterSession::new();
        let other = session.clone();

        let ticket = session.begin();
        other.begin();
        assert!(!session.is_current(ticket));
    }

    #[tokio::test]
    async fn test_run_delivers_when_uncontested() {
        let session = FilterSession::new();
        let people = vec![Person::new(1), Person::new(2)];

        let result = session
            .run(&FilterRunner::inline(), &people, &FilterGroup::all(), &TaskInfoTable::new())
            .await;

        assert_eq!(result.fresh().unwrap().unwrap().count, 2);
    }
}
