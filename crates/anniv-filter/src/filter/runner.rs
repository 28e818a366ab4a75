//! Batch filtering over a whole attendee collection.
//!
//! [`run_inline`] filters on the calling thread. [`FilterRunner`] picks between
//! inline evaluation and the offloaded [`FilterWorker`] based on the configured
//! [`ExecutionMode`]; both paths run the same evaluator and return identical
//! results for identical input.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Person, TaskInfoTable};

use super::ast::FilterGroup;
use super::error::FilterResult;
use super::evaluator::{FilterContext, FilterEvaluator};
use super::worker::{FilterWorker, WorkerRequest};

/// Collection size at which [`ExecutionMode::Auto`] offloads.
pub const DEFAULT_OFFLOAD_THRESHOLD: usize = 500;

/// Result of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOutcome {
    /// Matching people, in input order.
    pub results: Vec<Person>,
    /// Number of matching people.
    pub count: usize,
    /// Wall-clock evaluation time in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: f64,
}

impl FilterOutcome {
    /// An outcome holding every person, used when filtering failed and the
    /// caller falls back to unfiltered data.
    pub fn unfiltered(people: &[Person]) -> Self {
        Self {
            results: people.to_vec(),
            count: people.len(),
            duration_ms: 0.0,
        }
    }
}

/// Where a batch run executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Inline below the offload threshold, offloaded at or above it.
    #[default]
    Auto,
    /// Always on the calling thread.
    Inline,
    /// Always on the worker.
    Offloaded,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Auto => "auto",
            ExecutionMode::Inline => "inline",
            ExecutionMode::Offloaded => "offloaded",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ExecutionMode::Auto),
            "inline" => Ok(ExecutionMode::Inline),
            "offloaded" | "worker" => Ok(ExecutionMode::Offloaded),
            other => Err(format!(
                "unknown execution mode '{other}' (expected auto, inline or offloaded)"
            )),
        }
    }
}

/// Filters people on the calling thread.
pub fn run_inline(people: &[Person], group: &FilterGroup, task_info: &TaskInfoTable) -> FilterOutcome {
    let started = Instant::now();
    let context = FilterContext::new(task_info);
    let evaluator = FilterEvaluator::new(group, &context);

    let results: Vec<Person> = evaluator
        .filter_people(people)
        .into_iter()
        .cloned()
        .collect();

    FilterOutcome {
        count: results.len(),
        results,
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

/// Runs batch filters inline or on the worker.
///
/// The worker is spawned on first use, so a runner that only ever runs inline
/// never starts one. Offloaded runs must happen inside a Tokio runtime.
#[derive(Debug)]
pub struct FilterRunner {
    mode: ExecutionMode,
    offload_threshold: usize,
    worker: OnceLock<FilterWorker>,
}

impl Default for FilterRunner {
    fn default() -> Self {
        Self::new(ExecutionMode::Auto, DEFAULT_OFFLOAD_THRESHOLD)
    }
}

impl FilterRunner {
    /// Creates a runner.
    ///
    /// # Arguments
    ///
    /// * `mode` - Where runs execute
    /// * `offload_threshold` - Collection size at which `Auto` offloads
    pub fn new(mode: ExecutionMode, offload_threshold: usize) -> Self {
        Self {
            mode,
            offload_threshold,
            worker: OnceLock::new(),
        }
    }

    /// Creates a runner that always evaluates inline.
    pub fn inline() -> Self {
        Self::new(ExecutionMode::Inline, DEFAULT_OFFLOAD_THRESHOLD)
    }

    /// Creates a runner that always offloads.
    pub fn offloaded() -> Self {
        Self::new(ExecutionMode::Offloaded, DEFAULT_OFFLOAD_THRESHOLD)
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn offload_threshold(&self) -> usize {
        self.offload_threshold
    }

    /// Returns where a run over `len` people executes (never `Auto`).
    pub fn effective_mode(&self, len: usize) -> ExecutionMode {
        match self.mode {
            ExecutionMode::Auto if len >= self.offload_threshold => ExecutionMode::Offloaded,
            ExecutionMode::Auto => ExecutionMode::Inline,
            mode => mode,
        }
    }

    /// Filters people by the group.
    ///
    /// Offloaded runs send copies of the inputs to the worker; the caller's
    /// data is never shared with it.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Worker` if the worker reported a failure. Inline
    /// runs never fail.
    pub async fn run(
        &self,
        people: &[Person],
        group: &FilterGroup,
        task_info: &TaskInfoTable,
    ) -> FilterResult<FilterOutcome> {
        let unknown = group.unknown_operators();
        if !unknown.is_empty() {
            warn!(operators = ?unknown, "filter uses unknown operators; those conditions always pass");
        }

        let mode = self.effective_mode(people.len());
        let outcome = match mode {
            ExecutionMode::Offloaded => {
                let request = WorkerRequest::new(people.to_vec(), group.clone(), task_info.clone());
                self.worker()
                    .post(request)
                    .await
                    .into_result()
                    .inspect_err(|e| warn!(error = %e, "offloaded filter run failed"))?
            }
            _ => run_inline(people, group, task_info),
        };

        debug!(
            mode = %mode,
            input = people.len(),
            matched = outcome.count,
            duration_ms = outcome.duration_ms,
            "filter run complete"
        );
        Ok(outcome)
    }

    fn worker(&self) -> &FilterWorker {
        self.worker.get_or_init(FilterWorker::spawn)
    }
}
