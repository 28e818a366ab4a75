//! Offloaded filter worker.
//!
//! The worker owns a thread from Tokio's blocking pool and serves filter
//! requests one at a time over a channel. Requests carry owned copies of the
//! people, group and task info, so nothing is shared with the caller.
//!
//! Any failure inside the worker (an undecodable message, a panic during
//! evaluation) is caught at the top of the request loop and answered with a
//! failure response; the worker keeps serving afterwards.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::models::{Person, TaskInfoTable};

use super::ast::FilterGroup;
use super::error::{FilterError, FilterResult};
use super::runner::{run_inline, FilterOutcome};

/// Pending requests the worker queue holds before senders wait.
const WORKER_QUEUE_DEPTH: usize = 16;

/// Input message for the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub people: Vec<Person>,
    #[serde(default)]
    pub filter_group: FilterGroup,
    #[serde(default)]
    pub people_task_info: TaskInfoTable,
}

impl WorkerRequest {
    pub fn new(people: Vec<Person>, filter_group: FilterGroup, people_task_info: TaskInfoTable) -> Self {
        Self {
            people,
            filter_group,
            people_task_info,
        }
    }
}

/// Output message from the worker.
///
/// On success `results`, `count` and `duration` are set; on failure only
/// `error` is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Person>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerResponse {
    /// Creates a success response from an outcome.
    pub fn success(outcome: FilterOutcome) -> Self {
        Self {
            success: true,
            count: Some(outcome.count),
            duration: Some(outcome.duration_ms),
            results: Some(outcome.results),
            error: None,
        }
    }

    /// Creates a failure response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            count: None,
            duration: None,
            error: Some(message.into()),
        }
    }

    /// Converts the response into the caller-side result.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Worker` for a failure response.
    pub fn into_result(self) -> FilterResult<FilterOutcome> {
        if !self.success {
            return Err(FilterError::worker(
                self.error
                    .unwrap_or_else(|| "worker reported failure without a message".to_string()),
            ));
        }

        let results = self.results.unwrap_or_default();
        Ok(FilterOutcome {
            count: self.count.unwrap_or(results.len()),
            results,
            duration_ms: self.duration.unwrap_or_default(),
        })
    }
}

/// Evaluates one request, converting a panic into a failure response.
pub fn handle_request(request: WorkerRequest) -> WorkerResponse {
    let WorkerRequest {
        people,
        filter_group,
        people_task_info,
    } = request;

    match panic::catch_unwind(AssertUnwindSafe(|| {
        run_inline(&people, &filter_group, &people_task_info)
    })) {
        Ok(outcome) => WorkerResponse::success(outcome),
        Err(payload) => WorkerResponse::failure(panic_message(payload.as_ref())),
    }
}

/// Decodes a raw JSON request and evaluates it.
pub fn handle_message(message: &str) -> WorkerResponse {
    match serde_json::from_str::<WorkerRequest>(message) {
        Ok(request) => handle_request(request),
        Err(e) => WorkerResponse::failure(format!("invalid worker request: {e}")),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "filter evaluation panicked".to_string()
    }
}

#[derive(Debug)]
enum Payload {
    Request(WorkerRequest),
    Message(String),
}

#[derive(Debug)]
struct Job {
    payload: Payload,
    reply: oneshot::Sender<WorkerResponse>,
}

/// Handle to a running filter worker.
///
/// Cloning the handle shares the same worker. The worker stops once every
/// handle is dropped.
#[derive(Debug, Clone)]
pub struct FilterWorker {
    sender: mpsc::Sender<Job>,
}

impl FilterWorker {
    /// Spawns a worker on Tokio's blocking pool.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn() -> Self {
        let (sender, mut receiver) = mpsc::channel::<Job>(WORKER_QUEUE_DEPTH);

        tokio::task::spawn_blocking(move || {
            debug!("filter worker started");
            while let Some(job) = receiver.blocking_recv() {
                let response = match job.payload {
                    Payload::Request(request) => handle_request(request),
                    Payload::Message(message) => handle_message(&message),
                };
                // The caller may have stopped waiting; its response is dropped.
                let _ = job.reply.send(response);
            }
            debug!("filter worker stopped");
        });

        Self { sender }
    }

    /// Sends a request and waits for the response.
    pub async fn post(&self, request: WorkerRequest) -> WorkerResponse {
        self.round_trip(Payload::Request(request)).await
    }

    /// Sends a raw JSON request and waits for the response.
    pub async fn post_message(&self, message: impl Into<String>) -> WorkerResponse {
        self.round_trip(Payload::Message(message.into())).await
    }

    async fn round_trip(&self, payload: Payload) -> WorkerResponse {
        let (reply, response) = oneshot::channel();

        if self.sender.send(Job { payload, reply }).await.is_err() {
            return WorkerResponse::failure("filter worker is not running");
        }

        response
            .await
            .unwrap_or_else(|_| WorkerResponse::failure("filter worker dropped the request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Condition, Operator};
    use serde_json::json;

    fn request() -> WorkerRequest {
        WorkerRequest::new(
            vec![
                Person::new(1).with("shirtSize", "M"),
                Person::new(2).with("shirtSize", "M").with("hasPrint", true),
            ],
            FilterGroup::all().with_condition(Condition::new(
                "amount",
                Operator::Between,
                json!([100, 130]),
            )),
            TaskInfoTable::new(),
        )
    }

    #[test]
    fn test_handle_request_success() {
        let response = handle_request(request());

        assert!(response.success);
        assert_eq!(response.count, Some(1));
        assert!(response.error.is_none());
        let outcome = response.into_result().unwrap();
        assert_eq!(outcome.results[0].id.to_string(), "1");
    }

    #[test]
    fn test_handle_message_decodes_camel_case() {
        let message = json!({
            "people": [{"id": 1, "paid": true}, {"id": 2}],
            "filterGroup": {
                "operator": "AND",
                "conditions": [{"field": "hasNotes", "operator": "isTrue"}]
            },
            "peopleTaskInfo": {"2": {"hasNotes": true}}
        })
        .to_string();

        let response = handle_message(&message);
        assert!(response.success);
        assert_eq!(response.count, Some(1));
        assert_eq!(response.results.unwrap()[0].id.to_string(), "2");
    }

    #[test]
    fn test_handle_message_null_task_info_fields() {
        let message = json!({
            "people": [{"id": 1}, {"id": 2}],
            "filterGroup": {
                "operator": "OR",
                "conditions": [{"field": "hasNotes", "operator": "isFalse"}]
            },
            "peopleTaskInfo": {"1": {"hasNotes": null}, "2": {"hasNotes": true}}
        })
        .to_string();

        let response = handle_message(&message);
        assert!(response.success, "{:?}", response.error);
        assert_eq!(response.count, Some(1));
        assert_eq!(response.results.unwrap()[0].id.to_string(), "1");
    }

    #[test]
    fn test_handle_message_malformed_is_failure() {
        let response = handle_message(r#"{"people": "not a list"}"#);

        assert!(!response.success);
        assert!(response.results.is_none());
        assert!(response.error.unwrap().contains("invalid worker request"));
    }

    #[test]
    fn test_failure_wire_shape() {
        let json = serde_json::to_value(WorkerResponse::failure("boom")).unwrap();
        assert_eq!(json, json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn test_success_wire_shape() {
        let json = serde_json::to_value(handle_request(request())).unwrap();
        assert_eq!(json["success"], json!(true));
        assert_eq!(json["count"], json!(1));
        assert!(json["duration"].is_number());
        assert_eq!(json["results"][0]["id"], json!(1));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_into_result() {
        let err = WorkerResponse::failure("bad input").into_result().unwrap_err();
        assert!(matches!(err, FilterError::Worker { ref message } if message == "bad input"));
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "filter evaluation panicked");
    }

    #[tokio::test]
    async fn test_worker_round_trip() {
        let worker = FilterWorker::spawn();
        let response = worker.post(request()).await;
        assert!(response.success);
        assert_eq!(response.count, Some(1));
    }

    #[tokio::test]
    async fn test_worker_survives_failed_request() {
        let worker = FilterWorker::spawn();

        let failed = worker.post_message("{not json").await;
        assert!(!failed.success);

        let ok = worker.post(request()).await;
        assert!(ok.success);
    }
}
