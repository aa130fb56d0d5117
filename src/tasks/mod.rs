//! Asynchronous render tasks.
//!
//! The renderer itself is synchronous. This module runs it on worker threads,
//! keyed by a caller-supplied task id, and tracks each task through an explicit
//! state machine that callers poll.

mod dispatcher;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::Color;
use crate::error::ErrorKind;
use crate::font::FontCatalog;
use crate::renderer::RenderedArtifact;
use crate::request::{RenderRequest, ValidationError};

pub use dispatcher::{DispatchError, Dispatcher, DispatcherConfig};

/// Identifier supplied by whoever submits the task.
pub type TaskId = String;

/// Lifecycle of a render task.
///
/// `Pending -> Started -> Success | Failure | Retry`, `Retry -> Started`, and
/// a task that is not running (`Pending` or `Retry`) may be `Revoked`.
/// `Success`, `Failure` and `Revoked` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Queued, not yet picked up by a worker
    Pending,
    /// A worker is running the render
    Started,
    /// The last attempt failed and another one is scheduled
    Retry,
    /// Finished with an artifact
    Success,
    /// Finished with an error after exhausting retries
    Failure,
    /// Cancelled before it could finish
    Revoked,
}

impl TaskState {
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Pending, Started)
                | (Pending, Revoked)
                | (Started, Success)
                | (Started, Failure)
                | (Started, Retry)
                | (Retry, Started)
                | (Retry, Revoked)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Success | TaskState::Failure | TaskState::Revoked
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Started => "started",
            TaskState::Retry => "retry",
            TaskState::Success => "success",
            TaskState::Failure => "failure",
            TaskState::Revoked => "revoked",
        }
    }

    /// Human-readable description for status responses.
    pub fn message(self) -> &'static str {
        match self {
            TaskState::Pending => "Task is still pending.",
            TaskState::Started => "Task is currently processing.",
            TaskState::Retry => "Task failed and will be retried.",
            TaskState::Success => "Task completed successfully.",
            TaskState::Failure => "Task failed.",
            TaskState::Revoked => "Task was cancelled.",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a task as seen by a poller.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatus {
    pub id: TaskId,
    pub state: TaskState,
    /// Number of render attempts started so far
    pub attempts: u32,
    pub artifact: Option<RenderedArtifact>,
    /// Message of the most recent error, verbatim
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl TaskStatus {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            state: TaskState::Pending,
            attempts: 0,
            artifact: None,
            error: None,
            error_kind: None,
        }
    }

    /// Move to `next` if the state machine allows it.
    pub fn transition(&mut self, next: TaskState) -> bool {
        if !self.state.can_transition_to(next) {
            log::warn!(
                "Task {}: ignoring transition {} -> {}",
                self.id,
                self.state,
                next
            );
            return false;
        }
        self.state = next;
        true
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.artifact.as_ref().map(|artifact| artifact.path.as_path())
    }
}

/// Bounded retries with a linearly growing delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; a task runs at most `max_retries + 1` times
    pub max_retries: u32,
    /// Delay before retry `n` is `backoff_step * n`
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_step: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_step: Duration::ZERO,
        }
    }

    /// Retry up to `max_retries` times without waiting.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_step: Duration::ZERO,
        }
    }

    /// Delay before the `retry`-th retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff_step * retry
    }
}

/// Arguments of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub text: String,
    pub font_path: PathBuf,
    pub color: Color,
    pub size: u32,
}

impl RenderJob {
    pub fn new(
        text: impl Into<String>,
        font_path: impl Into<PathBuf>,
        color: Color,
        size: u32,
    ) -> Self {
        Self {
            text: text.into(),
            font_path: font_path.into(),
            color,
            size,
        }
    }

    /// Resolve a validated request's font name into a job.
    pub fn from_request(
        request: &RenderRequest,
        catalog: &FontCatalog,
    ) -> Result<Self, ValidationError> {
        let font_path = catalog.require(&request.font_name)?;
        Ok(Self::new(
            request.text.clone(),
            font_path,
            request.color,
            request.size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::request::RawRequest;

    const ALL: [TaskState; 6] = [
        TaskState::Pending,
        TaskState::Started,
        TaskState::Retry,
        TaskState::Success,
        TaskState::Failure,
        TaskState::Revoked,
    ];

    #[test]
    fn test_terminal_states_have_no_exits() {
        for state in ALL.into_iter().filter(|s| s.is_terminal()) {
            for next in ALL {
                assert!(!state.can_transition_to(next), "{state} -> {next}");
            }
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut status = TaskStatus::new("abc");
        assert!(status.transition(TaskState::Started));
        assert!(status.transition(TaskState::Retry));
        assert!(status.transition(TaskState::Started));
        assert!(status.transition(TaskState::Success));
        assert!(!status.transition(TaskState::Started));
        assert_eq!(status.state, TaskState::Success);
    }

    #[test]
    fn test_running_task_cannot_be_revoked() {
        let mut status = TaskStatus::new("abc");
        status.transition(TaskState::Started);
        assert!(!status.transition(TaskState::Revoked));
        assert_eq!(status.state, TaskState::Started);
    }

    #[test]
    fn test_pending_cannot_skip_to_result() {
        assert!(!TaskState::Pending.can_transition_to(TaskState::Success));
        assert!(!TaskState::Pending.can_transition_to(TaskState::Failure));
    }

    #[test]
    fn test_state_strings() {
        assert_eq!(TaskState::Pending.to_string(), "pending");
        assert_eq!(TaskState::Revoked.message(), "Task was cancelled.");
    }

    #[test]
    fn test_retry_delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(60));
        assert_eq!(policy.delay_for(3), Duration::from_secs(180));
        assert_eq!(RetryPolicy::immediate(2).delay_for(2), Duration::ZERO);
    }

    #[test]
    fn test_job_from_request() {
        let mut catalog = FontCatalog::new();
        catalog.register("Lobster", "/fonts/Lobster.ttf");
        let config = RenderConfig::default();

        let request = RenderRequest::validate(
            RawRequest::new("Hi", "Lobster").color("#FF0000").size(5_i64),
            &config,
        )
        .unwrap();
        let job = RenderJob::from_request(&request, &catalog).unwrap();
        assert_eq!(
            job,
            RenderJob::new("Hi", "/fonts/Lobster.ttf", Color::rgb(255, 0, 0), 12)
        );

        let request =
            RenderRequest::validate(RawRequest::new("Hi", "Missing"), &config).unwrap();
        assert_eq!(
            RenderJob::from_request(&request, &catalog),
            Err(ValidationError::FontNotFound("Missing".to_string()))
        );
    }
}
