//! Job runner client - the external engine that executes documents

pub mod http;

use crate::core::PipelineDocument;
use crate::queue::{QueueTicket, RunTracker};
use async_trait::async_trait;
pub use http::HttpJobRunner;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from talking to the job runner
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("runner rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    Response(String),
}

/// What submission produced: an immediately running workflow, or a
/// queue ticket when capacity is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmitOutcome {
    Started {
        workflow_id: String,
        run_id: String,
    },
    Queued {
        ticket: QueueTicket,
    },
}

impl SubmitOutcome {
    /// Transition a run tracker according to this outcome
    pub fn apply_to(self, tracker: &mut RunTracker) {
        match self {
            SubmitOutcome::Started {
                workflow_id,
                run_id,
            } => tracker.mark_running(workflow_id, run_id),
            SubmitOutcome::Queued { ticket } => tracker.mark_queued(ticket),
        }
    }
}

/// Request/response and signal surface of the external job runner.
///
/// The trait exists so tests and tools can substitute a mock for the
/// HTTP implementation.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Submit a compiled document for execution
    async fn submit(&self, document: &PipelineDocument) -> Result<SubmitOutcome, RunnerError>;

    /// Cancel a queued run by its ticket
    async fn cancel_queued(
        &self,
        ticket_id: &str,
        runner_ids: &[String],
    ) -> Result<(), RunnerError>;

    /// Send a signal to a running workflow
    async fn send_signal(
        &self,
        workflow_id: &str,
        namespace: &str,
        signal: &str,
    ) -> Result<(), RunnerError>;
}
