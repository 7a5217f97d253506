//! HTTP implementation of the job runner client

use crate::core::PipelineDocument;
use crate::runner::{JobRunner, RunnerError, SubmitOutcome};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, info};

/// Client for a job runner reachable over HTTP
#[derive(Debug, Clone)]
pub struct HttpJobRunner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobRunner {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RunnerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RunnerError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn transport(e: reqwest::Error) -> RunnerError {
    RunnerError::Transport(e.to_string())
}

/// Build the `runner_ids` query value: a comma-joined id list
fn runner_ids_param(runner_ids: &[String]) -> String {
    runner_ids.join(",")
}

#[async_trait]
impl JobRunner for HttpJobRunner {
    async fn submit(&self, document: &PipelineDocument) -> Result<SubmitOutcome, RunnerError> {
        info!(pipeline = %document.name, "submitting pipeline");
        let response = self
            .client
            .post(self.url("workflows"))
            .json(&document.to_wire_json())
            .send()
            .await
            .map_err(transport)?;

        let response = Self::check(response).await?;
        let outcome: SubmitOutcome = response
            .json()
            .await
            .map_err(|e| RunnerError::Response(e.to_string()))?;
        debug!(?outcome, "submission outcome");
        Ok(outcome)
    }

    async fn cancel_queued(
        &self,
        ticket_id: &str,
        runner_ids: &[String],
    ) -> Result<(), RunnerError> {
        info!(ticket_id, "cancelling queued run");
        let response = self
            .client
            .delete(self.url(&format!("queue/{}", ticket_id)))
            .query(&[("runner_ids", runner_ids_param(runner_ids))])
            .send()
            .await
            .map_err(transport)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(RunnerError::Api {
                status: 404,
                message: format!("ticket {} not found", ticket_id),
            }),
            _ => Self::check(response).await.map(|_| ()),
        }
    }

    async fn send_signal(
        &self,
        workflow_id: &str,
        namespace: &str,
        signal: &str,
    ) -> Result<(), RunnerError> {
        debug!(workflow_id, signal, "sending signal");
        let response = self
            .client
            .post(self.url(&format!("workflows/{}/signal", workflow_id)))
            .json(&serde_json::json!({
                "namespace": namespace,
                "signal": signal,
            }))
            .send()
            .await
            .map_err(transport)?;

        Self::check(response).await.map(|_| ())
    }
}
