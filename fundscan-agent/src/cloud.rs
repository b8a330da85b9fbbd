//! Cloud agent service backend (primary).
//!
//! Stateful conversation flow against a hosted agent API: create an agent
//! with instructions and a tool manifest, open a thread, post the prompt,
//! start a run, poll its status at a fixed interval, then read back the
//! first assistant-authored message.
//!
//! Polling is bounded by `max_poll_attempts`; a run that does not reach a
//! terminal status within the bound is a backend failure, not a hang.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use fundscan_common::CloudAgentConfig;
use fundscan_core::ToolDefinition;

use crate::backend::{BackendError, ReportBackend};

const BACKEND_NAME: &str = "cloud-agent";

/// Cloud agent service backend.
pub struct CloudAgentBackend {
    client: reqwest::Client,
    config: CloudAgentConfig,
    instructions: String,
}

impl CloudAgentBackend {
    /// Create a new backend from its configuration and agent instructions.
    pub fn new(config: CloudAgentConfig, instructions: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config,
            instructions: instructions.into(),
        }
    }

    fn err(message: impl Into<String>) -> BackendError {
        BackendError::new(BACKEND_NAME, message)
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = format!("{}{}", self.config.endpoint.trim_end_matches('/'), path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Self::err(format!("Request failed: {e}")))?;

        Self::decode(response).await
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}{}", self.config.endpoint.trim_end_matches('/'), path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::err(format!("Request failed: {e}")))?;

        Self::decode(response).await
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::err(format!("API error: {body}")).with_status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| Self::err(format!("Failed to parse response: {e}")))
    }

    /// Poll the run until it reaches a terminal status or the attempt bound
    /// is exhausted.
    async fn await_run(&self, thread_id: &str, run_id: &str) -> Result<(), BackendError> {
        for attempt in 1..=self.config.max_poll_attempts {
            let run: RunResponse = self
                .get(&format!("/v1/threads/{thread_id}/runs/{run_id}"))
                .await?;

            debug!(attempt, status = %run.status, "Polled run status");

            match run.status.as_str() {
                "completed" => return Ok(()),
                "failed" => {
                    let detail = run
                        .last_error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "no error payload".into());
                    return Err(Self::err(format!("Run failed: {detail}")));
                }
                "cancelled" => return Err(Self::err("Run was cancelled")),
                // queued / in_progress / pending: keep polling
                _ => {
                    if attempt < self.config.max_poll_attempts {
                        tokio::time::sleep(Duration::from_millis(self.config.poll_interval_ms))
                            .await;
                    }
                }
            }
        }

        Err(Self::err(format!(
            "Run did not complete within {} polls",
            self.config.max_poll_attempts
        )))
    }
}

#[async_trait]
impl ReportBackend for CloudAgentBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    async fn generate(
        &self,
        prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<String, BackendError> {
        let agent: CreatedResource = self
            .post(
                "/v1/agents",
                &CreateAgentRequest {
                    name: "FinancialReportingAgent",
                    model: &self.config.model,
                    instructions: &self.instructions,
                    tools,
                },
            )
            .await?;

        let thread: CreatedResource = self.post("/v1/threads", &EmptyRequest {}).await?;

        let _message: CreatedResource = self
            .post(
                &format!("/v1/threads/{}/messages", thread.id),
                &CreateMessageRequest {
                    role: "user",
                    content: prompt,
                },
            )
            .await?;

        let run: RunResponse = self
            .post(
                &format!("/v1/threads/{}/runs", thread.id),
                &CreateRunRequest {
                    agent_id: &agent.id,
                },
            )
            .await?;

        self.await_run(&thread.id, &run.id).await?;

        let messages: MessageListResponse = self
            .get(&format!("/v1/threads/{}/messages", thread.id))
            .await?;

        messages
            .data
            .into_iter()
            .find(|m| m.role == "assistant")
            .map(|m| m.content)
            .ok_or_else(|| Self::err("No assistant message in completed thread"))
    }
}

// ============================================================================
// Agent Service API Types
// ============================================================================

#[derive(Serialize)]
struct CreateAgentRequest<'a> {
    name: &'a str,
    model: &'a str,
    instructions: &'a str,
    tools: &'a [ToolDefinition],
}

#[derive(Serialize)]
struct EmptyRequest {}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    agent_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    id: String,
    status: String,
    #[serde(default)]
    last_error: Option<RunError>,
}

#[derive(Debug, Deserialize)]
struct RunError {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    data: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
struct ThreadMessage {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_request_carries_tool_manifest() {
        let tools = fundscan_core::tool_definitions();
        let request = CreateAgentRequest {
            name: "FinancialReportingAgent",
            model: "gpt-4o",
            instructions: "instructions",
            tools: &tools,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tools"].as_array().unwrap().len(), 3);
        assert_eq!(json["tools"][0]["name"], "get_portfolio_holdings");
    }

    #[test]
    fn test_run_response_parses_error_payload() {
        let raw = r#"{"id":"run_1","status":"failed","last_error":{"code":"rate_limit","message":"too many requests"}}"#;
        let run: RunResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(run.status, "failed");
        assert_eq!(run.last_error.unwrap().code, "rate_limit");
    }
}
