//! Hosted chat completion backend (secondary).
//!
//! Single-shot request/response, no conversation state and no polling: one
//! POST carrying the system instructions and the user prompt, bounded by the
//! configured model, temperature, and max-token limit.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use fundscan_common::ChatCompletionConfig;
use fundscan_core::ToolDefinition;

use crate::backend::{BackendError, ReportBackend};

const BACKEND_NAME: &str = "chat-completion";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat completion API backend.
pub struct ChatCompletionBackend {
    client: reqwest::Client,
    config: ChatCompletionConfig,
    base_url: String,
    instructions: String,
}

impl ChatCompletionBackend {
    /// Create a new backend against the default API host.
    pub fn new(config: ChatCompletionConfig, instructions: impl Into<String>) -> Self {
        Self::with_base_url(config, instructions, DEFAULT_BASE_URL)
    }

    /// Create with a custom base URL (for compatible APIs and tests).
    pub fn with_base_url(
        config: ChatCompletionConfig,
        instructions: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config,
            base_url: base_url.into(),
            instructions: instructions.into(),
        }
    }

    fn err(message: impl Into<String>) -> BackendError {
        BackendError::new(BACKEND_NAME, message)
    }
}

#[async_trait]
impl ReportBackend for ChatCompletionBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    async fn generate(
        &self,
        prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<String, BackendError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.iter().map(ChatTool::from).collect())
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::err(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::err(format!("API error: {body}")).with_status(status.as_u16()));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| Self::err(format!("Failed to parse response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Self::err("Response contained no choices"))
    }
}

// ============================================================================
// Chat Completion API Types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ToolDefinition,
}

impl From<&ToolDefinition> for ChatTool {
    fn from(def: &ToolDefinition) -> Self {
        Self {
            tool_type: "function",
            function: def.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_includes_system_and_tools() {
        let tools = fundscan_core::tool_definitions();
        let request = ChatRequest {
            model: "gpt-4o",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are the FinancialReportingAgent",
                },
                ChatMessage {
                    role: "user",
                    content: "Generate a report",
                },
            ],
            temperature: 0.2,
            max_tokens: 4096,
            tools: Some(tools.iter().map(ChatTool::from).collect()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][2]["function"]["name"], "analyze_risk_exposure");
    }

    #[test]
    fn test_tools_field_omitted_when_empty() {
        let request = ChatRequest {
            model: "gpt-4o",
            messages: vec![],
            temperature: 0.2,
            max_tokens: 16,
            tools: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("tools"));
    }
}
