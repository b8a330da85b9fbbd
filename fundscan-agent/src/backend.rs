//! Backend trait for report generation.
//!
//! Defines the interface the interchangeable reporting backends implement:
//! a cloud agent service, a hosted chat completion API, and the local
//! fallback. Implementations handle authentication, request formatting, and
//! response parsing for their specific API.

use async_trait::async_trait;

use fundscan_core::ToolDefinition;

/// Error from a reporting backend.
///
/// Backend errors never escape the reporting agent; the fallback chain
/// catches them and moves on to the next backend.
#[derive(Debug, Clone)]
pub struct BackendError {
    pub backend: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl BackendError {
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "[{}:{}] {}", self.backend, status, self.message),
            None => write!(f, "[{}] {}", self.backend, self.message),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for fundscan_common::Error {
    fn from(e: BackendError) -> Self {
        Self::Backend {
            backend: e.backend,
            message: e.message,
        }
    }
}

/// Report generation backend.
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// Backend name (e.g. "cloud-agent", "chat-completion", "local").
    fn name(&self) -> &str;

    /// Generate a JSON-encoded report for the prompt.
    ///
    /// `tools` is the backend-specific tool manifest assembled from the
    /// agent's registry; backends that cannot use tools may ignore it.
    async fn generate(
        &self,
        prompt: &str,
        tools: &[ToolDefinition],
    ) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_status() {
        let err = BackendError::new("chat-completion", "API error");
        assert_eq!(err.to_string(), "[chat-completion] API error");

        let err = err.with_status(429);
        assert_eq!(err.to_string(), "[chat-completion:429] API error");
    }

    #[test]
    fn test_converts_into_common_backend_error() {
        let err: fundscan_common::Error = BackendError::new("cloud-agent", "run failed").into();
        assert!(err.is_backend());
    }
}
