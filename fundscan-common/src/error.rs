//! Error types for the fundscan pipeline.
//!
//! One enum covers the whole taxonomy: validation failures raised at each
//! component boundary, malformed documents at the JSON seams, reporting
//! backend failures (recovered internally, never surfaced past the agent),
//! and pipeline failures wrapped with the fund name for the caller.

use thiserror::Error;

/// Result type alias using the fundscan error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the fundscan services.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input, recoverable by the caller correcting it
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed JSON or document at a component boundary
    #[error("Parse error: {0}")]
    Parse(String),

    /// External reporting backend reported failure
    #[error("Backend '{backend}' failed: {message}")]
    Backend {
        backend: String,
        message: String,
    },

    /// A pipeline stage failed; carries the fund name and the root cause
    #[error("Failed to scan portfolio for fund '{fund}': {source}")]
    Pipeline {
        fund: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the fund it occurred for.
    ///
    /// Already-wrapped errors are returned unchanged so the caller sees a
    /// single pipeline error regardless of which stage failed.
    pub fn with_fund(self, fund: impl Into<String>) -> Self {
        match self {
            Self::Pipeline { .. } => self,
            other => Self::Pipeline {
                fund: fund.into(),
                source: Box::new(other),
            },
        }
    }

    /// Check if this is a validation error.
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a backend error.
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_fund_wraps_once() {
        let err = Error::InvalidArgument("tickers list cannot be empty".into());
        let wrapped = err.with_fund("Tech Growth Fund");

        assert!(matches!(wrapped, Error::Pipeline { .. }));
        let rewrapped = wrapped.with_fund("Other Fund");
        match rewrapped {
            Error::Pipeline { fund, .. } => assert_eq!(fund, "Tech Growth Fund"),
            other => panic!("expected pipeline error, got {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_display_names_fund_and_cause() {
        let err = Error::Parse("unexpected end of input".into()).with_fund("Balanced Fund");
        let msg = err.to_string();
        assert!(msg.contains("Balanced Fund"));
        assert!(msg.contains("unexpected end of input"));
    }

    #[test]
    fn test_json_error_becomes_parse() {
        let bad: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: Error = bad.unwrap_err().into();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_predicates() {
        assert!(Error::InvalidArgument("x".into()).is_invalid_argument());
        assert!(Error::Backend {
            backend: "cloud-agent".into(),
            message: "run failed".into()
        }
        .is_backend());
    }
}
