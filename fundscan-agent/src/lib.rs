//! Reporting agent for the fundscan services.
//!
//! Turns a report prompt into a JSON report document via an ordered chain of
//! backends: a cloud agent service, a hosted chat completion API, and a
//! local synthetic generator that cannot fail. Backend selection happens
//! once at construction from [`fundscan_common::Config`]; per-call failures
//! downgrade silently to the next backend in the chain.

pub mod agent;
pub mod backend;
pub mod chat;
pub mod cloud;
pub mod local;

pub use agent::{ReportingAgent, ToolFn, REPORTING_INSTRUCTIONS};
pub use backend::{BackendError, ReportBackend};
pub use chat::ChatCompletionBackend;
pub use cloud::CloudAgentBackend;
pub use local::LocalBackend;
