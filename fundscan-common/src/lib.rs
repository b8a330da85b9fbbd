//! Fundscan Common - Shared plumbing for the fundscan workspace.
//!
//! This crate provides:
//! - The unified error taxonomy for the scan pipeline
//! - The process-wide configuration struct built once at startup
//! - Logging setup with noise suppression

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ChatCompletionConfig, CloudAgentConfig, Config};
pub use error::{Error, Result};
pub use logging::init_logging;
