//! Fundscan Core - Scan pipeline for fund portfolios.
//!
//! This library provides the deterministic half of the scanner: a holdings
//! provider, a market-news scanner, a pure risk scoring engine, and the
//! orchestrator that sequences them with report generation.
//!
//! # Architecture
//!
//! ```text
//! HoldingsProvider ──▶ NewsScanner ──▶ analyze_risk ──▶ ReportGenerator
//!        │                  │               │                 │
//!        └──────────── ScanOrchestrator (linear, no back-edges)┘
//! ```
//!
//! Data flows strictly downward; no component calls back upward, and no
//! component retains state across calls.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod holdings;
pub mod news;
pub mod orchestrator;
pub mod risk;
pub mod tools;
pub mod types;

pub use holdings::{HoldingsProvider, FIXTURE_HOLDINGS_COUNT, FIXTURE_SECTOR_COUNT};
pub use news::NewsScanner;
pub use orchestrator::{
    build_report_prompt, HoldingsSource, NewsSource, ReportGenerator, ScanOrchestrator,
};
pub use risk::{analyze_risk, risk_level_for};
pub use tools::{tool_definitions, ToolDefinition};
pub use types::{
    ExposureMetrics, FundRiskAssessment, FundSnapshot, Holding, NewsAlert, NewsBundle,
    PortfolioSummary, RiskAssessment, RiskLevel, ScanResult, SectorAllocation, Sentiment, Severity,
};
