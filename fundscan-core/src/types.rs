//! Data model for the scan pipeline.
//!
//! Every type here is a JSON-encodable document; the wire field names and the
//! enum string values are part of the compatibility contract with downstream
//! consumers. Entities are created and consumed within a single orchestration
//! call and never persisted.
//!
//! Timestamps are RFC 3339 strings rather than parsed datetimes: the empty
//! string is the explicit "not scanned" marker for a news bundle produced
//! without invoking the scanner.

use serde::{Deserialize, Serialize};

// ============================================================================
// Fund Snapshot
// ============================================================================

/// A single position in a fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// Stock ticker symbol
    pub ticker: String,
    /// Company name
    pub name: String,
    /// Portfolio weight (0-100%)
    pub weight: f64,
    /// Market value of the position
    pub value: f64,
}

/// Sector weight within a fund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAllocation {
    pub sector: String,
    /// Weight (0-100%)
    pub weight: f64,
}

/// A fund's holdings at a point in time.
///
/// `holdings` may be empty; tickers need not be unique but are treated as a
/// set when deriving news queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundSnapshot {
    pub fund_name: String,
    pub total_value: f64,
    pub holdings: Vec<Holding>,
    pub sector_allocation: Vec<SectorAllocation>,
    /// RFC 3339 timestamp of when the data was last updated
    pub last_updated: String,
}

// ============================================================================
// News
// ============================================================================

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// News sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// A single market-news alert for a ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsAlert {
    pub ticker: String,
    /// Alert category, e.g. "Earnings Report", "Regulatory"
    pub alert_type: String,
    pub severity: Severity,
    pub headline: String,
    pub sentiment: Sentiment,
    /// Impact score in [-1, 1]
    pub impact_score: f64,
    /// News source
    pub source: String,
}

/// The result of one news scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsBundle {
    /// RFC 3339 timestamp, or empty when the scan was skipped
    pub scan_timestamp: String,
    pub alerts: Vec<NewsAlert>,
}

impl NewsBundle {
    /// Sentinel bundle for a fund with no tickers: empty alerts and an empty
    /// timestamp marking that the scanner was never invoked.
    pub fn not_scanned() -> Self {
        Self {
            scan_timestamp: String::new(),
            alerts: Vec::new(),
        }
    }

    /// Whether this bundle is the "not scanned" sentinel.
    pub fn is_not_scanned(&self) -> bool {
        self.scan_timestamp.is_empty() && self.alerts.is_empty()
    }
}

// ============================================================================
// Risk Assessment
// ============================================================================

/// Overall portfolio risk level, a step function of the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Exposure metrics derived from the risk score and its components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureMetrics {
    pub concentration_risk: i64,
    pub news_sentiment_impact: i64,
    pub volatility_exposure: f64,
    pub liquidity_risk: f64,
    pub market_risk: f64,
}

/// Deterministic risk assessment of a fund snapshot plus its news bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub analysis_timestamp: String,
    pub overall_risk_level: RiskLevel,
    /// Risk score in [0, 100]
    pub risk_score: i64,
    pub key_findings: Vec<String>,
    pub action_items: Vec<String>,
    pub exposure_metrics: ExposureMetrics,
}

// ============================================================================
// Orchestration Results
// ============================================================================

/// Terminal artifact of one full portfolio scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub fund_name: String,
    /// Report payload produced by the reporting agent (JSON-encoded)
    pub report: String,
    /// Action items copied from the risk assessment
    pub action_items: Vec<String>,
}

/// Lightweight portfolio overview, produced without news or reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub fund_name: String,
    pub total_value: f64,
    pub holdings_count: usize,
    pub sector_allocation: Vec<SectorAllocation>,
    pub last_updated: String,
}

/// Risk assessment annotated with the fund it was computed for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRiskAssessment {
    pub fund_name: String,
    pub overall_risk_level: RiskLevel,
    pub risk_score: i64,
    pub key_findings: Vec<String>,
    pub action_items: Vec<String>,
    pub exposure_metrics: ExposureMetrics,
    pub analysis_timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_strings() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"Negative\""
        );
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"Critical\""
        );
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_not_scanned_sentinel() {
        let bundle = NewsBundle::not_scanned();
        assert!(bundle.is_not_scanned());
        assert_eq!(bundle.scan_timestamp, "");
        assert!(bundle.alerts.is_empty());

        let scanned = NewsBundle {
            scan_timestamp: "2025-01-01T00:00:00Z".into(),
            alerts: Vec::new(),
        };
        assert!(!scanned.is_not_scanned());
    }

    #[test]
    fn test_snapshot_round_trips_wire_fields() {
        let snapshot = FundSnapshot {
            fund_name: "Tech Growth Fund".into(),
            total_value: 1_000_000.0,
            holdings: vec![Holding {
                ticker: "AAPL".into(),
                name: "Apple Inc.".into(),
                weight: 15.2,
                value: 152_000.0,
            }],
            sector_allocation: vec![SectorAllocation {
                sector: "Technology".into(),
                weight: 45.2,
            }],
            last_updated: "2025-01-01T00:00:00Z".into(),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["fund_name"], "Tech Growth Fund");
        assert_eq!(json["holdings"][0]["ticker"], "AAPL");
        assert_eq!(json["sector_allocation"][0]["sector"], "Technology");
    }
}
