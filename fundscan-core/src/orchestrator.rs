//! Scan orchestrator.
//!
//! Sequences holdings retrieval, news scanning, risk scoring, and report
//! generation as a linear pipeline with no back-edges:
//!
//! `Start -> HoldingsFetched -> TickersExtracted -> NewsScanned (or skipped)
//!  -> RiskAnalyzed -> ReportGenerated -> Done`
//!
//! Each orchestrator call is independent and stateless beyond its local
//! pipeline variables; results are never cached.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use fundscan_common::{Error, Result};

use crate::holdings::HoldingsProvider;
use crate::news::NewsScanner;
use crate::risk::analyze_risk;
use crate::types::{
    FundRiskAssessment, FundSnapshot, NewsBundle, PortfolioSummary, RiskAssessment, ScanResult,
};

// ============================================================================
// Pipeline Seams
// ============================================================================

/// Source of fund snapshots.
pub trait HoldingsSource: Send + Sync {
    fn get_holdings(&self, fund_name: &str) -> Result<FundSnapshot>;
}

impl HoldingsSource for HoldingsProvider {
    fn get_holdings(&self, fund_name: &str) -> Result<FundSnapshot> {
        HoldingsProvider::get_holdings(self, fund_name)
    }
}

/// Source of per-ticker news alerts.
pub trait NewsSource: Send + Sync {
    fn scan_news(&self, tickers: &[String]) -> Result<NewsBundle>;
}

impl NewsSource for NewsScanner {
    fn scan_news(&self, tickers: &[String]) -> Result<NewsBundle> {
        NewsScanner::scan_news(self, tickers)
    }
}

/// Report generator seam, implemented by the reporting agent.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Turn a natural-language task prompt into a JSON-encoded report.
    async fn generate_response(&self, prompt: &str) -> Result<String>;
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Coordinates one full portfolio scan per call.
pub struct ScanOrchestrator {
    holdings: Arc<dyn HoldingsSource>,
    news: Arc<dyn NewsSource>,
    reporter: Arc<dyn ReportGenerator>,
}

impl ScanOrchestrator {
    /// Create an orchestrator over explicit pipeline seams.
    pub fn new(
        holdings: Arc<dyn HoldingsSource>,
        news: Arc<dyn NewsSource>,
        reporter: Arc<dyn ReportGenerator>,
    ) -> Self {
        Self {
            holdings,
            news,
            reporter,
        }
    }

    /// Create an orchestrator with the built-in holdings and news fixtures.
    pub fn with_defaults(reporter: Arc<dyn ReportGenerator>) -> Self {
        Self::new(
            Arc::new(HoldingsProvider::new()),
            Arc::new(NewsScanner::new()),
            reporter,
        )
    }

    /// Perform a comprehensive scan and analysis of a portfolio.
    ///
    /// Any stage failure aborts the call and surfaces as a single pipeline
    /// error naming the fund; no partial result is returned.
    pub async fn scan_portfolio(&self, fund_name: &str) -> Result<ScanResult> {
        validate_fund_name(fund_name)?;

        info!(fund = %fund_name, "Starting portfolio scan");

        let result = self.run_scan(fund_name).await.map_err(|e| {
            error!(fund = %fund_name, error = %e, "Portfolio scan failed");
            e.with_fund(fund_name)
        })?;

        info!(fund = %fund_name, "Portfolio scan completed");
        Ok(result)
    }

    async fn run_scan(&self, fund_name: &str) -> Result<ScanResult> {
        let snapshot = self.holdings.get_holdings(fund_name)?;
        let news = self.scan_for_snapshot(&snapshot)?;
        let assessment = analyze_risk(&snapshot, &news);

        let prompt = build_report_prompt(fund_name);
        let report = self.reporter.generate_response(&prompt).await?;

        Ok(ScanResult {
            fund_name: fund_name.to_string(),
            report,
            action_items: assessment.action_items,
        })
    }

    /// Generate a portfolio summary without news scanning or reporting.
    pub fn get_summary(&self, fund_name: &str) -> Result<PortfolioSummary> {
        validate_fund_name(fund_name)?;

        let snapshot = self
            .holdings
            .get_holdings(fund_name)
            .map_err(|e| e.with_fund(fund_name))?;

        Ok(PortfolioSummary {
            fund_name: snapshot.fund_name,
            total_value: snapshot.total_value,
            holdings_count: snapshot.holdings.len(),
            sector_allocation: snapshot.sector_allocation,
            last_updated: snapshot.last_updated,
        })
    }

    /// Run the pipeline through risk scoring, omitting report generation.
    pub fn get_risk_assessment(&self, fund_name: &str) -> Result<FundRiskAssessment> {
        validate_fund_name(fund_name)?;

        let (snapshot, assessment) = self
            .assess(fund_name)
            .map_err(|e| e.with_fund(fund_name))?;

        Ok(FundRiskAssessment {
            fund_name: snapshot.fund_name,
            overall_risk_level: assessment.overall_risk_level,
            risk_score: assessment.risk_score,
            key_findings: assessment.key_findings,
            action_items: assessment.action_items,
            exposure_metrics: assessment.exposure_metrics,
            analysis_timestamp: assessment.analysis_timestamp,
        })
    }

    fn assess(&self, fund_name: &str) -> Result<(FundSnapshot, RiskAssessment)> {
        let snapshot = self.holdings.get_holdings(fund_name)?;
        let news = self.scan_for_snapshot(&snapshot)?;
        let assessment = analyze_risk(&snapshot, &news);
        Ok((snapshot, assessment))
    }

    /// Scan news for the snapshot's tickers, or substitute the sentinel
    /// bundle without invoking the scanner when there are none.
    fn scan_for_snapshot(&self, snapshot: &FundSnapshot) -> Result<NewsBundle> {
        let tickers: Vec<String> = snapshot
            .holdings
            .iter()
            .filter(|h| !h.ticker.is_empty())
            .map(|h| h.ticker.clone())
            .collect();

        if tickers.is_empty() {
            warn!(fund = %snapshot.fund_name, "No tickers found in portfolio holdings");
            return Ok(NewsBundle::not_scanned());
        }

        self.news.scan_news(&tickers)
    }

    /// Scan multiple funds, collecting results positionally.
    ///
    /// One fund's failure is converted into an error-shaped result entry so
    /// the batch continues rather than aborting.
    pub async fn scan_batch(&self, fund_names: &[String]) -> Result<Vec<ScanResult>> {
        if fund_names.is_empty() {
            return Err(Error::InvalidArgument("fund_names list cannot be empty".into()));
        }
        for fund_name in fund_names {
            validate_fund_name(fund_name)?;
        }

        info!(funds = fund_names.len(), "Starting batch portfolio scan");

        let mut results = Vec::with_capacity(fund_names.len());
        for fund_name in fund_names {
            match self.scan_portfolio(fund_name).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(fund = %fund_name, error = %e, "Batch entry failed, continuing");
                    results.push(ScanResult {
                        fund_name: fund_name.clone(),
                        report: format!("Error: {e}"),
                        action_items: Vec::new(),
                    });
                }
            }
        }

        info!(funds = fund_names.len(), "Batch portfolio scan completed");
        Ok(results)
    }
}

fn validate_fund_name(fund_name: &str) -> Result<()> {
    if fund_name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "fund_name cannot be empty or contain only whitespace".into(),
        ));
    }
    Ok(())
}

/// Build the comprehensive-report prompt for a fund.
pub fn build_report_prompt(fund_name: &str) -> String {
    format!(
        "Generate a comprehensive financial report for the fund '{fund_name}'.\n\
         \n\
         Please follow these steps:\n\
         1. Use the get_portfolio_holdings tool to retrieve the portfolio data\n\
         2. Extract the ticker symbols from the portfolio holdings\n\
         3. Use the scan_market_news tool to get relevant market news for these tickers\n\
         4. Use the analyze_risk_exposure tool to assess the portfolio's risk\n\
         5. Generate a comprehensive report that includes:\n\
            - Portfolio summary and performance overview\n\
            - Analysis of holdings and asset allocation\n\
            - Key market news and their potential impact\n\
            - Risk assessment and exposure analysis\n\
            - Actionable recommendations for portfolio management\n\
         \n\
         Format your response as a structured JSON object with the following sections:\n\
         - portfolio_summary: Overall portfolio information\n\
         - holdings_analysis: Detailed analysis of portfolio holdings\n\
         - market_insights: Key market news and their implications\n\
         - risk_assessment: Risk analysis and exposure metrics\n\
         - recommendations: Actionable recommendations for portfolio management"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubReporter;

    #[async_trait]
    impl ReportGenerator for StubReporter {
        async fn generate_response(&self, prompt: &str) -> Result<String> {
            assert!(!prompt.trim().is_empty());
            Ok("{\"portfolio_summary\":{}}".to_string())
        }
    }

    /// Holdings source returning a snapshot with no positions.
    struct EmptyHoldings;

    impl HoldingsSource for EmptyHoldings {
        fn get_holdings(&self, fund_name: &str) -> Result<FundSnapshot> {
            Ok(FundSnapshot {
                fund_name: fund_name.to_string(),
                total_value: 0.0,
                holdings: Vec::new(),
                sector_allocation: Vec::new(),
                last_updated: "2025-01-01T00:00:00Z".into(),
            })
        }
    }

    /// News source that counts invocations.
    struct CountingNews {
        calls: AtomicUsize,
    }

    impl NewsSource for CountingNews {
        fn scan_news(&self, tickers: &[String]) -> Result<NewsBundle> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            NewsScanner::new().scan_news(tickers)
        }
    }

    /// Holdings source that fails for one specific fund.
    struct FailingHoldings {
        fail_for: &'static str,
    }

    impl HoldingsSource for FailingHoldings {
        fn get_holdings(&self, fund_name: &str) -> Result<FundSnapshot> {
            if fund_name == self.fail_for {
                return Err(Error::Parse("holdings document truncated".into()));
            }
            HoldingsProvider::new().get_holdings(fund_name)
        }
    }

    #[tokio::test]
    async fn test_scan_produces_report_and_action_items() {
        let orchestrator = ScanOrchestrator::with_defaults(Arc::new(StubReporter));
        let result = orchestrator.scan_portfolio("Tech Growth Fund").await.unwrap();

        assert_eq!(result.fund_name, "Tech Growth Fund");
        assert!(!result.report.is_empty());
        // Reference fixture: 5 holdings, 5 positive / 2 negative alerts,
        // score 35, no action-item guard fires.
        assert!(result.action_items.is_empty());
    }

    #[tokio::test]
    async fn test_empty_fund_name_is_invalid_argument() {
        let orchestrator = ScanOrchestrator::with_defaults(Arc::new(StubReporter));
        let err = orchestrator.scan_portfolio("  ").await.unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_empty_tickers_skip_news_scanner() {
        let news = Arc::new(CountingNews {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = ScanOrchestrator::new(
            Arc::new(EmptyHoldings),
            Arc::clone(&news) as Arc<dyn NewsSource>,
            Arc::new(StubReporter),
        );

        let assessment = orchestrator.get_risk_assessment("Empty Fund").unwrap();
        assert_eq!(news.calls.load(Ordering::SeqCst), 0);
        // 0 holdings: 30 + 0 + 0 - 0 = 30
        assert_eq!(assessment.risk_score, 30);
    }

    #[tokio::test]
    async fn test_stage_failure_surfaces_as_pipeline_error() {
        let orchestrator = ScanOrchestrator::new(
            Arc::new(FailingHoldings {
                fail_for: "Broken Fund",
            }),
            Arc::new(NewsScanner::new()),
            Arc::new(StubReporter),
        );

        let err = orchestrator.scan_portfolio("Broken Fund").await.unwrap_err();
        match err {
            Error::Pipeline { fund, source } => {
                assert_eq!(fund, "Broken Fund");
                assert!(matches!(*source, Error::Parse(_)));
            }
            other => panic!("expected pipeline error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summary_skips_news_and_reporting() {
        let news = Arc::new(CountingNews {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = ScanOrchestrator::new(
            Arc::new(HoldingsProvider::new()),
            Arc::clone(&news) as Arc<dyn NewsSource>,
            Arc::new(StubReporter),
        );

        let summary = orchestrator.get_summary("Tech Growth Fund").unwrap();
        assert_eq!(summary.holdings_count, 5);
        assert_eq!(summary.sector_allocation.len(), 6);
        assert_eq!(news.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_isolates_per_fund_failures() {
        let orchestrator = ScanOrchestrator::new(
            Arc::new(FailingHoldings {
                fail_for: "Fund B",
            }),
            Arc::new(NewsScanner::new()),
            Arc::new(StubReporter),
        );

        let funds = vec!["Fund A".to_string(), "Fund B".to_string(), "Fund C".to_string()];
        let results = orchestrator.scan_batch(&funds).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(!results[0].report.starts_with("Error:"));
        assert!(results[1].report.starts_with("Error:"));
        assert!(results[1].report.contains("Fund B"));
        assert!(results[1].action_items.is_empty());
        assert!(!results[2].report.starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_batch_rejects_empty_list_and_blank_names() {
        let orchestrator = ScanOrchestrator::with_defaults(Arc::new(StubReporter));
        assert!(orchestrator.scan_batch(&[]).await.unwrap_err().is_invalid_argument());

        let funds = vec!["Fund A".to_string(), " ".to_string()];
        assert!(orchestrator.scan_batch(&funds).await.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_report_prompt_names_fund_and_sections() {
        let prompt = build_report_prompt("Tech Growth Fund");
        assert!(prompt.contains("'Tech Growth Fund'"));
        for section in [
            "portfolio_summary",
            "holdings_analysis",
            "market_insights",
            "risk_assessment",
            "recommendations",
        ] {
            assert!(prompt.contains(section));
        }
    }
}
