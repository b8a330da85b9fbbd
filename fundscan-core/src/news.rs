//! Market-news scanner.
//!
//! Supplies per-ticker alerts from a fixed canned table. Tickers absent from
//! the table receive a single generic "Market Movement" alert. Output alert
//! order follows input ticker order; a ticker mapped to multiple canned
//! alerts contributes them consecutively.

use chrono::Utc;
use tracing::{debug, info};

use fundscan_common::{Error, Result};

use crate::types::{NewsAlert, NewsBundle, Sentiment, Severity};

/// Deterministic news source (timestamp aside).
#[derive(Debug, Clone, Default)]
pub struct NewsScanner;

impl NewsScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan market news for the given tickers.
    ///
    /// Fails with `InvalidArgument` when the list is empty or contains a
    /// blank ticker. Every requested ticker appears at least once among the
    /// returned alerts.
    pub fn scan_news(&self, tickers: &[String]) -> Result<NewsBundle> {
        if tickers.is_empty() {
            return Err(Error::InvalidArgument("tickers list cannot be empty".into()));
        }
        for ticker in tickers {
            if ticker.trim().is_empty() {
                return Err(Error::InvalidArgument(
                    "Ticker symbols cannot be empty or contain only whitespace".into(),
                ));
            }
        }

        debug!(tickers = tickers.len(), "Scanning market news");

        let mut alerts = Vec::new();
        for ticker in tickers {
            alerts.extend(canned_alerts(ticker));
        }

        info!(tickers = tickers.len(), alerts = alerts.len(), "Scanned market news");
        Ok(NewsBundle {
            scan_timestamp: Utc::now().to_rfc3339(),
            alerts,
        })
    }
}

/// Canned alert set for a ticker, or the generic fallback alert.
fn canned_alerts(ticker: &str) -> Vec<NewsAlert> {
    match ticker {
        "AAPL" => vec![
            NewsAlert {
                ticker: "AAPL".into(),
                alert_type: "Earnings Report".into(),
                severity: Severity::Medium,
                headline: "Apple Inc. Reports Q4 Earnings Beat Expectations".into(),
                sentiment: Sentiment::Positive,
                impact_score: 0.75,
                source: "Financial Times".into(),
            },
            NewsAlert {
                ticker: "AAPL".into(),
                alert_type: "Product Launch".into(),
                severity: Severity::High,
                headline: "Apple Announces New iPhone Model with Advanced AI Features".into(),
                sentiment: Sentiment::Positive,
                impact_score: 0.85,
                source: "TechCrunch".into(),
            },
        ],
        "MSFT" => vec![
            NewsAlert {
                ticker: "MSFT".into(),
                alert_type: "Regulatory".into(),
                severity: Severity::Medium,
                headline: "Microsoft Faces EU Antitrust Investigation Over Cloud Practices".into(),
                sentiment: Sentiment::Negative,
                impact_score: -0.65,
                source: "Reuters".into(),
            },
            NewsAlert {
                ticker: "MSFT".into(),
                alert_type: "Partnership".into(),
                severity: Severity::Medium,
                headline: "Microsoft Announces Strategic Partnership with OpenAI Competitor".into(),
                sentiment: Sentiment::Positive,
                impact_score: 0.60,
                source: "Bloomberg".into(),
            },
        ],
        "GOOGL" => vec![NewsAlert {
            ticker: "GOOGL".into(),
            alert_type: "Legal".into(),
            severity: Severity::High,
            headline: "Alphabet Faces Record $5 Billion Fine in EU Antitrust Case".into(),
            sentiment: Sentiment::Negative,
            impact_score: -0.80,
            source: "Wall Street Journal".into(),
        }],
        "AMZN" => vec![NewsAlert {
            ticker: "AMZN".into(),
            alert_type: "Expansion".into(),
            severity: Severity::Medium,
            headline: "Amazon Expands Grocery Store Chain to 50 New Locations".into(),
            sentiment: Sentiment::Positive,
            impact_score: 0.55,
            source: "CNBC".into(),
        }],
        "JPM" => vec![NewsAlert {
            ticker: "JPM".into(),
            alert_type: "Financial Results".into(),
            severity: Severity::Medium,
            headline: "JPMorgan Chase Reports Record Quarterly Profits".into(),
            sentiment: Sentiment::Positive,
            impact_score: 0.70,
            source: "Financial Times".into(),
        }],
        other => vec![NewsAlert {
            ticker: other.to_string(),
            alert_type: "Market Movement".into(),
            severity: Severity::Low,
            headline: format!("{other} Shows Unusual Trading Volume Today"),
            sentiment: Sentiment::Neutral,
            impact_score: 0.10,
            source: "MarketWatch".into(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_every_ticker_appears_at_least_once() {
        let scanner = NewsScanner::new();
        let input = tickers(&["AAPL", "MSFT", "GOOGL", "AMZN", "JPM", "TSLA"]);
        let bundle = scanner.scan_news(&input).unwrap();

        assert!(bundle.alerts.len() >= input.len());
        for ticker in &input {
            assert!(
                bundle.alerts.iter().any(|a| &a.ticker == ticker),
                "missing alerts for {ticker}"
            );
        }
    }

    #[test]
    fn test_alert_order_follows_input_order() {
        let scanner = NewsScanner::new();
        let bundle = scanner.scan_news(&tickers(&["GOOGL", "AAPL"])).unwrap();

        // GOOGL has one canned alert, AAPL two, contributed consecutively.
        let order: Vec<_> = bundle.alerts.iter().map(|a| a.ticker.as_str()).collect();
        assert_eq!(order, vec!["GOOGL", "AAPL", "AAPL"]);
    }

    #[test]
    fn test_unknown_ticker_gets_generic_alert() {
        let scanner = NewsScanner::new();
        let bundle = scanner.scan_news(&tickers(&["NVDA"])).unwrap();

        assert_eq!(bundle.alerts.len(), 1);
        let alert = &bundle.alerts[0];
        assert_eq!(alert.alert_type, "Market Movement");
        assert_eq!(alert.severity, Severity::Low);
        assert_eq!(alert.sentiment, Sentiment::Neutral);
        assert_eq!(alert.impact_score, 0.10);
        assert_eq!(alert.headline, "NVDA Shows Unusual Trading Volume Today");
        assert_eq!(alert.source, "MarketWatch");
    }

    #[test]
    fn test_duplicate_tickers_contribute_repeated_alerts() {
        let scanner = NewsScanner::new();
        let bundle = scanner.scan_news(&tickers(&["JPM", "JPM"])).unwrap();
        assert_eq!(bundle.alerts.len(), 2);
    }

    #[test]
    fn test_empty_and_blank_inputs_rejected() {
        let scanner = NewsScanner::new();
        assert!(scanner.scan_news(&[]).is_err());
        assert!(scanner.scan_news(&tickers(&["AAPL", "  "])).is_err());
    }

    #[test]
    fn test_timestamp_is_set() {
        let scanner = NewsScanner::new();
        let bundle = scanner.scan_news(&tickers(&["AAPL"])).unwrap();
        assert!(!bundle.scan_timestamp.is_empty());
    }
}
