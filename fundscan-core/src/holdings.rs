//! Holdings provider.
//!
//! Supplies a fund's holdings and sector allocation. The data set is a fixed
//! synthetic fixture keyed only by the requested fund name; `last_updated` is
//! the only field that varies between calls.

use chrono::Utc;
use tracing::{debug, info};

use fundscan_common::{Error, Result};

use crate::types::{FundSnapshot, Holding, SectorAllocation};

/// Number of positions in the reference fixture.
pub const FIXTURE_HOLDINGS_COUNT: usize = 5;
/// Number of sector allocations in the reference fixture.
pub const FIXTURE_SECTOR_COUNT: usize = 6;

/// Side-effect-free holdings source.
#[derive(Debug, Clone, Default)]
pub struct HoldingsProvider;

impl HoldingsProvider {
    pub fn new() -> Self {
        Self
    }

    /// Retrieve the holdings snapshot for a fund.
    ///
    /// Fails with `InvalidArgument` when `fund_name` is empty or
    /// whitespace-only. The snapshot is immutable once returned.
    pub fn get_holdings(&self, fund_name: &str) -> Result<FundSnapshot> {
        if fund_name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "fund_name cannot be empty or contain only whitespace".into(),
            ));
        }

        debug!(fund = %fund_name, "Retrieving portfolio holdings");

        let snapshot = FundSnapshot {
            fund_name: fund_name.to_string(),
            total_value: 1_000_000.00,
            holdings: vec![
                Holding {
                    ticker: "AAPL".into(),
                    name: "Apple Inc.".into(),
                    weight: 15.2,
                    value: 152_000.00,
                },
                Holding {
                    ticker: "MSFT".into(),
                    name: "Microsoft Corporation".into(),
                    weight: 12.8,
                    value: 128_000.00,
                },
                Holding {
                    ticker: "GOOGL".into(),
                    name: "Alphabet Inc.".into(),
                    weight: 10.5,
                    value: 105_000.00,
                },
                Holding {
                    ticker: "AMZN".into(),
                    name: "Amazon.com Inc.".into(),
                    weight: 9.7,
                    value: 97_000.00,
                },
                Holding {
                    ticker: "JPM".into(),
                    name: "JPMorgan Chase & Co.".into(),
                    weight: 8.3,
                    value: 83_000.00,
                },
            ],
            sector_allocation: vec![
                SectorAllocation {
                    sector: "Technology".into(),
                    weight: 45.2,
                },
                SectorAllocation {
                    sector: "Financials".into(),
                    weight: 18.5,
                },
                SectorAllocation {
                    sector: "Healthcare".into(),
                    weight: 12.3,
                },
                SectorAllocation {
                    sector: "Consumer Discretionary".into(),
                    weight: 10.7,
                },
                SectorAllocation {
                    sector: "Industrials".into(),
                    weight: 8.1,
                },
                SectorAllocation {
                    sector: "Other".into(),
                    weight: 5.2,
                },
            ],
            last_updated: Utc::now().to_rfc3339(),
        };

        info!(fund = %fund_name, holdings = snapshot.holdings.len(), "Retrieved portfolio holdings");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_echoes_fund_name_and_fixture_shape() {
        let provider = HoldingsProvider::new();
        let snapshot = provider.get_holdings("Tech Growth Fund").unwrap();

        assert_eq!(snapshot.fund_name, "Tech Growth Fund");
        assert_eq!(snapshot.holdings.len(), FIXTURE_HOLDINGS_COUNT);
        assert_eq!(snapshot.sector_allocation.len(), FIXTURE_SECTOR_COUNT);
        assert_eq!(snapshot.total_value, 1_000_000.00);
        assert!(!snapshot.last_updated.is_empty());
    }

    #[test]
    fn test_empty_fund_name_rejected() {
        let provider = HoldingsProvider::new();
        assert!(provider.get_holdings("").is_err());
        assert!(provider.get_holdings("   ").is_err());
    }

    #[test]
    fn test_fixture_is_deterministic_apart_from_timestamp() {
        let provider = HoldingsProvider::new();
        let a = provider.get_holdings("Fund A").unwrap();
        let b = provider.get_holdings("Fund A").unwrap();

        let tickers_a: Vec<_> = a.holdings.iter().map(|h| h.ticker.clone()).collect();
        let tickers_b: Vec<_> = b.holdings.iter().map(|h| h.ticker.clone()).collect();
        assert_eq!(tickers_a, tickers_b);
        assert_eq!(tickers_a, vec!["AAPL", "MSFT", "GOOGL", "AMZN", "JPM"]);
    }
}
