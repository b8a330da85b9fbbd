//! JSON-string tool surface for the reporting backends.
//!
//! The pipeline components exchange typed values internally; these wrappers
//! expose the same operations over JSON documents so they can be registered
//! as agent tools. Malformed documents surface here as `Parse` errors, the
//! only place raw payloads cross a boundary.

use serde::{Deserialize, Serialize};
use serde_json::json;

use fundscan_common::{Error, Result};

use crate::holdings::HoldingsProvider;
use crate::news::NewsScanner;
use crate::risk::analyze_risk;
use crate::types::{FundSnapshot, NewsBundle};

/// Retrieve portfolio holdings for a fund as a JSON document.
pub fn get_portfolio_holdings(fund_name: &str) -> Result<String> {
    let snapshot = HoldingsProvider::new().get_holdings(fund_name)?;
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Scan market news for tickers and return the bundle as a JSON document.
pub fn scan_market_news(tickers: &[String]) -> Result<String> {
    let bundle = NewsScanner::new().scan_news(tickers)?;
    Ok(serde_json::to_string_pretty(&bundle)?)
}

/// Analyze risk exposure from JSON-encoded portfolio and news documents.
pub fn analyze_risk_exposure(portfolio_data: &str, news_data: &str) -> Result<String> {
    if portfolio_data.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "portfolio_data cannot be empty or contain only whitespace".into(),
        ));
    }
    if news_data.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "news_data cannot be empty or contain only whitespace".into(),
        ));
    }

    let snapshot: FundSnapshot = serde_json::from_str(portfolio_data)?;
    let news: NewsBundle = serde_json::from_str(news_data)?;

    let assessment = analyze_risk(&snapshot, &news);
    Ok(serde_json::to_string_pretty(&assessment)?)
}

/// Definition of one tool in a backend-specific manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON-schema object describing the parameters
    pub parameters: serde_json::Value,
}

/// Tool definitions for the portfolio analysis functions.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_portfolio_holdings".into(),
            description: "Retrieve portfolio holdings data for a specified fund".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "fund_name": {
                        "type": "string",
                        "description": "The name of the fund to retrieve holdings for"
                    }
                },
                "required": ["fund_name"]
            }),
        },
        ToolDefinition {
            name: "scan_market_news".into(),
            description: "Scan market news for specified tickers and return news data".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "tickers": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of stock tickers to scan for news"
                    }
                },
                "required": ["tickers"]
            }),
        },
        ToolDefinition {
            name: "analyze_risk_exposure".into(),
            description: "Analyze risk exposure based on portfolio data and market news".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "portfolio_data": {
                        "type": "string",
                        "description": "JSON string containing portfolio data"
                    },
                    "news_data": {
                        "type": "string",
                        "description": "JSON string containing market news data"
                    }
                },
                "required": ["portfolio_data", "news_data"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holdings_tool_returns_valid_json() {
        let doc = get_portfolio_holdings("Tech Growth Fund").unwrap();
        let parsed: FundSnapshot = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed.fund_name, "Tech Growth Fund");
    }

    #[test]
    fn test_risk_tool_round_trips_documents() {
        let portfolio = get_portfolio_holdings("Tech Growth Fund").unwrap();
        let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
        let news = scan_market_news(&tickers).unwrap();

        let doc = analyze_risk_exposure(&portfolio, &news).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert!(value["risk_score"].is_i64());
        assert_eq!(value["key_findings"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_risk_tool_rejects_blank_inputs() {
        let err = analyze_risk_exposure("", "{}").unwrap_err();
        assert!(err.is_invalid_argument());
        let err = analyze_risk_exposure("{}", "   ").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_risk_tool_surfaces_malformed_documents_as_parse_errors() {
        let news = scan_market_news(&["AAPL".to_string()]).unwrap();
        let err = analyze_risk_exposure("{not json", &news).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_manifest_names_all_three_tools() {
        let defs = tool_definitions();
        let names: Vec<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["get_portfolio_holdings", "scan_market_news", "analyze_risk_exposure"]
        );
        for def in &defs {
            assert!(def.parameters["required"].is_array());
        }
    }
}
