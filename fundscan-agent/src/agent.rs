//! Reporting agent with an ordered backend fallback chain.
//!
//! The chain is selected once at construction: the cloud agent service when
//! its credential is configured, then the hosted chat completion API when an
//! API key is present, with the local generator as the guaranteed tail. At
//! call time the agent walks the chain and downgrades on any backend
//! failure; no backend error ever reaches the caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use fundscan_common::{Config, Error, Result};
use fundscan_core::{tool_definitions, ReportGenerator, ToolDefinition};

use crate::backend::ReportBackend;
use crate::chat::ChatCompletionBackend;
use crate::cloud::CloudAgentBackend;
use crate::local::LocalBackend;

/// Instructions given to the reporting backends.
pub const REPORTING_INSTRUCTIONS: &str = "\
You are the FinancialReportingAgent, responsible for generating comprehensive \
financial reports and insights based on portfolio data and market analysis.

Your responsibilities include:
1. Analyzing portfolio holdings to understand asset allocation and diversification
2. Scanning market news for relevant information that might impact portfolio performance
3. Assessing risk exposure based on portfolio composition and market conditions
4. Generating detailed reports with actionable insights and recommendations
5. Identifying opportunities for portfolio optimization and risk mitigation

When generating reports, you should:
- Provide clear, concise summaries of portfolio performance
- Highlight key risks and opportunities
- Offer actionable recommendations for portfolio management
- Use data-driven insights to support your analysis
- Consider both short-term market conditions and long-term investment goals

You have access to the following tools:
- get_portfolio_holdings: Retrieve portfolio holdings data for a specified fund
- scan_market_news: Scan market news for specified tickers
- analyze_risk_exposure: Analyze risk exposure based on portfolio data and market news

Use these tools to gather the necessary information before generating your reports.
Always base your analysis on the most current data available.";

/// A registered tool callable: JSON arguments in, JSON document out.
pub type ToolFn = Arc<dyn Fn(&serde_json::Value) -> Result<String> + Send + Sync>;

struct RegisteredTool {
    name: String,
    tool: ToolFn,
}

/// Multi-backend reporting agent.
pub struct ReportingAgent {
    backends: Vec<Arc<dyn ReportBackend>>,
    fallback: LocalBackend,
    tools: Vec<RegisteredTool>,
}

impl ReportingAgent {
    /// Build the agent from configuration, selecting the backend chain once.
    pub fn from_config(config: &Config) -> Self {
        let mut backends: Vec<Arc<dyn ReportBackend>> = Vec::new();

        if let Some(agent_config) = &config.cloud_agent {
            backends.push(Arc::new(CloudAgentBackend::new(
                agent_config.clone(),
                REPORTING_INSTRUCTIONS,
            )));
        }

        if let Some(chat_config) = &config.chat_completion {
            backends.push(Arc::new(ChatCompletionBackend::new(
                chat_config.clone(),
                REPORTING_INSTRUCTIONS,
            )));
        }

        info!(
            backends = ?backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "Reporting agent initialized"
        );

        let mut agent = Self {
            backends,
            fallback: LocalBackend::new(),
            tools: Vec::new(),
        };
        agent.register_default_tools();
        agent
    }

    /// Build an agent over an explicit backend chain (tests, embedding).
    pub fn with_backends(backends: Vec<Arc<dyn ReportBackend>>) -> Self {
        let mut agent = Self {
            backends,
            fallback: LocalBackend::new(),
            tools: Vec::new(),
        };
        agent.register_default_tools();
        agent
    }

    fn register_default_tools(&mut self) {
        let holdings: ToolFn = Arc::new(|args| {
            let fund_name = required_str(args, "fund_name")?;
            fundscan_core::tools::get_portfolio_holdings(fund_name)
        });
        let news: ToolFn = Arc::new(|args| {
            let tickers: Vec<String> = args
                .get("tickers")
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            fundscan_core::tools::scan_market_news(&tickers)
        });
        let risk: ToolFn = Arc::new(|args| {
            let portfolio = required_str(args, "portfolio_data")?;
            let news = required_str(args, "news_data")?;
            fundscan_core::tools::analyze_risk_exposure(portfolio, news)
        });

        // Registration failures are impossible for the fixed names.
        let _ = self.register_tool("get_portfolio_holdings", holdings);
        let _ = self.register_tool("scan_market_news", news);
        let _ = self.register_tool("analyze_risk_exposure", risk);
    }

    /// Register a tool in the side table, replacing any previous entry with
    /// the same name. Fails with `InvalidArgument` on an empty name.
    pub fn register_tool(&mut self, name: &str, tool: ToolFn) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "Tool name cannot be empty or contain only whitespace".into(),
            ));
        }

        if let Some(existing) = self.tools.iter_mut().find(|t| t.name == name) {
            existing.tool = tool;
        } else {
            self.tools.push(RegisteredTool {
                name: name.to_string(),
                tool,
            });
        }

        debug!(tool = %name, "Registered tool");
        Ok(())
    }

    /// Look up a registered tool by name.
    pub fn tool(&self, name: &str) -> Option<ToolFn> {
        self.tools
            .iter()
            .find(|t| t.name == name)
            .map(|t| Arc::clone(&t.tool))
    }

    /// Assemble the tool manifest for backend requests.
    ///
    /// Known tools use their full definitions; tools registered without one
    /// get a permissive object schema.
    pub fn tool_manifest(&self) -> Vec<ToolDefinition> {
        let known = tool_definitions();
        self.tools
            .iter()
            .map(|t| {
                known
                    .iter()
                    .find(|d| d.name == t.name)
                    .cloned()
                    .unwrap_or_else(|| ToolDefinition {
                        name: t.name.clone(),
                        description: String::new(),
                        parameters: json!({ "type": "object", "properties": {} }),
                    })
            })
            .collect()
    }

    /// Names of the selected backends, in fallback order (excluding the
    /// local tail).
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Generate a JSON-encoded report for the prompt.
    ///
    /// Walks the backend chain in order; any backend failure is logged and
    /// downgraded to the next backend, ending at the local generator which
    /// cannot fail. Fails only with `InvalidArgument` on an empty prompt.
    pub async fn generate_response(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "Prompt cannot be empty or contain only whitespace".into(),
            ));
        }

        let manifest = self.tool_manifest();

        for backend in &self.backends {
            match backend.generate(prompt, &manifest).await {
                Ok(report) => {
                    debug!(backend = backend.name(), "Backend produced report");
                    return Ok(report);
                }
                Err(e) => {
                    warn!(
                        backend = backend.name(),
                        error = %e,
                        "Backend failed, falling back"
                    );
                }
            }
        }

        debug!("Using local fallback report");
        Ok(self.fallback.render())
    }
}

#[async_trait]
impl ReportGenerator for ReportingAgent {
    async fn generate_response(&self, prompt: &str) -> Result<String> {
        ReportingAgent::generate_response(self, prompt).await
    }
}

fn required_str<'a>(args: &'a serde_json::Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidArgument(format!("missing required argument '{key}'")))
}
