//! Command-line entry point for the portfolio scanner.
//!
//! Builds the configuration from the environment, wires the reporting agent
//! into the scan orchestrator, and runs one of four flows: a single-fund
//! scan, a batch scan, a quick test scan, or the default demo which also
//! prints the summary and risk assessment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use fundscan_agent::ReportingAgent;
use fundscan_common::{init_logging, Config};
use fundscan_core::{ScanOrchestrator, ScanResult};

mod export;

use export::export_results_to_csv;

const DEMO_FUND: &str = "Tech Growth Fund";

/// Financial portfolio scanner.
#[derive(Parser, Debug)]
#[command(name = "fundscan")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Scan portfolios for holdings, news, and risk exposure.", long_about = None)]
struct Cli {
    /// Name of the fund to scan
    #[arg(long)]
    fund: Option<String>,

    /// Names of multiple funds to scan in batch
    #[arg(long, num_args = 1..)]
    funds: Option<Vec<String>>,

    /// Run a quick test scan (summary output only)
    #[arg(long)]
    test: bool,

    /// Export results to a CSV file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Portfolio scanner failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config.log_level, &config.log_format);

    info!("Starting financial portfolio scanner");

    let agent = Arc::new(ReportingAgent::from_config(&config));
    let orchestrator = ScanOrchestrator::with_defaults(agent);

    if cli.test {
        test_scan(&orchestrator).await?;
    } else if let Some(fund) = &cli.fund {
        let result = scan_single(&orchestrator, fund).await?;
        if let Some(path) = &cli.export {
            export_results_to_csv(&[result], path)?;
            println!("\nResults exported to: {}", path.display());
        }
    } else if let Some(funds) = &cli.funds {
        let results = scan_batch(&orchestrator, funds).await?;
        if let Some(path) = &cli.export {
            export_results_to_csv(&results, path)?;
            println!("\nResults exported to: {}", path.display());
        }
    } else {
        demo(&orchestrator).await?;
    }

    info!("Financial portfolio scanner completed");
    Ok(())
}

/// Scan one fund and print the full report and action items.
async fn scan_single(orchestrator: &ScanOrchestrator, fund: &str) -> Result<ScanResult> {
    let result = orchestrator.scan_portfolio(fund).await?;

    println!("\n=== Portfolio Scan Results ===");
    println!("Fund Name: {}", result.fund_name);
    println!("\n--- Report ---");
    println!("{}", result.report);
    print_action_items(&result);

    Ok(result)
}

/// Scan several funds, printing a per-fund summary line.
async fn scan_batch(orchestrator: &ScanOrchestrator, funds: &[String]) -> Result<Vec<ScanResult>> {
    let results = orchestrator.scan_batch(funds).await?;

    for result in &results {
        println!("\n=== Batch Processing: {} ===", result.fund_name);
        println!("Report Length: {} characters", result.report.len());
        println!("Action Items Count: {}", result.action_items.len());
    }

    Ok(results)
}

/// Quick scan that prints counts instead of the full report.
async fn test_scan(orchestrator: &ScanOrchestrator) -> Result<()> {
    let result = orchestrator.scan_portfolio(DEMO_FUND).await?;

    println!("\n=== Test Portfolio Scan Results ===");
    println!("Fund Name: {}", result.fund_name);
    println!("Report Length: {} characters", result.report.len());
    println!("Action Items Count: {}", result.action_items.len());
    print_action_items(&result);

    Ok(())
}

/// Default flow: full scan of the demo fund plus the standalone summary and
/// risk assessment views.
async fn demo(orchestrator: &ScanOrchestrator) -> Result<()> {
    scan_single(orchestrator, DEMO_FUND).await?;

    let summary = orchestrator.get_summary(DEMO_FUND)?;
    println!("\n=== Portfolio Summary ===");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let assessment = orchestrator.get_risk_assessment(DEMO_FUND)?;
    println!("\n=== Risk Assessment ===");
    println!("{}", serde_json::to_string_pretty(&assessment)?);

    Ok(())
}

fn print_action_items(result: &ScanResult) {
    println!("\n--- Action Items ---");
    for (i, action_item) in result.action_items.iter().enumerate() {
        println!("{}. {action_item}", i + 1);
    }
}
