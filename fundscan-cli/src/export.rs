//! CSV export of scan results.
//!
//! One row per action item, with a placeholder row for funds that produced
//! none, so every scanned fund appears in the output.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use fundscan_core::ScanResult;

const HEADER: &str = "Fund Name,Report Length,Action Item Number,Action Item";

/// Write scan results to a CSV file at `output_file`.
pub fn export_results_to_csv(results: &[ScanResult], output_file: &Path) -> Result<()> {
    if results.is_empty() {
        bail!("results list cannot be empty");
    }
    if output_file.as_os_str().is_empty() {
        bail!("output_file cannot be empty");
    }

    info!(
        results = results.len(),
        file = %output_file.display(),
        "Exporting results to CSV"
    );

    let mut file = std::fs::File::create(output_file)
        .with_context(|| format!("failed to create {}", output_file.display()))?;

    writeln!(file, "{HEADER}")?;
    for result in results {
        for line in result_rows(result) {
            writeln!(file, "{line}")?;
        }
    }

    Ok(())
}

fn result_rows(result: &ScanResult) -> Vec<String> {
    let fund = quote(&result.fund_name);
    let report_len = result.report.len();

    if result.action_items.is_empty() {
        return vec![format!("{fund},{report_len},0,No action items")];
    }

    result
        .action_items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{fund},{report_len},{},{}", i + 1, quote(item)))
        .collect()
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(fund: &str, report: &str, action_items: &[&str]) -> ScanResult {
        ScanResult {
            fund_name: fund.to_string(),
            report: report.to_string(),
            action_items: action_items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_one_row_per_action_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let results = vec![result(
            "Tech Growth Fund",
            "report body",
            &["Review concentration", "Rebalance holdings"],
        )];
        export_results_to_csv(&results, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "Tech Growth Fund,11,1,Review concentration");
        assert_eq!(lines[2], "Tech Growth Fund,11,2,Rebalance holdings");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_fund_without_action_items_gets_placeholder_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let results = vec![result("Balanced Fund", "ok", &[])];
        export_results_to_csv(&results, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Balanced Fund,2,0,No action items"));
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let results = vec![result(
            "Growth, Income Fund",
            "r",
            &["Review holdings with negative sentiment, then rebalance"],
        )];
        export_results_to_csv(&results, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"Growth, Income Fund\""));
        assert!(content.contains("\"Review holdings with negative sentiment, then rebalance\""));
    }

    #[test]
    fn test_empty_results_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        assert!(export_results_to_csv(&[], &path).is_err());
    }
}
