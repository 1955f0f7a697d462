use crate::cli::formatter::print_warning;
use crate::report::{load_records, Format, Report, ReportGenerator};
use anyhow::Context;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args)]
pub struct SummarizeArgs {
    /// JSON results file written by `run --output`
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output format (text, markdown, csv, json)
    #[arg(long, default_value = "text")]
    pub format: Format,
}

pub fn run(args: SummarizeArgs) -> anyhow::Result<()> {
    let rows = load_records(&args.input)
        .with_context(|| format!("Failed to load results from {}", args.input.display()))?;
    tracing::info!(path = %args.input.display(), rows = rows.len(), "loaded results");

    let report = Report::from_rows(rows);
    if let Some(reason) = &report.summary.error {
        print_warning(reason);
    }

    print!("{}", render(args.format, &report)?);
    Ok(())
}

/// JSON gives the computed summary; every other format goes through the
/// report renderers, so CSV yields the reloaded rows.
fn render(format: Format, report: &Report) -> anyhow::Result<String> {
    match format {
        Format::Json => {
            let value = json!({
                "summary": report.summary,
                "insights": report.insights,
                "performance_gaps": report.gaps,
            });
            Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
        }
        format => ReportGenerator::new(format).generate(report),
    }
}
