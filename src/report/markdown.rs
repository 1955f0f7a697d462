use crate::report::Report;
use crate::utils::format::format_duration;
use anyhow::Result;
use std::fmt::Write;

pub fn generate_markdown_report(report: &Report) -> Result<String> {
    let mut output = String::new();
    let summary = &report.summary;

    writeln!(&mut output, "# SPARQL Benchmark Report")?;
    writeln!(&mut output)?;
    if let Some(id) = report.session_id {
        writeln!(&mut output, "Session `{}`", id)?;
        writeln!(&mut output)?;
    }

    if let Some(reason) = &summary.error {
        writeln!(&mut output, "_No summary available: {}_", reason)?;
        return Ok(output);
    }

    writeln!(&mut output, "## Overview")?;
    writeln!(&mut output)?;
    writeln!(&mut output, "| Metric | Value |")?;
    writeln!(&mut output, "|--------|-------|")?;
    writeln!(&mut output, "| Executions | {} |", summary.overview.total_executions)?;
    writeln!(&mut output, "| Queries | {} |", summary.overview.unique_queries)?;
    writeln!(&mut output, "| Engines | {} |", summary.overview.engines_tested)?;
    writeln!(&mut output, "| Success rate | {:.1}% |", summary.overview.success_rate)?;
    writeln!(
        &mut output,
        "| Mean execution time | {} |",
        format_duration(summary.performance.avg_execution_time)
    )?;
    writeln!(&mut output)?;

    writeln!(&mut output, "## Results by query and engine")?;
    writeln!(&mut output)?;
    writeln!(&mut output, "| Query | Engine | Runs | Mean | Min | Max | Std | Success |")?;
    writeln!(&mut output, "|-------|--------|-----:|-----:|----:|----:|----:|--------:|")?;
    for group in &summary.by_group {
        writeln!(
            &mut output,
            "| {} | {} | {} | {} | {} | {} | {} | {:.0}% |",
            escape(&group.query_name),
            escape(&group.engine),
            group.executions,
            format_duration(group.mean_time),
            format_duration(group.min_time),
            format_duration(group.max_time),
            format_duration(group.std_time),
            group.success_rate * 100.0,
        )?;
    }
    writeln!(&mut output)?;

    let insights = &report.insights;
    writeln!(&mut output, "## Insights")?;
    writeln!(&mut output)?;
    if let (Some(best), Some(worst)) = (&insights.best_engine, &insights.worst_engine) {
        writeln!(&mut output, "- Fastest engine: **{}**", best)?;
        writeln!(&mut output, "- Slowest engine: **{}**", worst)?;
    }
    if let Some(gap) = insights.performance_gap {
        writeln!(&mut output, "- Performance gap: {:.2}x", gap)?;
    }
    if let Some(stable) = &insights.most_stable {
        writeln!(&mut output, "- Most stable: {}", stable)?;
    }
    if let Some(reliable) = &insights.most_reliable {
        writeln!(&mut output, "- Most reliable: {}", reliable)?;
    }
    if let Some(note) = &insights.error {
        writeln!(&mut output, "- _{}_", note)?;
    }

    Ok(output)
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}
