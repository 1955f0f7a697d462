use crate::core::aggregator::{ComparisonSummary, Insights};
use crate::report::Report;
use crate::utils::format::{format_duration, format_memory_mb};
use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use std::fmt::Write;

pub fn generate_text_report(report: &Report) -> Result<String> {
    let mut output = String::new();

    writeln!(&mut output, "SPARQL Benchmark Report")?;
    writeln!(&mut output, "=======================")?;
    if let Some(id) = report.session_id {
        writeln!(&mut output, "Session: {}", id)?;
    }
    writeln!(&mut output)?;

    let summary = &report.summary;
    if let Some(reason) = &summary.error {
        writeln!(&mut output, "No summary available: {}", reason)?;
        return Ok(output);
    }

    write_overview(&mut output, summary)?;
    writeln!(&mut output, "{}", breakdown_table(summary))?;
    writeln!(&mut output)?;
    write_insights(&mut output, &report.insights)?;

    if let (Some((a, b)), false) = (&report.engine_pair, report.gaps.is_empty()) {
        writeln!(&mut output)?;
        writeln!(&mut output, "Per-query ratio ({} / {})", a, b)?;
        writeln!(&mut output, "-----------------")?;
        for gap in &report.gaps {
            let ratio = gap.ratio.map_or_else(|| "n/a".to_string(), |r| format!("{:.2}x", r));
            writeln!(&mut output, "  {:<50} {}", gap.query_name, ratio)?;
        }
    }

    Ok(output)
}

fn write_overview(output: &mut String, summary: &ComparisonSummary) -> Result<()> {
    let overview = &summary.overview;
    let performance = &summary.performance;
    let resources = &summary.resources;

    writeln!(output, "Overview")?;
    writeln!(output, "--------")?;
    writeln!(output, "- Executions:     {}", overview.total_executions)?;
    writeln!(output, "- Queries:        {}", overview.unique_queries)?;
    writeln!(output, "- Engines:        {}", overview.engines_tested)?;
    writeln!(output, "- Success rate:   {:.1}%", overview.success_rate)?;
    writeln!(
        output,
        "- Execution time: avg {} / min {} / max {} / std {}",
        format_duration(performance.avg_execution_time),
        format_duration(performance.min_execution_time),
        format_duration(performance.max_execution_time),
        format_duration(performance.std_execution_time),
    )?;
    writeln!(
        output,
        "- CPU delta:      avg {:.2}% / max {:.2}%",
        resources.avg_cpu_usage, resources.max_cpu_usage
    )?;
    writeln!(
        output,
        "- Memory delta:   avg {} / max {}",
        format_memory_mb(resources.avg_memory_usage),
        format_memory_mb(resources.max_memory_usage)
    )?;
    writeln!(output)?;
    Ok(())
}

/// Per-(query, engine) table
pub fn breakdown_table(summary: &ComparisonSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(
        ["Query", "Engine", "Runs", "Mean", "Min", "Max", "Std", "Success", "Results"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for group in &summary.by_group {
        table.add_row(vec![
            Cell::new(&group.query_name),
            Cell::new(&group.engine),
            Cell::new(group.executions).set_alignment(CellAlignment::Right),
            Cell::new(format_duration(group.mean_time)).set_alignment(CellAlignment::Right),
            Cell::new(format_duration(group.min_time)).set_alignment(CellAlignment::Right),
            Cell::new(format_duration(group.max_time)).set_alignment(CellAlignment::Right),
            Cell::new(format_duration(group.std_time)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}%", group.success_rate * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}", group.mean_result_count)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

fn write_insights(output: &mut String, insights: &Insights) -> Result<()> {
    writeln!(output, "Insights")?;
    writeln!(output, "--------")?;

    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    writeln!(output, "- Fastest engine:  {}", show(&insights.best_engine))?;
    writeln!(output, "- Slowest engine:  {}", show(&insights.worst_engine))?;
    match insights.performance_gap {
        Some(gap) => writeln!(output, "- Performance gap: {:.2}x", gap)?,
        None => writeln!(output, "- Performance gap: -")?,
    }
    writeln!(output, "- Fastest query:   {}", show(&insights.fastest_query))?;
    writeln!(output, "- Slowest query:   {}", show(&insights.slowest_query))?;
    writeln!(output, "- Most stable:     {}", show(&insights.most_stable))?;
    writeln!(output, "- Least stable:    {}", show(&insights.least_stable))?;
    writeln!(output, "- Most reliable:   {}", show(&insights.most_reliable))?;

    for (engine, rate) in &insights.success_rates {
        writeln!(output, "    {:<30} {:.1}% success", engine, rate * 100.0)?;
    }

    if let Some(note) = &insights.error {
        writeln!(output, "  Note: {}", note)?;
    }

    Ok(())
}
