use crate::core::aggregator::{ComparisonSummary, Insights, QueryGap, ResultAggregator};
use crate::core::record::LooseRecord;
use crate::core::runner::BenchmarkSession;
use crate::SparqlBenchError;
use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

pub mod csv;
pub mod json;
pub mod markdown;
pub mod text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Csv,
    Markdown,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Markdown => "md",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            "markdown" | "md" => Ok(Format::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Everything a renderer needs, computed once
#[derive(Debug, Clone)]
pub struct Report {
    pub session_id: Option<Uuid>,
    pub rows: Vec<LooseRecord>,
    pub summary: ComparisonSummary,
    pub insights: Insights,
    pub gaps: Vec<QueryGap>,
    /// Labels the gap ratios are computed for, A over B
    pub engine_pair: Option<(String, String)>,
}

impl Report {
    pub fn from_session(session: &BenchmarkSession) -> Self {
        let rows: Vec<LooseRecord> = session.records().iter().map(LooseRecord::from).collect();
        Self::build(Some(session.id()), rows)
    }

    pub fn from_rows(rows: Vec<LooseRecord>) -> Self {
        Self::build(None, rows)
    }

    fn build(session_id: Option<Uuid>, rows: Vec<LooseRecord>) -> Self {
        let summary = ResultAggregator::summarize_rows(&rows);
        let insights = ResultAggregator::insights_rows(&rows);
        let engine_pair = ResultAggregator::engine_pair(&rows);
        let gaps = engine_pair
            .as_ref()
            .map(|(a, b)| ResultAggregator::performance_gaps_rows(&rows, a, b))
            .unwrap_or_default();

        Self {
            session_id,
            rows,
            summary,
            insights,
            gaps,
            engine_pair,
        }
    }
}

pub struct ReportGenerator {
    format: Format,
}

impl ReportGenerator {
    pub fn new(format: Format) -> Self {
        Self { format }
    }

    pub fn generate(&self, report: &Report) -> Result<String> {
        match self.format {
            Format::Text => text::generate_text_report(report),
            Format::Json => json::generate_json_report(report),
            Format::Csv => csv::generate_csv_report(&report.rows),
            Format::Markdown => markdown::generate_markdown_report(report),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, report: &Report, path: P) -> Result<()> {
        let contents = self.generate(report)?;
        std::fs::write(path.as_ref(), contents)?;
        tracing::info!(path = %path.as_ref().display(), format = ?self.format, "report written");
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsFile {
    Export { results: Vec<LooseRecord> },
    Bare(Vec<LooseRecord>),
}

/// Read records back from a JSON export (or a bare JSON array of records).
/// Rows may lack any column.
pub fn load_records<P: AsRef<Path>>(path: P) -> crate::Result<Vec<LooseRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let file: RecordsFile = serde_json::from_str(&contents).map_err(|e| {
        SparqlBenchError::Parse(format!("{} is not a results file: {}", path.display(), e))
    })?;

    Ok(match file {
        RecordsFile::Export { results } => results,
        RecordsFile::Bare(rows) => rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::RunRecord;
    use tempfile::TempDir;

    pub(crate) fn sample_rows() -> Vec<LooseRecord> {
        let mut rows = Vec::new();
        for (engine, time) in [("Virtuoso", 0.1), ("Jena Fuseki", 0.2)] {
            for iteration in 1..=3 {
                rows.push(LooseRecord::from(RunRecord {
                    engine: engine.to_string(),
                    query_name: "Simple - Courses".to_string(),
                    iteration,
                    execution_time: time,
                    cpu_usage: 0.5,
                    memory_usage: 1.5,
                    success: true,
                    result_count: 100,
                    error: String::new(),
                }));
            }
        }
        rows
    }

    #[test]
    fn test_report_from_rows() {
        let report = Report::from_rows(sample_rows());
        assert_eq!(report.summary.overview.total_executions, 6);
        assert_eq!(report.engine_pair, Some(("Virtuoso".to_string(), "Jena Fuseki".to_string())));
        assert_eq!(report.gaps.len(), 1);
        assert!((report.gaps[0].ratio.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("MD".parse::<Format>().unwrap(), Format::Markdown);
        assert_eq!("csv".parse::<Format>().unwrap().extension(), "csv");
        assert!("html".parse::<Format>().is_err());
    }

    #[test]
    fn test_json_export_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        let report = Report::from_rows(sample_rows());

        ReportGenerator::new(Format::Json).write(&report, &path).unwrap();
        let rows = load_records(&path).unwrap();

        assert_eq!(rows, report.rows);
    }

    #[test]
    fn test_load_bare_array_with_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{"engine": "A"}, {"engine": "B", "cpu_usage": 2.0}]"#).unwrap();

        let rows = load_records(&path).unwrap();
        assert_eq!(rows.len(), 2);

        let summary = ResultAggregator::summarize_rows(&rows);
        assert!(summary.error.unwrap().contains("execution_time"));
    }

    #[test]
    fn test_load_rejects_non_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.json");
        std::fs::write(&path, r#"{"hello": "world"}"#).unwrap();

        assert!(matches!(load_records(&path), Err(SparqlBenchError::Parse(_))));
    }
}
