use crate::core::record::{LooseRecord, COLUMNS};
use crate::report::Report;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct ExportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    export_timestamp: DateTime<Utc>,
    total_records: usize,
    columns: Vec<&'static str>,
}

#[derive(Serialize)]
struct Export<'a> {
    metadata: ExportMetadata,
    results: &'a [LooseRecord],
}

pub fn generate_json_report(report: &Report) -> Result<String> {
    let export = Export {
        metadata: ExportMetadata {
            session_id: report.session_id.map(|id| id.to_string()),
            export_timestamp: Utc::now(),
            total_records: report.rows.len(),
            columns: COLUMNS.to_vec(),
        },
        results: &report.rows,
    };

    Ok(serde_json::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_rows;
    use serde_json::Value;

    #[test]
    fn test_json_metadata() {
        let report = Report::from_rows(sample_rows());
        let output = generate_json_report(&report).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["metadata"]["total_records"], 6);
        assert_eq!(value["metadata"]["columns"].as_array().unwrap().len(), 9);
        assert!(value["metadata"].get("session_id").is_none());
        assert_eq!(value["results"][0]["engine"], "Virtuoso");
    }
}
