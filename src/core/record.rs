/// Per-run measurement records
///
/// A `RunRecord` is one measured query execution. `LooseRecord` is the same
/// row as read back from an external source (an exported results file), where
/// any column may be absent.
use serde::{Deserialize, Serialize};

/// Column names in export order
pub const COLUMNS: [&str; 9] = [
    "engine",
    "query_name",
    "iteration",
    "execution_time",
    "cpu_usage",
    "memory_usage",
    "success",
    "result_count",
    "error",
];

/// Suffix appended to engine labels and query names for concurrent runs
pub const CONCURRENT_SUFFIX: &str = "(Concurrent)";

/// One measured execution of a query against one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Engine label, e.g. "Virtuoso" or "Jena Fuseki (Concurrent)"
    pub engine: String,
    /// Session key this record was stored under; empty until tagged
    pub query_name: String,
    /// 1-based sequence number within its run group
    pub iteration: u32,
    /// Wall-clock latency in seconds
    pub execution_time: f64,
    /// CPU% delta across the execution; may be negative
    pub cpu_usage: f64,
    /// Used-memory delta in MB across the execution; may be negative
    pub memory_usage: f64,
    pub success: bool,
    pub result_count: usize,
    /// Empty on success
    pub error: String,
}

impl RunRecord {
    /// A failed record. `result_count` is forced to zero and the error
    /// message is never empty.
    pub fn failed(engine: &str, iteration: u32, execution_time: f64, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.is_empty() {
            error = "unknown error".to_string();
        }

        Self {
            engine: engine.to_string(),
            query_name: String::new(),
            iteration,
            execution_time,
            cpu_usage: 0.0,
            memory_usage: 0.0,
            success: false,
            result_count: 0,
            error,
        }
    }

    pub fn with_query_name(mut self, query_name: &str) -> Self {
        self.query_name = query_name.to_string();
        self
    }
}

/// A record row whose columns may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LooseRecord {
    pub engine: Option<String>,
    pub query_name: Option<String>,
    pub iteration: Option<u32>,
    pub execution_time: Option<f64>,
    pub cpu_usage: Option<f64>,
    pub memory_usage: Option<f64>,
    pub success: Option<bool>,
    pub result_count: Option<usize>,
    pub error: Option<String>,
}

impl From<&RunRecord> for LooseRecord {
    fn from(record: &RunRecord) -> Self {
        Self {
            engine: Some(record.engine.clone()),
            query_name: Some(record.query_name.clone()),
            iteration: Some(record.iteration),
            execution_time: Some(record.execution_time),
            cpu_usage: Some(record.cpu_usage),
            memory_usage: Some(record.memory_usage),
            success: Some(record.success),
            result_count: Some(record.result_count),
            error: Some(record.error.clone()),
        }
    }
}

impl From<RunRecord> for LooseRecord {
    fn from(record: RunRecord) -> Self {
        LooseRecord::from(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_invariant() {
        let record = RunRecord::failed("Virtuoso", 3, 0.5, "");
        assert!(!record.success);
        assert_eq!(record.result_count, 0);
        assert!(!record.error.is_empty());
        assert!(record.query_name.is_empty());
    }

    #[test]
    fn test_loose_record_missing_columns_deserialize() {
        let row: LooseRecord = serde_json::from_str(r#"{"engine": "Virtuoso", "success": true}"#).unwrap();
        assert_eq!(row.engine.as_deref(), Some("Virtuoso"));
        assert_eq!(row.success, Some(true));
        assert!(row.execution_time.is_none());
        assert!(row.cpu_usage.is_none());
    }

    #[test]
    fn test_loose_from_run_record() {
        let record = RunRecord::failed("Jena Fuseki", 1, 0.2, "timeout").with_query_name("Q1");
        let loose = LooseRecord::from(&record);
        assert_eq!(loose.query_name.as_deref(), Some("Q1"));
        assert_eq!(loose.execution_time, Some(0.2));
        assert_eq!(loose.error.as_deref(), Some("timeout"));
    }
}
