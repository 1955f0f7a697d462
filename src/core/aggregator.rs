/// Summaries and comparative insights over benchmark records
///
/// Everything here fails soft: bad or empty input produces a zeroed result
/// with a reason attached, never an error or a panic. Records may come
/// straight from a `BenchmarkSession` or from an exported file, where any
/// column can be missing (`LooseRecord`).
use crate::core::record::{LooseRecord, RunRecord, CONCURRENT_SUFFIX};
use crate::utils::stats::{mean, SampleStats};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Columns without which no summary is computed
pub const REQUIRED_COLUMNS: [&str; 3] = ["execution_time", "success", "engine"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overview {
    pub total_executions: usize,
    pub unique_queries: usize,
    pub engines_tested: usize,
    /// Percentage, 0-100
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub avg_execution_time: f64,
    pub min_execution_time: f64,
    pub max_execution_time: f64,
    pub std_execution_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceStats {
    pub avg_cpu_usage: f64,
    pub max_cpu_usage: f64,
    pub avg_memory_usage: f64,
    pub max_memory_usage: f64,
}

/// Timing and success for one engine or one query
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub executions: usize,
    pub mean_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    /// Fraction, 0-1
    pub success_rate: f64,
}

/// Breakdown for one (query, engine) pair
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryEngineStats {
    pub query_name: String,
    pub engine: String,
    pub executions: usize,
    pub mean_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    pub std_time: f64,
    pub success_rate: f64,
    pub mean_cpu_usage: f64,
    pub mean_memory_usage: f64,
    pub mean_result_count: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub overview: Overview,
    pub performance: PerformanceStats,
    pub resources: ResourceStats,
    /// Sorted by query name, then engine
    pub by_group: Vec<QueryEngineStats>,
    pub by_engine: BTreeMap<String, GroupStats>,
    pub by_query: BTreeMap<String, GroupStats>,
    /// Set when the summary is zeroed because the input could not be used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonSummary {
    pub fn empty(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub best_engine: Option<String>,
    pub worst_engine: Option<String>,
    /// Mean time of the worst engine over that of the best; never below 1
    pub performance_gap: Option<f64>,
    pub fastest_query: Option<String>,
    pub slowest_query: Option<String>,
    pub most_stable: Option<String>,
    pub least_stable: Option<String>,
    pub most_reliable: Option<String>,
    /// Per-engine fraction of successful runs
    pub success_rates: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Insights {
    fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Head-to-head timing of the two engines on one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryGap {
    pub query_name: String,
    pub time_a: f64,
    pub time_b: f64,
    /// `time_a / time_b`; `None` when engine B's mean is zero
    pub ratio: Option<f64>,
}

pub struct ResultAggregator;

impl ResultAggregator {
    pub fn summarize(records: &[RunRecord]) -> ComparisonSummary {
        let rows: Vec<LooseRecord> = records.iter().map(LooseRecord::from).collect();
        Self::summarize_rows(&rows)
    }

    pub fn summarize_rows(rows: &[LooseRecord]) -> ComparisonSummary {
        if rows.is_empty() {
            return ComparisonSummary::empty("No records to summarize");
        }

        let missing = missing_columns(rows);
        if !missing.is_empty() {
            let reason = format!("Missing columns: {}", missing.join(", "));
            tracing::warn!(%reason, "summary unavailable");
            return ComparisonSummary::empty(reason);
        }

        let times = SampleStats::from_values(rows.iter().filter_map(|r| r.execution_time));
        let cpu = SampleStats::from_values(rows.iter().filter_map(|r| r.cpu_usage));
        let memory = SampleStats::from_values(rows.iter().filter_map(|r| r.memory_usage));

        let unique_queries: BTreeSet<&str> = rows.iter().filter_map(query_key).collect();
        let engines: BTreeSet<&str> = rows.iter().filter_map(|r| r.engine.as_deref()).collect();

        ComparisonSummary {
            overview: Overview {
                total_executions: rows.len(),
                unique_queries: unique_queries.len(),
                engines_tested: engines.len(),
                success_rate: success_fraction(rows.iter()) * 100.0,
            },
            performance: PerformanceStats {
                avg_execution_time: times.mean,
                min_execution_time: times.min,
                max_execution_time: times.max,
                std_execution_time: times.std,
            },
            resources: ResourceStats {
                avg_cpu_usage: cpu.mean,
                max_cpu_usage: cpu.max,
                avg_memory_usage: memory.mean,
                max_memory_usage: memory.max,
            },
            by_group: group_breakdown(rows),
            by_engine: group_stats(rows, |r| r.engine.as_deref()),
            by_query: group_stats(rows, query_key),
            error: None,
        }
    }

    pub fn insights(records: &[RunRecord]) -> Insights {
        let rows: Vec<LooseRecord> = records.iter().map(LooseRecord::from).collect();
        Self::insights_rows(&rows)
    }

    pub fn insights_rows(rows: &[LooseRecord]) -> Insights {
        let engine_times = group_values(rows, |r| r.engine.as_deref(), |r| r.execution_time);
        if engine_times.is_empty() {
            return Insights::unavailable("No execution times to analyze");
        }

        let engine_means: Vec<(&str, f64)> = engine_times.iter().map(|(k, v)| (*k, mean(v.iter().copied()))).collect();
        let best = arg_extreme(&engine_means, |a, b| a < b);
        let worst = arg_extreme(&engine_means, |a, b| a > b);

        let mut insights = Insights {
            best_engine: best.map(|(name, _)| name.to_string()),
            worst_engine: worst.map(|(name, _)| name.to_string()),
            ..Insights::default()
        };

        match (best, worst) {
            _ if engine_means.len() < 2 => {
                insights.error = Some("Performance gap needs at least two engines".to_string());
            }
            (Some((_, best_time)), Some((_, worst_time))) if best_time > 0.0 => {
                insights.performance_gap = Some(worst_time / best_time);
            }
            _ => {
                insights.error = Some("Performance gap undefined: best engine mean time is zero".to_string());
            }
        }

        let query_means: Vec<(&str, f64)> = group_values(rows, query_key, |r| r.execution_time)
            .iter()
            .map(|(k, v)| (*k, mean(v.iter().copied())))
            .collect();
        insights.fastest_query = arg_extreme(&query_means, |a, b| a < b).map(|(name, _)| name.to_string());
        insights.slowest_query = arg_extreme(&query_means, |a, b| a > b).map(|(name, _)| name.to_string());

        let stability: Vec<(&str, f64)> = engine_times
            .iter()
            .map(|(k, v)| (*k, SampleStats::from_values(v.iter().copied()).std))
            .collect();
        insights.most_stable = arg_extreme(&stability, |a, b| a < b).map(|(name, _)| name.to_string());
        insights.least_stable = arg_extreme(&stability, |a, b| a > b).map(|(name, _)| name.to_string());

        let success = group_values(rows, |r| r.engine.as_deref(), |r| r.success.map(as_fraction));
        let success_rates: Vec<(&str, f64)> = success.iter().map(|(k, v)| (*k, mean(v.iter().copied()))).collect();
        insights.most_reliable = arg_extreme(&success_rates, |a, b| a > b).map(|(name, _)| name.to_string());
        insights.success_rates = success_rates.into_iter().map(|(k, v)| (k.to_string(), v)).collect();

        insights
    }

    /// Per-query comparison of two engines by label. Concurrent runs of an
    /// engine count as that engine. Queries where either engine is absent are
    /// skipped; output follows first appearance of each query.
    pub fn performance_gaps(records: &[RunRecord], engine_a: &str, engine_b: &str) -> Vec<QueryGap> {
        let rows: Vec<LooseRecord> = records.iter().map(LooseRecord::from).collect();
        Self::performance_gaps_rows(&rows, engine_a, engine_b)
    }

    pub fn performance_gaps_rows(rows: &[LooseRecord], engine_a: &str, engine_b: &str) -> Vec<QueryGap> {
        let mut per_query: IndexMap<&str, (Vec<f64>, Vec<f64>)> = IndexMap::new();

        for row in rows {
            let (Some(query), Some(engine), Some(time)) = (row.query_name.as_deref(), row.engine.as_deref(), row.execution_time)
            else {
                continue;
            };

            let entry = per_query.entry(query).or_default();
            if is_engine(engine, engine_a) {
                entry.0.push(time);
            } else if is_engine(engine, engine_b) {
                entry.1.push(time);
            }
        }

        per_query
            .into_iter()
            .filter(|(_, (a, b))| !a.is_empty() && !b.is_empty())
            .map(|(query, (a, b))| {
                let time_a = mean(a);
                let time_b = mean(b);
                QueryGap {
                    query_name: query.to_string(),
                    time_a,
                    time_b,
                    ratio: (time_b > 0.0).then(|| time_a / time_b),
                }
            })
            .collect()
    }

    /// The two base engine labels in first-appearance order, ignoring the
    /// concurrent suffix. `None` unless exactly two are present.
    pub fn engine_pair(rows: &[LooseRecord]) -> Option<(String, String)> {
        let mut labels: Vec<&str> = Vec::new();
        for engine in rows.iter().filter_map(|r| r.engine.as_deref()) {
            let base = engine.strip_suffix(CONCURRENT_SUFFIX).map_or(engine, str::trim_end);
            if !labels.contains(&base) {
                labels.push(base);
            }
        }

        match labels.as_slice() {
            [a, b] => Some((a.to_string(), b.to_string())),
            _ => None,
        }
    }
}

fn as_fraction(success: bool) -> f64 {
    if success {
        1.0
    } else {
        0.0
    }
}

/// Query name for grouping; untagged records have none
fn query_key(row: &LooseRecord) -> Option<&str> {
    row.query_name.as_deref().filter(|name| !name.is_empty())
}

fn is_engine(engine: &str, label: &str) -> bool {
    engine == label
        || engine
            .strip_prefix(label)
            .is_some_and(|rest| rest.trim() == CONCURRENT_SUFFIX)
}

fn missing_columns(rows: &[LooseRecord]) -> Vec<&'static str> {
    let present = [
        rows.iter().any(|r| r.execution_time.is_some()),
        rows.iter().any(|r| r.success.is_some()),
        rows.iter().any(|r| r.engine.is_some()),
    ];

    REQUIRED_COLUMNS
        .iter()
        .zip(present)
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect()
}

fn success_fraction<'a>(rows: impl Iterator<Item = &'a LooseRecord>) -> f64 {
    mean(rows.filter_map(|r| r.success.map(as_fraction)))
}

/// Collect `value` per `key`, skipping rows lacking either
fn group_values<'a, K, V>(rows: &'a [LooseRecord], key: K, value: V) -> BTreeMap<&'a str, Vec<f64>>
where
    K: Fn(&'a LooseRecord) -> Option<&'a str>,
    V: Fn(&'a LooseRecord) -> Option<f64>,
{
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let (Some(k), Some(v)) = (key(row), value(row)) {
            groups.entry(k).or_default().push(v);
        }
    }
    groups
}

fn group_stats<'a, K>(rows: &'a [LooseRecord], key: K) -> BTreeMap<String, GroupStats>
where
    K: Fn(&'a LooseRecord) -> Option<&'a str>,
{
    let mut groups: BTreeMap<&str, Vec<&LooseRecord>> = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            groups.entry(k).or_default().push(row);
        }
    }

    groups
        .into_iter()
        .map(|(name, members)| {
            let times = SampleStats::from_values(members.iter().filter_map(|r| r.execution_time));
            let stats = GroupStats {
                executions: members.len(),
                mean_time: times.mean,
                min_time: times.min,
                max_time: times.max,
                success_rate: success_fraction(members.into_iter()),
            };
            (name.to_string(), stats)
        })
        .collect()
}

fn group_breakdown(rows: &[LooseRecord]) -> Vec<QueryEngineStats> {
    let mut groups: BTreeMap<(&str, &str), Vec<&LooseRecord>> = BTreeMap::new();
    for row in rows {
        if let (Some(query), Some(engine)) = (row.query_name.as_deref(), row.engine.as_deref()) {
            groups.entry((query, engine)).or_default().push(row);
        }
    }

    groups
        .into_iter()
        .map(|((query, engine), members)| {
            let times = SampleStats::from_values(members.iter().filter_map(|r| r.execution_time));
            QueryEngineStats {
                query_name: query.to_string(),
                engine: engine.to_string(),
                executions: members.len(),
                mean_time: times.mean,
                min_time: times.min,
                max_time: times.max,
                std_time: times.std,
                success_rate: success_fraction(members.iter().copied()),
                mean_cpu_usage: mean(members.iter().filter_map(|r| r.cpu_usage)),
                mean_memory_usage: mean(members.iter().filter_map(|r| r.memory_usage)),
                mean_result_count: mean(members.iter().filter_map(|r| r.result_count.map(|c| c as f64))),
            }
        })
        .collect()
}

/// First entry whose value beats every other under `better`
fn arg_extreme<'a, F>(values: &[(&'a str, f64)], better: F) -> Option<(&'a str, f64)>
where
    F: Fn(f64, f64) -> bool,
{
    values.iter().copied().fold(None, |current, candidate| match current {
        Some(best) if !better(candidate.1, best.1) => Some(best),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(engine: &str, query: &str, iteration: u32, time: f64, success: bool) -> RunRecord {
        let mut record = if success {
            RunRecord {
                engine: engine.to_string(),
                query_name: String::new(),
                iteration,
                execution_time: time,
                cpu_usage: 1.0,
                memory_usage: 2.0,
                success: true,
                result_count: 10,
                error: String::new(),
            }
        } else {
            RunRecord::failed(engine, iteration, time, "timeout")
        };
        record.query_name = query.to_string();
        record
    }

    fn two_engine_run() -> Vec<RunRecord> {
        let mut records = Vec::new();
        for i in 1..=5 {
            records.push(record("Virtuoso", "Q1", i, 0.10, true));
        }
        for i in 1..=5 {
            records.push(record("Jena Fuseki", "Q1", i, 0.20, true));
        }
        records
    }

    #[test]
    fn test_insights_scenario() {
        let insights = ResultAggregator::insights(&two_engine_run());

        assert_eq!(insights.best_engine.as_deref(), Some("Virtuoso"));
        assert_eq!(insights.worst_engine.as_deref(), Some("Jena Fuseki"));
        let gap = insights.performance_gap.unwrap();
        assert!((gap - 2.0).abs() < 1e-9);
        assert!(insights.error.is_none());
    }

    #[test]
    fn test_untagged_records_have_no_query() {
        let mut records = two_engine_run();
        records.push(record("Virtuoso", "", 1, 0.3, true));

        let summary = ResultAggregator::summarize(&records);
        assert_eq!(summary.overview.unique_queries, 1);
        assert_eq!(summary.overview.total_executions, 11);
        assert!(!summary.by_query.contains_key(""));

        let insights = ResultAggregator::insights(&records);
        assert_eq!(insights.fastest_query.as_deref(), Some("Q1"));
    }

    #[test]
    fn test_insights_identical_means() {
        let records = vec![
            record("A", "Q1", 1, 0.5, true),
            record("B", "Q1", 1, 0.5, true),
        ];
        let insights = ResultAggregator::insights(&records);
        assert_eq!(insights.performance_gap, Some(1.0));
    }

    #[test]
    fn test_insights_single_engine_reports_error() {
        let records = vec![record("A", "Q1", 1, 0.5, true), record("A", "Q2", 1, 0.7, true)];
        let insights = ResultAggregator::insights(&records);

        assert_eq!(insights.best_engine.as_deref(), Some("A"));
        assert!(insights.performance_gap.is_none());
        assert!(insights.error.is_some());
        assert_eq!(insights.fastest_query.as_deref(), Some("Q1"));
        assert_eq!(insights.slowest_query.as_deref(), Some("Q2"));
    }

    #[test]
    fn test_insights_zero_best_time() {
        let records = vec![record("A", "Q1", 1, 0.0, false), record("B", "Q1", 1, 0.3, true)];
        let insights = ResultAggregator::insights(&records);
        assert!(insights.performance_gap.is_none());
        assert!(insights.error.unwrap().contains("zero"));
    }

    #[test]
    fn test_insights_stability_and_reliability() {
        let records = vec![
            record("A", "Q1", 1, 0.10, true),
            record("A", "Q1", 2, 0.90, false),
            record("B", "Q1", 1, 0.50, true),
            record("B", "Q1", 2, 0.51, true),
        ];
        let insights = ResultAggregator::insights(&records);

        assert_eq!(insights.most_stable.as_deref(), Some("B"));
        assert_eq!(insights.least_stable.as_deref(), Some("A"));
        assert_eq!(insights.most_reliable.as_deref(), Some("B"));
        assert_eq!(insights.success_rates.get("A"), Some(&0.5));
        assert_eq!(insights.success_rates.get("B"), Some(&1.0));
    }

    #[test]
    fn test_insights_empty() {
        let insights = ResultAggregator::insights(&[]);
        assert!(insights.error.is_some());
        assert!(insights.best_engine.is_none());
    }

    #[test]
    fn test_summarize_empty() {
        let summary = ResultAggregator::summarize(&[]);
        assert_eq!(summary.overview, Overview::default());
        assert!(summary.by_group.is_empty());
        assert!(!summary.error.unwrap().is_empty());
    }

    #[test]
    fn test_summarize_missing_required_columns() {
        let rows = vec![
            LooseRecord {
                engine: Some("A".to_string()),
                cpu_usage: Some(3.0),
                ..LooseRecord::default()
            },
            LooseRecord {
                engine: Some("B".to_string()),
                ..LooseRecord::default()
            },
        ];

        let summary = ResultAggregator::summarize_rows(&rows);
        assert_eq!(summary.overview.total_executions, 0);
        assert_eq!(summary.performance, PerformanceStats::default());
        assert_eq!(
            summary.error.as_deref(),
            Some("Missing columns: execution_time, success")
        );
    }

    #[test]
    fn test_summarize_optional_columns_absent() {
        let rows = vec![LooseRecord {
            engine: Some("A".to_string()),
            execution_time: Some(0.4),
            success: Some(true),
            ..LooseRecord::default()
        }];

        let summary = ResultAggregator::summarize_rows(&rows);
        assert!(summary.error.is_none());
        assert_eq!(summary.resources, ResourceStats::default());
        assert_eq!(summary.overview.unique_queries, 0);
        assert!(summary.by_query.is_empty());
        assert_eq!(summary.by_engine["A"].mean_time, 0.4);
    }

    #[test]
    fn test_summarize_full() {
        let mut records = two_engine_run();
        records.push(record("Jena Fuseki", "Q2", 1, 0.30, false));

        let summary = ResultAggregator::summarize(&records);

        assert_eq!(summary.overview.total_executions, 11);
        assert_eq!(summary.overview.unique_queries, 2);
        assert_eq!(summary.overview.engines_tested, 2);
        assert!((summary.overview.success_rate - 1000.0 / 11.0).abs() < 1e-9);
        assert_eq!(summary.performance.min_execution_time, 0.10);
        assert_eq!(summary.performance.max_execution_time, 0.30);
        assert_eq!(summary.resources.max_cpu_usage, 1.0);

        assert_eq!(summary.by_group.len(), 3);
        let first = &summary.by_group[0];
        assert_eq!((first.query_name.as_str(), first.engine.as_str()), ("Q1", "Jena Fuseki"));
        assert_eq!(first.executions, 5);
        assert_eq!(first.std_time, 0.0);
        assert_eq!(first.mean_result_count, 10.0);

        let q2 = &summary.by_query["Q2"];
        assert_eq!(q2.executions, 1);
        assert_eq!(q2.success_rate, 0.0);
    }

    #[test]
    fn test_performance_gaps() {
        let mut records = two_engine_run();
        records.push(record("Virtuoso (Concurrent)", "Q1 (Concurrent)", 1, 0.4, true));
        records.push(record("Jena Fuseki (Concurrent)", "Q1 (Concurrent)", 1, 0.0, false));
        records.push(record("Virtuoso", "Q3", 1, 0.1, true));

        let gaps = ResultAggregator::performance_gaps(&records, "Virtuoso", "Jena Fuseki");

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].query_name, "Q1");
        assert!((gaps[0].ratio.unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(gaps[1].query_name, "Q1 (Concurrent)");
        assert!(gaps[1].ratio.is_none());
    }

    #[test]
    fn test_engine_pair() {
        let mut records = two_engine_run();
        records.push(record("Virtuoso (Concurrent)", "Q1 (Concurrent)", 1, 0.4, true));
        let rows: Vec<LooseRecord> = records.iter().map(LooseRecord::from).collect();
        assert_eq!(
            ResultAggregator::engine_pair(&rows),
            Some(("Virtuoso".to_string(), "Jena Fuseki".to_string()))
        );

        let single: Vec<LooseRecord> = rows.into_iter().take(2).collect();
        assert_eq!(ResultAggregator::engine_pair(&single), None);
    }

    #[test]
    fn test_is_engine() {
        assert!(is_engine("Virtuoso", "Virtuoso"));
        assert!(is_engine("Virtuoso (Concurrent)", "Virtuoso"));
        assert!(!is_engine("Virtuoso Cluster", "Virtuoso"));
    }
}
