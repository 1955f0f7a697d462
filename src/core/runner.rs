/// Benchmark orchestration
///
/// `BenchmarkRunner` drives repeated executions of one query against two
/// engines and stores the measured `RunRecord`s in a `BenchmarkSession`.
///
/// Sequential runs execute engine A to completion before engine B starts so
/// the two never contend for the host. Concurrent runs put every execution
/// for both engines on a bounded worker pool and wait for all of them;
/// iteration numbers there are assigned before submission and identify a
/// task, not its completion order.
use crate::core::config::Engine;
use crate::core::executor::{panic_message, QueryExecutor};
use crate::core::metrics::MetricsSampler;
use crate::core::record::{RunRecord, CONCURRENT_SUFFIX};
use crate::utils::parallel::build_pool;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use uuid::Uuid;

/// Results of one benchmarking session, keyed by query name in execution order
#[derive(Debug, Clone)]
pub struct BenchmarkSession {
    id: Uuid,
    results: IndexMap<String, Vec<RunRecord>>,
    current_test_results: Vec<RunRecord>,
}

impl Default for BenchmarkSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            results: IndexMap::new(),
            current_test_results: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn get(&self, query_name: &str) -> Option<&[RunRecord]> {
        self.results.get(query_name).map(Vec::as_slice)
    }

    pub fn query_names(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Number of stored run groups
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Records accumulated by the benchmark call in progress (or the last one)
    pub fn current_results(&self) -> &[RunRecord] {
        &self.current_test_results
    }

    /// Every stored record, tagged with the key it is stored under
    pub fn records(&self) -> Vec<RunRecord> {
        self.results
            .iter()
            .flat_map(|(name, records)| records.iter().map(move |r| r.clone().with_query_name(name)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.current_test_results.clear();
    }

    /// Tag the scratch buffer with `key` and store it, replacing any prior entry
    fn commit(&mut self, key: &str) -> Vec<RunRecord> {
        for record in &mut self.current_test_results {
            record.query_name = key.to_string();
        }
        let records = self.current_test_results.clone();
        self.results.insert(key.to_string(), records.clone());
        records
    }
}

/// One unit of work for the concurrent pool
struct ConcurrentTask<'a> {
    engine: &'a str,
    endpoint: &'a str,
    iteration: u32,
}

pub struct BenchmarkRunner {
    engine_a: Engine,
    engine_b: Engine,
    executor: QueryExecutor,
    sampler: MetricsSampler,
    session: BenchmarkSession,
}

impl BenchmarkRunner {
    pub fn new(engine_a: Engine, engine_b: Engine, executor: QueryExecutor, sampler: MetricsSampler) -> Self {
        Self::with_session(engine_a, engine_b, executor, sampler, BenchmarkSession::new())
    }

    pub fn with_session(
        engine_a: Engine,
        engine_b: Engine,
        executor: QueryExecutor,
        sampler: MetricsSampler,
        session: BenchmarkSession,
    ) -> Self {
        Self {
            engine_a,
            engine_b,
            executor,
            sampler,
            session,
        }
    }

    pub fn engines(&self) -> (&Engine, &Engine) {
        (&self.engine_a, &self.engine_b)
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut QueryExecutor {
        &mut self.executor
    }

    pub fn sampler(&self) -> &MetricsSampler {
        &self.sampler
    }

    pub fn session(&self) -> &BenchmarkSession {
        &self.session
    }

    pub fn into_session(self) -> BenchmarkSession {
        self.session
    }

    /// Time one execution bracketed by resource snapshots. Does not touch the
    /// session, so it is safe to call from worker threads.
    fn measure(&self, engine: &str, endpoint: &str, query: &str, iteration: u32) -> RunRecord {
        tracing::debug!(engine, iteration, "executing query");

        let start_metrics = self.sampler.snapshot();
        let start = Instant::now();

        let outcome = self.executor.execute(endpoint, query);

        let execution_time = start.elapsed().as_secs_f64();
        let end_metrics = self.sampler.snapshot();

        let delta = MetricsSampler::delta(&start_metrics, &end_metrics);

        if !outcome.success {
            return RunRecord {
                cpu_usage: delta.cpu_usage,
                memory_usage: delta.memory_usage,
                ..RunRecord::failed(engine, iteration, execution_time, outcome.error)
            };
        }

        RunRecord {
            engine: engine.to_string(),
            query_name: String::new(),
            iteration,
            execution_time,
            cpu_usage: delta.cpu_usage,
            memory_usage: delta.memory_usage,
            success: true,
            result_count: outcome.result_count,
            error: outcome.error,
        }
    }

    /// Measure one execution and append it to the scratch buffer
    pub fn execute_single_query(&mut self, engine: &str, endpoint: &str, query: &str, iteration: u32) -> RunRecord {
        let record = self.measure(engine, endpoint, query, iteration);
        self.session.current_test_results.push(record.clone());
        record
    }

    /// Run `num_iterations` executions on engine A, then on engine B.
    ///
    /// A measured run replaces the session entry for `query_name` and returns
    /// the tagged records. A warm-up run (`is_warmup`) uses the same query and
    /// endpoints but its records are discarded and the session is untouched.
    pub fn run_benchmark(
        &mut self,
        query_name: &str,
        query: &str,
        num_iterations: u32,
        warmup_iterations: u32,
        is_warmup: bool,
    ) -> Vec<RunRecord> {
        let scratch_len = if is_warmup {
            self.session.current_test_results.len()
        } else {
            self.session.current_test_results.clear();
            tracing::info!(query = query_name, num_iterations, warmup_iterations, "benchmark started");
            0
        };

        let (engine_a, engine_b) = (self.engine_a.clone(), self.engine_b.clone());
        for engine in [&engine_a, &engine_b] {
            for iteration in 1..=num_iterations {
                self.execute_single_query(&engine.label, &engine.endpoint, query, iteration);
            }
        }

        if is_warmup {
            self.session.current_test_results.truncate(scratch_len);
            tracing::debug!(query = query_name, num_iterations, "warm-up finished");
            return Vec::new();
        }

        let records = self.session.commit(query_name);
        tracing::info!(query = query_name, records = records.len(), "benchmark finished");
        records
    }

    /// Run `num_iterations` executions per engine on a pool of
    /// `concurrent_level` workers and block until all have resolved.
    ///
    /// Records are stored under `"<query_name> (Concurrent)"` with engine
    /// labels suffixed the same way.
    pub fn run_concurrent_benchmark(
        &mut self,
        query_name: &str,
        query: &str,
        num_iterations: u32,
        concurrent_level: usize,
    ) -> Vec<RunRecord> {
        self.session.current_test_results.clear();
        tracing::info!(query = query_name, concurrent_level, "concurrent benchmark started");

        let label_a = format!("{} {}", self.engine_a.label, CONCURRENT_SUFFIX);
        let label_b = format!("{} {}", self.engine_b.label, CONCURRENT_SUFFIX);

        let tasks: Vec<ConcurrentTask<'_>> = [(&label_a, &self.engine_a.endpoint), (&label_b, &self.engine_b.endpoint)]
            .into_iter()
            .flat_map(|(engine, endpoint)| {
                (1..=num_iterations).map(move |iteration| ConcurrentTask {
                    engine,
                    endpoint,
                    iteration,
                })
            })
            .collect();

        let records = self.run_on_pool(&tasks, query, concurrent_level);
        self.session.current_test_results.extend(records);

        let key = format!("{} {}", query_name, CONCURRENT_SUFFIX);
        let records = self.session.commit(&key);
        tracing::info!(query = query_name, records = records.len(), "concurrent benchmark finished");
        records
    }

    /// Execute every task on a bounded pool. Output order matches `tasks`.
    fn run_on_pool(&self, tasks: &[ConcurrentTask<'_>], query: &str, concurrent_level: usize) -> Vec<RunRecord> {
        let run_task = |task: &ConcurrentTask<'_>| -> RunRecord {
            let started = Instant::now();
            panic::catch_unwind(AssertUnwindSafe(|| {
                self.measure(task.engine, task.endpoint, query, task.iteration)
            }))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                tracing::error!(engine = task.engine, iteration = task.iteration, error = %message, "concurrent task failed");
                RunRecord::failed(task.engine, task.iteration, started.elapsed().as_secs_f64(), message)
            })
        };

        // rayon spawns every worker up front; never more than there are tasks
        let workers = concurrent_level.clamp(1, tasks.len().max(1));
        tracing::debug!(concurrent_level, workers, "building worker pool");

        match build_pool(workers) {
            Ok(pool) => pool.install(|| tasks.par_iter().map(run_task).collect()),
            Err(e) => {
                tracing::warn!(error = %e, "could not build worker pool, running tasks inline");
                tasks.iter().map(run_task).collect()
            }
        }
    }

    /// Every stored record, flattened in session order
    pub fn get_aggregated_results(&self) -> Vec<RunRecord> {
        self.session.records()
    }

    pub fn clear_results(&mut self) {
        self.session.clear();
        tracing::info!("results cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::{SparqlTransport, TransportError};
    use crate::core::metrics::{ResourceProbe, ResourceReading};
    use serde_json::{json, Value};
    use std::time::Duration;

    struct StaticTransport;

    impl SparqlTransport for StaticTransport {
        fn query(&self, endpoint: &str, _query: &str, _timeout: Duration) -> Result<Value, TransportError> {
            if endpoint.contains("broken") {
                return Err(TransportError::Connection("refused".to_string()));
            }
            if endpoint.contains("panic") {
                panic!("transport exploded");
            }
            Ok(json!({ "results": { "bindings": [ {}, {}, {} ] } }))
        }
    }

    struct FlatProbe;

    impl ResourceProbe for FlatProbe {
        fn read(&self) -> anyhow::Result<ResourceReading> {
            Ok(ResourceReading {
                cpu_percent: 5.0,
                memory_used_mb: 512.0,
                memory_percent: 10.0,
            })
        }
    }

    fn runner(endpoint_b: &str) -> BenchmarkRunner {
        BenchmarkRunner::new(
            Engine::new("Virtuoso", "http://a/sparql"),
            Engine::new("Jena Fuseki", endpoint_b),
            QueryExecutor::with_transport(Box::new(StaticTransport)),
            MetricsSampler::with_probe(Box::new(FlatProbe)),
        )
    }

    #[test]
    fn test_execute_single_query_appends_to_scratch() {
        let mut runner = runner("http://b/query");
        let record = runner.execute_single_query("Virtuoso", "http://a/sparql", "SELECT * WHERE {}", 4);

        assert!(record.success);
        assert_eq!(record.iteration, 4);
        assert_eq!(record.result_count, 3);
        assert_eq!(record.cpu_usage, 0.0);
        assert_eq!(runner.session().current_results().len(), 1);
        assert!(runner.session().is_empty());
    }

    #[test]
    fn test_failed_execution_record() {
        let mut runner = runner("http://broken/query");
        let record = runner.execute_single_query("Jena Fuseki", "http://broken/query", "SELECT * WHERE {}", 1);

        assert!(!record.success);
        assert_eq!(record.result_count, 0);
        assert!(record.error.contains("refused"));
    }

    #[test]
    fn test_sequential_engine_order() {
        let mut runner = runner("http://b/query");
        let records = runner.run_benchmark("Q1", "SELECT * WHERE {}", 3, 0, false);

        let labels: Vec<(&str, u32)> = records.iter().map(|r| (r.engine.as_str(), r.iteration)).collect();
        assert_eq!(
            labels,
            vec![
                ("Virtuoso", 1),
                ("Virtuoso", 2),
                ("Virtuoso", 3),
                ("Jena Fuseki", 1),
                ("Jena Fuseki", 2),
                ("Jena Fuseki", 3),
            ]
        );
        assert!(records.iter().all(|r| r.query_name == "Q1"));
    }

    #[test]
    fn test_warmup_leaves_scratch_and_session_alone() {
        let mut runner = runner("http://b/query");
        runner.run_benchmark("Q1", "SELECT * WHERE {}", 2, 0, false);
        let scratch_before = runner.session().current_results().to_vec();

        let warm = runner.run_benchmark("Q2", "SELECT * WHERE {}", 5, 5, true);

        assert!(warm.is_empty());
        assert_eq!(runner.session().current_results(), scratch_before.as_slice());
        assert!(runner.session().get("Q2").is_none());
    }

    #[test]
    fn test_rerun_replaces_entry_in_place() {
        let mut runner = runner("http://b/query");
        runner.run_benchmark("Q1", "SELECT * WHERE {}", 2, 0, false);
        runner.run_benchmark("Q2", "SELECT * WHERE {}", 1, 0, false);
        runner.run_benchmark("Q1", "SELECT * WHERE {}", 3, 0, false);

        let names: Vec<&str> = runner.session().query_names().collect();
        assert_eq!(names, vec!["Q1", "Q2"]);
        assert_eq!(runner.session().get("Q1").map(<[RunRecord]>::len), Some(6));
    }

    #[test]
    fn test_concurrent_task_panic_becomes_failed_record() {
        let mut runner = runner("http://panic/query");
        let records = runner.run_concurrent_benchmark("Q1", "SELECT * WHERE {}", 3, 2);

        assert_eq!(records.len(), 6);
        let failed: Vec<&RunRecord> = records.iter().filter(|r| !r.success).collect();
        assert_eq!(failed.len(), 3);
        for record in failed {
            assert_eq!(record.engine, "Jena Fuseki (Concurrent)");
            assert_eq!(record.result_count, 0);
            assert!(record.error.contains("transport exploded"));
        }
        assert!(records.iter().all(|r| r.query_name == "Q1 (Concurrent)"));
    }

    #[test]
    fn test_concurrent_zero_level_still_runs() {
        let mut runner = runner("http://b/query");
        let records = runner.run_concurrent_benchmark("Q1", "SELECT * WHERE {}", 2, 0);
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_sequential_panic_becomes_failed_record() {
        let mut runner = runner("http://panic/query");
        let records = runner.run_benchmark("Q1", "SELECT * WHERE {}", 2, 0, false);

        assert_eq!(records.len(), 4);
        assert!(records[..2].iter().all(|r| r.success));
        for record in &records[2..] {
            assert!(!record.success);
            assert_eq!(record.result_count, 0);
            assert!(record.error.contains("transport exploded"), "{}", record.error);
        }
        assert_eq!(runner.session().get("Q1").map(<[RunRecord]>::len), Some(4));
    }
}
