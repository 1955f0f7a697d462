//! Shared fakes for sparqlbench integration tests
//!
//! Nothing here touches the network or reads host metrics, so the tests are
//! deterministic apart from wall-clock timings.
#![allow(dead_code)]

use serde_json::{json, Value};
use sparqlbench::core::config::Engine;
use sparqlbench::core::executor::{QueryExecutor, SparqlTransport, TransportError};
use sparqlbench::core::metrics::{MetricsSampler, ResourceProbe, ResourceReading};
use sparqlbench::BenchmarkRunner;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const ENDPOINT_A: &str = "http://localhost:8890/sparql";
pub const ENDPOINT_B: &str = "http://localhost:3030/dataset/query";
pub const QUERY: &str = "SELECT ?s WHERE { ?s ?p ?o } LIMIT 5";

pub fn bindings(n: usize) -> Value {
    let rows: Vec<Value> = (0..n).map(|i| json!({ "s": { "type": "uri", "value": format!("urn:{}", i) } })).collect();
    json!({ "head": { "vars": ["s"] }, "results": { "bindings": rows } })
}

/// Answers every query with a fixed number of rows after a fixed delay
pub struct FakeTransport {
    pub rows: usize,
    pub delay: Duration,
}

impl FakeTransport {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            delay: Duration::from_millis(1),
        }
    }
}

impl SparqlTransport for FakeTransport {
    fn query(&self, _endpoint: &str, _query: &str, _timeout: Duration) -> Result<Value, TransportError> {
        std::thread::sleep(self.delay);
        Ok(bindings(self.rows))
    }
}

/// Waits a little, then reports that the call timed out
pub struct TimeoutTransport {
    pub wait: Duration,
}

impl SparqlTransport for TimeoutTransport {
    fn query(&self, _endpoint: &str, _query: &str, timeout: Duration) -> Result<Value, TransportError> {
        std::thread::sleep(self.wait.min(timeout));
        Err(TransportError::Timeout(timeout))
    }
}

/// Fails only for one endpoint
pub struct SplitTransport {
    pub failing_endpoint: String,
}

impl SparqlTransport for SplitTransport {
    fn query(&self, endpoint: &str, _query: &str, _timeout: Duration) -> Result<Value, TransportError> {
        if endpoint == self.failing_endpoint {
            Err(TransportError::Http {
                status: 500,
                body: "internal error".to_string(),
            })
        } else {
            Ok(bindings(2))
        }
    }
}

/// Panics on every call
pub struct PanicTransport;

impl SparqlTransport for PanicTransport {
    fn query(&self, _endpoint: &str, _query: &str, _timeout: Duration) -> Result<Value, TransportError> {
        panic!("driver crashed");
    }
}

/// Records how many calls were in flight at once
#[derive(Default)]
pub struct InFlight {
    current: AtomicUsize,
    pub peak: AtomicUsize,
    pub calls: AtomicUsize,
}

pub struct TrackingTransport {
    pub tracker: Arc<InFlight>,
    pub delay: Duration,
}

impl SparqlTransport for TrackingTransport {
    fn query(&self, _endpoint: &str, _query: &str, _timeout: Duration) -> Result<Value, TransportError> {
        let now = self.tracker.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.tracker.peak.fetch_max(now, Ordering::SeqCst);
        self.tracker.calls.fetch_add(1, Ordering::SeqCst);

        std::thread::sleep(self.delay);

        self.tracker.current.fetch_sub(1, Ordering::SeqCst);
        Ok(bindings(1))
    }
}

/// Always reports the same host load
pub struct FixedProbe {
    pub cpu: f64,
    pub memory_mb: f64,
}

impl ResourceProbe for FixedProbe {
    fn read(&self) -> anyhow::Result<ResourceReading> {
        Ok(ResourceReading {
            cpu_percent: self.cpu,
            memory_used_mb: self.memory_mb,
            memory_percent: 25.0,
        })
    }
}

/// Every read fails
pub struct BrokenProbe;

impl ResourceProbe for BrokenProbe {
    fn read(&self) -> anyhow::Result<ResourceReading> {
        anyhow::bail!("no access to host metrics")
    }
}

pub fn engines() -> (Engine, Engine) {
    (Engine::new("Virtuoso", ENDPOINT_A), Engine::new("Jena Fuseki", ENDPOINT_B))
}

pub fn runner_with(transport: Box<dyn SparqlTransport>) -> BenchmarkRunner {
    let (a, b) = engines();
    BenchmarkRunner::new(
        a,
        b,
        QueryExecutor::with_transport(transport),
        MetricsSampler::with_probe(Box::new(FixedProbe {
            cpu: 10.0,
            memory_mb: 2048.0,
        })),
    )
}

pub fn fake_runner() -> BenchmarkRunner {
    runner_with(Box::new(FakeTransport::new(3)))
}
