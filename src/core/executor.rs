/// SPARQL query execution against HTTP endpoints
///
/// `QueryExecutor` is the boundary between the benchmark and the network: it
/// issues one query with a timeout and always answers with a structured
/// outcome. Transport failures are flattened into the outcome's `error` field
/// and never returned as `Err`.
use crate::core::config::Engine;
use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimal probe used by connectivity checks
pub const PROBE_QUERY: &str = "SELECT ?s WHERE { ?s ?p ?o } LIMIT 1";

/// Triple count query used by the detailed connectivity probe
pub const COUNT_QUERY: &str = "SELECT (COUNT(*) AS ?count) WHERE { ?s ?p ?o . }";

const SPARQL_RESULTS_ACCEPT: &str = "application/sparql-results+json, application/json;q=0.9";
const MAX_ERROR_BODY: usize = 512;

/// Failure raised by a transport. Never escapes `QueryExecutor::execute`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("transport panicked: {0}")]
    Panicked(String),
}

impl TransportError {
    /// True when the endpoint could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connection(_))
    }
}

/// Sends one SPARQL query to one endpoint and returns the decoded JSON results
#[cfg_attr(test, mockall::automock)]
pub trait SparqlTransport: Send + Sync {
    fn query(&self, endpoint: &str, query: &str, timeout: Duration) -> Result<Value, TransportError>;
}

/// SPARQL protocol over HTTP GET using `reqwest`
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("sparqlbench/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(DEFAULT_CONNECTIVITY_TIMEOUT)
            .build()
            .map_err(|e| crate::SparqlBenchError::Network(e.to_string()))?;

        Ok(Self { client })
    }
}

impl SparqlTransport for HttpTransport {
    fn query(&self, endpoint: &str, query: &str, timeout: Duration) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(endpoint)
            .query(&[("query", query)])
            .header(ACCEPT, SPARQL_RESULTS_ACCEPT)
            .timeout(timeout)
            .send()
            .map_err(|e| classify_reqwest_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().unwrap_or_default();
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .map_err(|e| classify_reqwest_error(e, timeout))
    }
}

fn classify_reqwest_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Structured result of one query execution
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub success: bool,
    pub result_count: usize,
    pub error: String,
    #[serde(skip)]
    pub raw_results: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityStatus {
    Online,
    Error,
    Offline,
}

impl std::fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectivityStatus::Online => write!(f, "online"),
            ConnectivityStatus::Error => write!(f, "error"),
            ConnectivityStatus::Offline => write!(f, "offline"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityReport {
    pub status: ConnectivityStatus,
    pub message: String,
    pub details: String,
}

/// Extra information gathered from an endpoint that answered the probe
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDetails {
    pub response_time_ms: f64,
    /// Triple count as reported by the endpoint, if it answered the count query
    pub triple_count: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointCheck {
    pub engine: Engine,
    pub report: ConnectivityReport,
    pub details: Option<EndpointDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxCheck {
    pub valid: bool,
    pub error: String,
}

impl SyntaxCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            error: String::new(),
        }
    }

    fn invalid(error: &str) -> Self {
        Self {
            valid: false,
            error: error.to_string(),
        }
    }
}

pub struct QueryExecutor {
    timeout: Duration,
    transport: Box<dyn SparqlTransport>,
}

impl QueryExecutor {
    /// Executor over HTTP with the default 60s timeout
    pub fn new() -> crate::Result<Self> {
        Ok(Self::with_transport(Box::new(HttpTransport::new()?)))
    }

    pub fn with_transport(transport: Box<dyn SparqlTransport>) -> Self {
        Self {
            timeout: DEFAULT_QUERY_TIMEOUT,
            transport,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Change the timeout used by all subsequent calls
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
        tracing::info!(timeout_secs = timeout.as_secs_f64(), "query timeout updated");
    }

    /// One transport call. A panicking transport is reported as an error.
    fn call(&self, endpoint: &str, query: &str) -> Result<Value, TransportError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.transport.query(endpoint, query, self.timeout)))
            .unwrap_or_else(|payload| Err(TransportError::Panicked(panic_message(payload.as_ref()))))
    }

    /// Execute `query` against `endpoint`. Never fails: transport errors and
    /// panics come back as `success = false` with the message in `error`.
    pub fn execute(&self, endpoint: &str, query: &str) -> QueryOutcome {
        match self.call(endpoint, query) {
            Ok(results) => QueryOutcome {
                success: true,
                result_count: count_bindings(&results),
                error: String::new(),
                raw_results: Some(results),
            },
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "query execution failed");
                QueryOutcome {
                    success: false,
                    result_count: 0,
                    error: e.to_string(),
                    raw_results: None,
                }
            }
        }
    }

    /// Probe an endpoint with a one-row query
    pub fn test_connectivity(&self, endpoint: &str) -> ConnectivityReport {
        match self.call(endpoint, PROBE_QUERY) {
            Ok(_) => ConnectivityReport {
                status: ConnectivityStatus::Online,
                message: "Online".to_string(),
                details: "Probe query succeeded".to_string(),
            },
            Err(e) if e.is_unreachable() => ConnectivityReport {
                status: ConnectivityStatus::Offline,
                message: format!("Offline: {}", e),
                details: e.to_string(),
            },
            Err(e) => ConnectivityReport {
                status: ConnectivityStatus::Error,
                message: format!("Error: {}", e),
                details: e.to_string(),
            },
        }
    }

    /// Count the endpoint's triples and time the round trip
    pub fn detailed_connectivity(&self, endpoint: &str) -> EndpointDetails {
        let start = Instant::now();
        let outcome = self.execute(endpoint, COUNT_QUERY);
        let response_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let triple_count = outcome
            .raw_results
            .as_ref()
            .and_then(|raw| raw.pointer("/results/bindings/0/count/value"))
            .and_then(Value::as_str)
            .map(str::to_string);

        EndpointDetails {
            response_time_ms,
            triple_count,
        }
    }

    /// Probe several endpoints in parallel. Results are in input order.
    pub fn check_endpoints(&self, engines: &[Engine]) -> Vec<EndpointCheck> {
        engines
            .par_iter()
            .map(|engine| {
                tracing::info!(engine = %engine.label, endpoint = %engine.endpoint, "testing connectivity");
                let report = self.test_connectivity(&engine.endpoint);
                let details = (report.status == ConnectivityStatus::Online)
                    .then(|| self.detailed_connectivity(&engine.endpoint));
                EndpointCheck {
                    engine: engine.clone(),
                    report,
                    details,
                }
            })
            .collect()
    }

    /// Advisory client-side checks; not a grammar.
    pub fn validate_query_syntax(&self, query: &str) -> SyntaxCheck {
        validate_query_syntax(query)
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

fn count_bindings(results: &Value) -> usize {
    results
        .get("results")
        .and_then(|r| r.get("bindings"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

/// Keyword and brace checks only. `SELECT` requires a literal `WHERE`.
pub fn validate_query_syntax(query: &str) -> SyntaxCheck {
    let upper = query.trim().to_uppercase();

    if upper.is_empty() {
        return SyntaxCheck::invalid("Empty query");
    }

    const QUERY_FORMS: [&str; 4] = ["SELECT", "ASK", "CONSTRUCT", "DESCRIBE"];
    if !QUERY_FORMS.iter().any(|form| upper.contains(form)) {
        return SyntaxCheck::invalid("Unrecognized query type (expected SELECT, ASK, CONSTRUCT or DESCRIBE)");
    }

    if upper.contains("SELECT") && !upper.contains("WHERE") {
        return SyntaxCheck::invalid("Missing WHERE clause for SELECT");
    }

    if query.matches('{').count() != query.matches('}').count() {
        return SyntaxCheck::invalid("Unbalanced braces");
    }

    SyntaxCheck::ok()
}
