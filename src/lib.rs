pub mod catalog;
pub mod cli;
pub mod core;
pub mod report;
pub mod utils;

pub use crate::core::{
    aggregator::ResultAggregator,
    executor::QueryExecutor,
    metrics::MetricsSampler,
    record::RunRecord,
    runner::{BenchmarkRunner, BenchmarkSession},
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SparqlBenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for SparqlBenchError {
    fn from(err: serde_json::Error) -> Self {
        SparqlBenchError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for SparqlBenchError {
    fn from(err: toml::de::Error) -> Self {
        SparqlBenchError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for SparqlBenchError {
    fn from(err: toml::ser::Error) -> Self {
        SparqlBenchError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SparqlBenchError>;
