pub mod aggregator;
pub mod complexity;
pub mod config;
pub mod executor;
pub mod metrics;
pub mod record;
pub mod runner;
pub mod validation;

pub use aggregator::ResultAggregator;
pub use config::{Config, Engine};
pub use executor::QueryExecutor;
pub use metrics::MetricsSampler;
pub use record::RunRecord;
pub use runner::{BenchmarkRunner, BenchmarkSession};
