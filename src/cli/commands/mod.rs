pub mod check;
pub mod queries;
pub mod run;
pub mod summarize;
pub mod system;
pub mod validate;

use crate::core::config::{Config, Engine};
use clap::Args;

/// Endpoint overrides shared by `run` and `check`
#[derive(Args, Debug, Default, Clone)]
pub struct EngineArgs {
    /// Label of the first engine
    #[arg(long, value_name = "LABEL")]
    pub label_a: Option<String>,

    /// SPARQL endpoint of the first engine
    #[arg(long, value_name = "URL", env = "SPARQLBENCH_ENDPOINT_A")]
    pub endpoint_a: Option<String>,

    /// Label of the second engine
    #[arg(long, value_name = "LABEL")]
    pub label_b: Option<String>,

    /// SPARQL endpoint of the second engine
    #[arg(long, value_name = "URL", env = "SPARQLBENCH_ENDPOINT_B")]
    pub endpoint_b: Option<String>,
}

impl EngineArgs {
    pub fn apply(&self, config: &mut Config) {
        apply_engine(&mut config.engines.a, &self.label_a, &self.endpoint_a);
        apply_engine(&mut config.engines.b, &self.label_b, &self.endpoint_b);
    }
}

fn apply_engine(engine: &mut Engine, label: &Option<String>, endpoint: &Option<String>) {
    if let Some(label) = label {
        engine.label = label.clone();
    }
    if let Some(endpoint) = endpoint {
        engine.endpoint = endpoint.clone();
    }
}
