use crate::catalog::{Category, Dataset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engines: EnginesConfig,
    pub benchmark: BenchmarkConfig,
    pub timeouts: TimeoutConfig,
    pub queries: QueriesConfig,
}

/// One triple store under comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub label: String,
    pub endpoint: String,
}

impl Engine {
    pub fn new(label: &str, endpoint: &str) -> Self {
        Self {
            label: label.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginesConfig {
    pub a: Engine,
    pub b: Engine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Measured runs per engine per query
    pub iterations: u32,
    /// Discarded runs per engine before measuring (0 = none)
    pub warmup_iterations: u32,
    /// Worker pool size for the concurrent pass (1 = sequential only)
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub query_secs: u64,
    pub connectivity_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueriesConfig {
    pub dataset: Dataset,
    pub categories: Vec<Category>,
    /// TOML file of `name = "query"` pairs, used when dataset is Custom
    pub custom_file: Option<PathBuf>,
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            a: Engine::new("Virtuoso", "http://localhost:8890/sparql"),
            b: Engine::new("Jena Fuseki", "http://localhost:3030/dataset/query"),
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            warmup_iterations: 2,
            concurrency: 1,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            query_secs: 60,
            connectivity_secs: 5,
        }
    }
}

impl Default for QueriesConfig {
    fn default() -> Self {
        Self {
            dataset: Dataset::Lubm,
            categories: Category::all().to_vec(),
            custom_file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engines: EnginesConfig::default(),
            benchmark: BenchmarkConfig::default(),
            timeouts: TimeoutConfig::default(),
            queries: QueriesConfig::default(),
        }
    }
}

impl Config {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.query_secs)
    }

    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.connectivity_secs)
    }

    pub fn engines(&self) -> [Engine; 2] {
        [self.engines.a.clone(), self.engines.b.clone()]
    }
}

pub fn default_config() -> Config {
    Config::default()
}

/// `<config dir>/sparqlbench/config.toml`, if a config dir exists
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sparqlbench").join("config.toml"))
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::SparqlBenchError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::SparqlBenchError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::SparqlBenchError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::SparqlBenchError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Load an explicit config file, else the default location if present, else defaults
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config, crate::SparqlBenchError> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "loading default config");
            load_config(path)
        }
        _ => Ok(default_config()),
    }
}
