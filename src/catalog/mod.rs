/// Built-in SPARQL query sets per dataset and category
pub mod dbpedia;
pub mod generic;
pub mod lubm;

use crate::core::config::QueriesConfig;
use crate::SparqlBenchError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    #[serde(rename = "LUBM")]
    Lubm,
    #[serde(rename = "BSBM")]
    Bsbm,
    #[serde(rename = "DBpedia")]
    Dbpedia,
    #[serde(rename = "YAGO")]
    Yago,
    Custom,
}

impl Dataset {
    pub fn all() -> &'static [Dataset] {
        &[Dataset::Lubm, Dataset::Bsbm, Dataset::Dbpedia, Dataset::Yago, Dataset::Custom]
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::Lubm => "LUBM",
            Dataset::Bsbm => "BSBM",
            Dataset::Dbpedia => "DBpedia",
            Dataset::Yago => "YAGO",
            Dataset::Custom => "Custom",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lubm" => Ok(Dataset::Lubm),
            "bsbm" => Ok(Dataset::Bsbm),
            "dbpedia" => Ok(Dataset::Dbpedia),
            "yago" => Ok(Dataset::Yago),
            "custom" => Ok(Dataset::Custom),
            _ => Err(format!("Unknown dataset: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Simple,
    Join,
    Aggregation,
    Filter,
    /// OPTIONAL and UNION patterns
    Optional,
    Subquery,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Simple,
            Category::Join,
            Category::Aggregation,
            Category::Filter,
            Category::Optional,
            Category::Subquery,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Simple => "simple",
            Category::Join => "join",
            Category::Aggregation => "aggregation",
            Category::Filter => "filter",
            Category::Optional => "optional",
            Category::Subquery => "subquery",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Category::Simple),
            "join" => Ok(Category::Join),
            "aggregation" => Ok(Category::Aggregation),
            "filter" => Ok(Category::Filter),
            "optional" | "union" => Ok(Category::Optional),
            "subquery" => Ok(Category::Subquery),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Lookup over the built-in query sets
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryCatalog;

impl QueryCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Queries of one category, keyed by display name. BSBM, YAGO and Custom
    /// share the generic set.
    pub fn queries_for(&self, dataset: Dataset, category: Category) -> IndexMap<String, String> {
        let (prefix, queries) = match dataset {
            Dataset::Lubm => (lubm::PREFIX, lubm::queries(category)),
            Dataset::Dbpedia => (dbpedia::PREFIX, dbpedia::queries(category)),
            Dataset::Bsbm | Dataset::Yago | Dataset::Custom => (generic::PREFIX, generic::queries(category)),
        };

        queries
            .iter()
            .map(|(name, body)| (name.to_string(), format!("{}\n{}", prefix, body)))
            .collect()
    }

    /// Every category of `dataset`, in category order
    pub fn all_queries(&self, dataset: Dataset) -> IndexMap<String, String> {
        self.select(dataset, Category::all())
    }

    pub fn select(&self, dataset: Dataset, categories: &[Category]) -> IndexMap<String, String> {
        let mut selected = IndexMap::new();
        for category in categories {
            selected.extend(self.queries_for(dataset, *category));
        }
        selected
    }

    /// The query set described by a `[queries]` config section. A custom
    /// file, when given, replaces the built-in sets entirely.
    pub fn from_config(&self, config: &QueriesConfig) -> crate::Result<IndexMap<String, String>> {
        match &config.custom_file {
            Some(path) => load_custom_queries(path),
            None => Ok(self.select(config.dataset, &config.categories)),
        }
    }
}

/// Read a TOML table of `name = "query text"` pairs
pub fn load_custom_queries<P: AsRef<Path>>(path: P) -> crate::Result<IndexMap<String, String>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let queries: IndexMap<String, String> = toml::from_str(&contents)
        .map_err(|e| SparqlBenchError::Parse(format!("Failed to parse query file {}: {}", path.display(), e)))?;

    if queries.is_empty() {
        return Err(SparqlBenchError::InvalidInput(format!(
            "No queries found in {}",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), count = queries.len(), "loaded custom queries");
    Ok(queries)
}
