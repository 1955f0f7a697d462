/// Pre-run configuration validation
///
/// The runner assumes it is handed a sane configuration; these checks run in
/// the CLI before a benchmark starts.
use crate::core::config::Config;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Iteration count above which a run is flagged as long
pub const MANY_ITERATIONS: u32 = 50;

/// Concurrency above which a run is flagged as likely to overload the host
pub const HIGH_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCheck {
    pub valid: bool,
    pub error: String,
    pub warning: Option<String>,
}

fn endpoint_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
            )
            .ok()
        })
        .as_ref()
}

pub fn validate_endpoint_url(url: &str) -> UrlCheck {
    if url.is_empty() {
        return UrlCheck {
            valid: false,
            error: "Empty URL".to_string(),
            warning: None,
        };
    }

    if !endpoint_pattern().is_some_and(|re| re.is_match(url)) {
        return UrlCheck {
            valid: false,
            error: "Invalid URL format".to_string(),
            warning: None,
        };
    }

    let lower = url.to_lowercase();
    let warning = (!["sparql", "query", "endpoint"].iter().any(|k| lower.contains(k)))
        .then(|| "URL does not look like a typical SPARQL endpoint".to_string());

    UrlCheck {
        valid: true,
        error: String::new(),
        warning,
    }
}

pub fn validate_configuration(config: &Config) -> ValidationReport {
    let mut report = ValidationReport::default();

    for engine in config.engines() {
        if engine.endpoint.is_empty() {
            report.errors.push(format!("{} endpoint missing", engine.label));
            continue;
        }

        let check = validate_endpoint_url(&engine.endpoint);
        if !check.valid {
            report
                .errors
                .push(format!("{} endpoint invalid: {}", engine.label, check.error));
        } else if let Some(warning) = check.warning {
            report.warnings.push(format!("{}: {}", engine.label, warning));
        }
    }

    if config.engines.a.label == config.engines.b.label {
        report
            .errors
            .push("Both engines share the same label; results could not be told apart".to_string());
    }

    if config.benchmark.iterations == 0 {
        report.errors.push("Number of iterations must be greater than 0".to_string());
    }

    if config.benchmark.iterations > MANY_ITERATIONS {
        report
            .warnings
            .push("A large number of iterations may take a long time".to_string());
    }

    if config.benchmark.concurrency > HIGH_CONCURRENCY {
        report
            .warnings
            .push("A high concurrency level may overload the system".to_string());
    }

    if config.queries.categories.is_empty() {
        report.errors.push("No query category selected".to_string());
    }

    report
}
