/// Keyword-based complexity heuristic for SPARQL query text
///
/// Display only. The score is deterministic for identical input and makes no
/// attempt to parse the query.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ComplexityLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0 => ComplexityLevel::Low,
            1..=3 => ComplexityLevel::Medium,
            4..=6 => ComplexityLevel::High,
            _ => ComplexityLevel::VeryHigh,
        }
    }

    pub fn estimated_time(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "< 1 second",
            ComplexityLevel::Medium => "1-5 seconds",
            ComplexityLevel::High => "5-30 seconds",
            ComplexityLevel::VeryHigh => "> 30 seconds",
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplexityLevel::Low => "Low",
            ComplexityLevel::Medium => "Medium",
            ComplexityLevel::High => "High",
            ComplexityLevel::VeryHigh => "Very High",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityEstimate {
    pub score: u32,
    pub level: ComplexityLevel,
    /// Names of the features that contributed to the score, in weight order
    pub factors: Vec<&'static str>,
    pub estimated_time: &'static str,
}

/// More variables than this counts as join fan-out
const VARIABLE_FANOUT: usize = 10;

pub fn estimate_complexity(query: &str) -> ComplexityEstimate {
    let upper = query.to_uppercase();

    let rules: [(bool, u32, &'static str); 7] = [
        (
            upper.contains("JOIN") || query.matches('?').count() > VARIABLE_FANOUT,
            2,
            "Multiple joins",
        ),
        (upper.contains("GROUP BY"), 1, "Aggregation"),
        (upper.contains("ORDER BY"), 1, "Sorting"),
        (upper.contains("UNION"), 2, "Union"),
        (upper.contains("OPTIONAL"), 1, "Optional join"),
        (upper.contains("FILTER"), 1, "Filtering"),
        (upper.matches("SELECT").count() > 1, 3, "Subqueries"),
    ];

    let mut score = 0;
    let mut factors = Vec::new();
    for (hit, weight, name) in rules {
        if hit {
            score += weight;
            factors.push(name);
        }
    }

    let level = ComplexityLevel::from_score(score);
    ComplexityEstimate {
        score,
        level,
        factors,
        estimated_time: level.estimated_time(),
    }
}
