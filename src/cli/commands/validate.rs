use crate::cli::formatter::{print_error, print_stats_table, print_success};
use crate::core::complexity::estimate_complexity;
use crate::core::executor::validate_query_syntax;
use crate::SparqlBenchError;
use anyhow::Context;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Query text
    #[arg(value_name = "QUERY", required_unless_present = "file")]
    pub query: Option<String>,

    /// Read the query from a file instead
    #[arg(short, long, value_name = "FILE", conflicts_with = "query")]
    pub file: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let query = match (&args.query, &args.file) {
        (Some(query), _) => query.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(SparqlBenchError::Io)
            .with_context(|| format!("Failed to read query file {}", path.display()))?,
        (None, None) => return Err(SparqlBenchError::InvalidInput("No query given".to_string()).into()),
    };

    let check = validate_query_syntax(&query);
    let complexity = estimate_complexity(&query);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "syntax": check, "complexity": complexity }))?
        );
    } else {
        if check.valid {
            print_success("Query looks valid");
        } else {
            print_error(&check.error);
        }

        print_stats_table(
            "Complexity",
            vec![
                ("Score", complexity.score.to_string()),
                ("Level", complexity.level.to_string()),
                ("Estimated time", complexity.estimated_time.to_string()),
                ("Factors", complexity.factors.join(", ")),
            ],
        );
    }

    if check.valid {
        Ok(())
    } else {
        Err(SparqlBenchError::InvalidInput(check.error).into())
    }
}
