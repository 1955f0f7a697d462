pub mod commands;
pub mod formatter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sparqlbench",
    version,
    about = "Compare two SPARQL triple stores on the same query workload",
    long_about = "sparqlbench runs the same SPARQL queries against two endpoints, measures latency \
                  and host resource deltas for each execution, and summarizes which engine is \
                  faster, more stable and more reliable."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to <config dir>/sparqlbench/config.toml)
    #[arg(short, long, value_name = "FILE", env = "SPARQLBENCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the benchmark against both engines
    Run(commands::run::RunArgs),

    /// Check that both endpoints answer
    Check(commands::check::CheckArgs),

    /// Validate a query and estimate its complexity
    Validate(commands::validate::ValidateArgs),

    /// List catalog queries
    Queries(commands::queries::QueriesArgs),

    /// Summarize an exported results file
    Summarize(commands::summarize::SummarizeArgs),

    /// Show host system information
    System(commands::system::SystemArgs),
}
