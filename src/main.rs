use clap::Parser;
use colored::*;
use sparqlbench::cli::{commands, formatter, Cli, Commands};
use sparqlbench::core::config::resolve_config;
use sparqlbench::SparqlBenchError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // SPARQLBENCH_LOG wins; -v raises the fallback level
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("SPARQLBENCH_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    formatter::init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<SparqlBenchError>() {
            Some(SparqlBenchError::Config(_)) => 2,
            Some(SparqlBenchError::Io(_)) => 3,
            Some(SparqlBenchError::Parse(_)) => 4,
            Some(SparqlBenchError::Network(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => commands::run::run(args, resolve_config(cli.config.as_deref())?),
        Commands::Check(args) => commands::check::run(args, resolve_config(cli.config.as_deref())?),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Queries(args) => commands::queries::run(args),
        Commands::Summarize(args) => commands::summarize::run(args),
        Commands::System(args) => commands::system::run(args),
    }
}
