use crate::cli::commands::EngineArgs;
use crate::cli::formatter::{print_error, print_section, print_success, print_warning};
use crate::core::config::Config;
use crate::core::executor::{ConnectivityStatus, EndpointCheck, QueryExecutor};
use crate::core::validation::validate_endpoint_url;
use crate::SparqlBenchError;
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub engines: EngineArgs,

    /// Probe timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CheckArgs, mut config: Config) -> anyhow::Result<()> {
    args.engines.apply(&mut config);
    if let Some(secs) = args.timeout {
        config.timeouts.connectivity_secs = secs;
    }

    let checks = probe_engines(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
    } else {
        print_section("Endpoint connectivity");
        for check in &checks {
            print_check(check);
        }
    }

    ensure_online(&checks)
}

/// Probe both configured engines with the connectivity timeout
pub fn probe_engines(config: &Config) -> crate::Result<Vec<EndpointCheck>> {
    let executor = QueryExecutor::new()?.with_timeout(config.connectivity_timeout());
    Ok(executor.check_endpoints(&config.engines()))
}

pub fn print_check(check: &EndpointCheck) {
    let status = match check.report.status {
        ConnectivityStatus::Online => check.report.status.to_string().green().bold(),
        ConnectivityStatus::Error => check.report.status.to_string().yellow().bold(),
        ConnectivityStatus::Offline => check.report.status.to_string().red().bold(),
    };

    println!("  {} {} ({})", status, check.engine.label.bold(), check.engine.endpoint.dimmed());

    if let Some(warning) = validate_endpoint_url(&check.engine.endpoint).warning {
        print_warning(&warning);
    }

    match &check.details {
        Some(details) => println!(
            "    response time {:.1} ms, {} triples",
            details.response_time_ms,
            details.triple_count.as_deref().unwrap_or("N/A")
        ),
        None => println!("    {}", check.report.details.dimmed()),
    }
}

pub fn ensure_online(checks: &[EndpointCheck]) -> anyhow::Result<()> {
    let down: Vec<&str> = checks
        .iter()
        .filter(|c| c.report.status != ConnectivityStatus::Online)
        .map(|c| c.engine.label.as_str())
        .collect();

    if down.is_empty() {
        print_success("All endpoints reachable");
        Ok(())
    } else {
        let message = format!("Unreachable: {}", down.join(", "));
        print_error(&message);
        Err(SparqlBenchError::Network(message).into())
    }
}
