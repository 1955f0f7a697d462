use crate::catalog::{Category, Dataset, QueryCatalog};
use crate::cli::commands::check::{ensure_online, print_check, probe_engines};
use crate::cli::commands::EngineArgs;
use crate::cli::formatter::{info_box, print_section, print_success, print_warning};
use crate::core::config::Config;
use crate::core::executor::QueryExecutor;
use crate::core::metrics::MetricsSampler;
use crate::core::runner::BenchmarkRunner;
use crate::core::validation::validate_configuration;
use crate::report::{Format, Report, ReportGenerator};
use crate::utils::progress::create_progress_bar;
use crate::SparqlBenchError;
use clap::Args;
use indexmap::IndexMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub engines: EngineArgs,

    /// Measured iterations per engine per query
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Discarded warm-up iterations per engine per query
    #[arg(short, long)]
    pub warmup: Option<u32>,

    /// Worker pool size for the concurrent pass (1 disables it)
    #[arg(short = 'C', long)]
    pub concurrency: Option<usize>,

    /// Dataset whose query set to run
    #[arg(short, long)]
    pub dataset: Option<Dataset>,

    /// Query categories, comma separated
    #[arg(short = 't', long, value_delimiter = ',')]
    pub categories: Vec<Category>,

    /// TOML file of `name = "query"` pairs to run instead of the catalog
    #[arg(long, value_name = "FILE")]
    pub queries_file: Option<PathBuf>,

    /// Per-query timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Write results to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output file format (json, csv, markdown, text)
    #[arg(long, default_value = "json")]
    pub format: Format,

    /// Skip the connectivity check before running
    #[arg(long)]
    pub skip_check: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        self.engines.apply(config);

        if let Some(iterations) = self.iterations {
            config.benchmark.iterations = iterations;
        }
        if let Some(warmup) = self.warmup {
            config.benchmark.warmup_iterations = warmup;
        }
        if let Some(concurrency) = self.concurrency {
            config.benchmark.concurrency = concurrency;
        }
        if let Some(dataset) = self.dataset {
            config.queries.dataset = dataset;
        }
        if !self.categories.is_empty() {
            config.queries.categories = self.categories.clone();
        }
        if let Some(path) = &self.queries_file {
            config.queries.custom_file = Some(path.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeouts.query_secs = secs;
        }
    }
}

pub fn run(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);

    let validation = validate_configuration(&config);
    for warning in &validation.warnings {
        print_warning(warning);
    }
    if !validation.is_valid() {
        return Err(SparqlBenchError::Config(validation.errors.join("; ")).into());
    }

    let queries = QueryCatalog::new().from_config(&config.queries)?;
    if queries.is_empty() {
        return Err(SparqlBenchError::InvalidInput("No queries selected".to_string()).into());
    }

    if !args.skip_check {
        let checks = probe_engines(&config)?;
        for check in &checks {
            print_check(check);
        }
        ensure_online(&checks)?;
    }

    let [engine_a, engine_b] = config.engines();
    let executor = QueryExecutor::new()?.with_timeout(config.query_timeout());
    let mut runner = BenchmarkRunner::new(engine_a, engine_b, executor, MetricsSampler::new());

    let bench = &config.benchmark;
    let lines = [
        format!("{} vs {}", config.engines.a.label, config.engines.b.label),
        format!("{} queries from {}", queries.len(), describe_source(&config)),
        format!(
            "{} iterations, {} warm-up, concurrency {}",
            bench.iterations, bench.warmup_iterations, bench.concurrency
        ),
    ];
    let items: Vec<&str> = lines.iter().map(String::as_str).collect();
    info_box("Benchmark", &items);

    let started = Instant::now();
    run_queries(&mut runner, &queries, &config, args.quiet);
    tracing::info!(elapsed_secs = started.elapsed().as_secs_f64(), "run complete");

    let report = Report::from_session(runner.session());

    print_section("Results");
    print!("{}", ReportGenerator::new(Format::Text).generate(&report)?);

    if let Some(path) = &args.output {
        ReportGenerator::new(args.format).write(&report, path)?;
        print_success(&format!("Results written to {}", path.display()));
    }

    Ok(())
}

/// Warm-up, measured and (optionally) concurrent passes for every query
fn run_queries(runner: &mut BenchmarkRunner, queries: &IndexMap<String, String>, config: &Config, quiet: bool) {
    let bench = &config.benchmark;
    let steps_per_query = 1 + u64::from(bench.warmup_iterations > 0) + u64::from(bench.concurrency > 1);

    let pb = create_progress_bar(queries.len() as u64 * steps_per_query, "Benchmarking", quiet);

    for (name, query) in queries {
        if bench.warmup_iterations > 0 {
            pb.set_message(format!("{} (warm-up)", name));
            runner.run_benchmark(name, query, bench.warmup_iterations, bench.warmup_iterations, true);
            pb.inc(1);
        }

        pb.set_message(name.clone());
        let records = runner.run_benchmark(name, query, bench.iterations, bench.warmup_iterations, false);
        let failures = records.iter().filter(|r| !r.success).count();
        if failures > 0 {
            tracing::warn!(query = %name, failures, "some executions failed");
        }
        pb.inc(1);

        if bench.concurrency > 1 {
            pb.set_message(format!("{} (concurrent)", name));
            runner.run_concurrent_benchmark(name, query, bench.iterations, bench.concurrency);
            pb.inc(1);
        }
    }

    pb.finish_and_clear();
}

fn describe_source(config: &Config) -> String {
    match &config.queries.custom_file {
        Some(path) => path.display().to_string(),
        None => {
            let categories: Vec<String> = config.queries.categories.iter().map(ToString::to_string).collect();
            format!("{} ({})", config.queries.dataset, categories.join(", "))
        }
    }
}
