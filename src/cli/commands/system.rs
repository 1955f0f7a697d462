use crate::cli::formatter::print_stats_table;
use crate::core::metrics::MetricsSampler;
use crate::utils::format::format_memory_mb;
use crate::utils::progress::create_spinner;
use clap::Args;
use humansize::{format_size, BINARY};
use std::time::Duration;

#[derive(Args)]
pub struct SystemArgs {
    /// Sample CPU and memory for this many seconds
    #[arg(long, value_name = "SECS")]
    pub monitor: Option<u64>,

    /// Sampling interval in milliseconds when monitoring
    #[arg(long, default_value = "500", value_name = "MS")]
    pub interval: u64,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SystemArgs) -> anyhow::Result<()> {
    let sampler = MetricsSampler::new();
    let info = sampler.system_info();

    let history = args.monitor.map(|secs| {
        let spinner = create_spinner(&format!("Sampling for {}s...", secs));
        let history = sampler.monitor(Duration::from_secs(secs), Duration::from_millis(args.interval.max(1)));
        spinner.finish_and_clear();
        history
    });

    if args.json {
        let value = serde_json::json!({ "system": info, "monitor": history });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let frequency = info
        .cpu_frequency_mhz
        .map_or_else(|| "N/A".to_string(), |mhz| format!("{} MHz", mhz));

    print_stats_table(
        "System",
        vec![
            ("OS", format!("{} ({})", info.os, info.arch)),
            ("CPU cores", format!("{} logical / {} physical", info.logical_cores, info.physical_cores)),
            ("CPU frequency", frequency),
            (
                "Memory",
                format!(
                    "{:.1} GB available of {:.1} GB ({:.1}% used)",
                    info.memory_available_gb, info.memory_total_gb, info.memory_used_percent
                ),
            ),
            ("Swap", format!("{:.1} GB ({:.1}% used)", info.swap_total_gb, info.swap_used_percent)),
            (
                "Disk",
                format!(
                    "{:.1} GB free of {:.1} GB ({:.1}% used)",
                    info.disk_free_gb, info.disk_total_gb, info.disk_used_percent
                ),
            ),
            (
                "Network",
                format!(
                    "{} sent / {} received",
                    format_size(info.network.bytes_sent, BINARY),
                    format_size(info.network.bytes_recv, BINARY)
                ),
            ),
        ],
    );

    if let Some(history) = history {
        print_stats_table(
            "Resource monitor",
            vec![
                ("Samples", history.samples.len().to_string()),
                ("Average CPU", format!("{:.1}%", history.average_cpu)),
                ("Max CPU", format!("{:.1}%", history.max_cpu)),
                ("Average memory", format_memory_mb(history.average_memory)),
                ("Max memory", format_memory_mb(history.max_memory)),
            ],
        );
    }

    Ok(())
}
