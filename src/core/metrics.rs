/// System resource sampling around query executions
///
/// Metrics are diagnostic only: every read is best-effort and a failed read
/// degrades to a zeroed snapshot instead of failing the benchmark.
use crate::utils::format::safe_divide;
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use sysinfo::{Disks, Networks, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Raw reading from a resource probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceReading {
    pub cpu_percent: f64,
    pub memory_used_mb: f64,
    pub memory_percent: f64,
}

/// Source of instantaneous system readings
pub trait ResourceProbe: Send + Sync {
    fn read(&self) -> Result<ResourceReading>;

    fn system_info(&self) -> Result<SystemInfo> {
        Err(anyhow!("system information not available from this probe"))
    }
}

/// Probe backed by `sysinfo`
pub struct SysinfoProbe {
    system: Mutex<System>,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        // CPU usage is computed between refreshes; prime the first one
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl ResourceProbe for SysinfoProbe {
    fn read(&self) -> Result<ResourceReading> {
        let mut system = self.system.lock();
        system.refresh_cpu_usage();
        system.refresh_memory();

        let total = system.total_memory();
        if total == 0 {
            return Err(anyhow!("total memory reported as zero"));
        }
        let used = system.used_memory();

        Ok(ResourceReading {
            cpu_percent: system.global_cpu_usage() as f64,
            memory_used_mb: used as f64 / BYTES_PER_MB,
            memory_percent: percent(used, total),
        })
    }

    fn system_info(&self) -> Result<SystemInfo> {
        let mut system = self.system.lock();
        system.refresh_all();

        let total_memory = system.total_memory();
        let available_memory = system.available_memory();
        let total_swap = system.total_swap();

        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == std::path::Path::new("/"))
            .or_else(|| disks.list().first());
        let (disk_total, disk_free) = root
            .map(|disk| (disk.total_space(), disk.available_space()))
            .unwrap_or((0, 0));

        let networks = Networks::new_with_refreshed_list();
        let mut network = NetworkTotals::default();
        for data in networks.list().values() {
            network.bytes_sent += data.total_transmitted();
            network.bytes_recv += data.total_received();
            network.packets_sent += data.total_packets_transmitted();
            network.packets_recv += data.total_packets_received();
        }

        Ok(SystemInfo {
            os: System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string()),
            arch: std::env::consts::ARCH.to_string(),
            logical_cores: num_cpus::get(),
            physical_cores: num_cpus::get_physical(),
            cpu_frequency_mhz: system.cpus().first().map(|cpu| cpu.frequency()),
            memory_total_gb: total_memory as f64 / BYTES_PER_GB,
            memory_available_gb: available_memory as f64 / BYTES_PER_GB,
            memory_used_percent: percent(total_memory.saturating_sub(available_memory), total_memory),
            swap_total_gb: total_swap as f64 / BYTES_PER_GB,
            swap_used_percent: percent(system.used_swap(), total_swap),
            disk_total_gb: disk_total as f64 / BYTES_PER_GB,
            disk_free_gb: disk_free as f64 / BYTES_PER_GB,
            disk_used_percent: percent(disk_total.saturating_sub(disk_free), disk_total),
            network,
        })
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    safe_divide(part as f64, whole as f64, 0.0) * 100.0
}

/// Point-in-time resource reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// CPU utilisation in percent
    pub cpu: f64,
    /// Used memory in MB
    pub memory: f64,
    pub memory_percent: f64,
    pub timestamp: DateTime<Utc>,
}

impl MetricsSnapshot {
    pub fn zeroed(timestamp: DateTime<Utc>) -> Self {
        Self {
            cpu: 0.0,
            memory: 0.0,
            memory_percent: 0.0,
            timestamp,
        }
    }
}

/// Difference between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourceDelta {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    /// Seconds between the two snapshots
    pub duration: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceHistory {
    pub samples: Vec<MetricsSnapshot>,
    pub duration: Duration,
    pub average_cpu: f64,
    pub average_memory: f64,
    pub max_cpu: f64,
    pub max_memory: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkTotals {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub logical_cores: usize,
    pub physical_cores: usize,
    pub cpu_frequency_mhz: Option<u64>,
    pub memory_total_gb: f64,
    pub memory_available_gb: f64,
    pub memory_used_percent: f64,
    pub swap_total_gb: f64,
    pub swap_used_percent: f64,
    pub disk_total_gb: f64,
    pub disk_free_gb: f64,
    pub disk_used_percent: f64,
    pub network: NetworkTotals,
}

pub struct MetricsSampler {
    probe: Box<dyn ResourceProbe>,
    baseline: MetricsSnapshot,
}

impl Default for MetricsSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSampler {
    pub fn new() -> Self {
        Self::with_probe(Box::new(SysinfoProbe::new()))
    }

    /// Sampler over a custom probe; takes the baseline snapshot immediately
    pub fn with_probe(probe: Box<dyn ResourceProbe>) -> Self {
        let mut sampler = Self {
            probe,
            baseline: MetricsSnapshot::zeroed(Utc::now()),
        };
        sampler.baseline = sampler.snapshot();
        sampler
    }

    /// Best-effort reading. Falls back to zeros stamped with the current time.
    pub fn snapshot(&self) -> MetricsSnapshot {
        match self.probe.read() {
            Ok(reading) => MetricsSnapshot {
                cpu: reading.cpu_percent,
                memory: reading.memory_used_mb,
                memory_percent: reading.memory_percent,
                timestamp: Utc::now(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to collect system metrics");
                MetricsSnapshot::zeroed(Utc::now())
            }
        }
    }

    pub fn delta(start: &MetricsSnapshot, end: &MetricsSnapshot) -> ResourceDelta {
        let elapsed = end.timestamp - start.timestamp;
        ResourceDelta {
            cpu_usage: end.cpu - start.cpu,
            memory_usage: end.memory - start.memory,
            duration: elapsed
                .num_microseconds()
                .map_or_else(|| elapsed.num_milliseconds() as f64 / 1e3, |us| us as f64 / 1e6),
        }
    }

    pub fn baseline(&self) -> MetricsSnapshot {
        self.baseline
    }

    pub fn update_baseline(&mut self) {
        self.baseline = self.snapshot();
        tracing::info!("baseline metrics updated");
    }

    pub fn system_info(&self) -> SystemInfo {
        self.probe.system_info().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read system information");
            SystemInfo::default()
        })
    }

    /// Sample every `interval` until `duration` has elapsed
    pub fn monitor(&self, duration: Duration, interval: Duration) -> ResourceHistory {
        let interval = interval.max(Duration::from_millis(1));
        let start = Instant::now();
        let mut samples = Vec::new();

        while start.elapsed() < duration {
            samples.push(self.snapshot());
            std::thread::sleep(interval);
        }

        summarize_history(samples, duration)
    }
}

fn summarize_history(samples: Vec<MetricsSnapshot>, duration: Duration) -> ResourceHistory {
    if samples.is_empty() {
        return ResourceHistory {
            duration,
            ..Default::default()
        };
    }

    let n = samples.len() as f64;
    let average_cpu = samples.iter().map(|s| s.cpu).sum::<f64>() / n;
    let average_memory = samples.iter().map(|s| s.memory).sum::<f64>() / n;
    let max_cpu = samples.iter().map(|s| s.cpu).fold(f64::NEG_INFINITY, f64::max);
    let max_memory = samples.iter().map(|s| s.memory).fold(f64::NEG_INFINITY, f64::max);

    ResourceHistory {
        samples,
        duration,
        average_cpu,
        average_memory,
        max_cpu,
        max_memory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SequenceProbe {
        calls: AtomicUsize,
    }

    impl ResourceProbe for SequenceProbe {
        fn read(&self) -> Result<ResourceReading> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as f64;
            Ok(ResourceReading {
                cpu_percent: 10.0 + n,
                memory_used_mb: 1000.0 + 10.0 * n,
                memory_percent: 25.0,
            })
        }
    }

    struct BrokenProbe;

    impl ResourceProbe for BrokenProbe {
        fn read(&self) -> Result<ResourceReading> {
            Err(anyhow!("permission denied"))
        }
    }

    #[test]
    fn test_baseline_taken_at_construction() {
        let sampler = MetricsSampler::with_probe(Box::new(SequenceProbe {
            calls: AtomicUsize::new(0),
        }));
        assert_eq!(sampler.baseline().cpu, 10.0);

        let next = sampler.snapshot();
        assert_eq!(next.cpu, 11.0);
        assert_eq!(next.memory, 1010.0);
    }

    #[test]
    fn test_update_baseline() {
        let mut sampler = MetricsSampler::with_probe(Box::new(SequenceProbe {
            calls: AtomicUsize::new(0),
        }));
        sampler.update_baseline();
        assert_eq!(sampler.baseline().cpu, 11.0);
    }

    #[test]
    fn test_failed_read_degrades_to_zero() {
        let sampler = MetricsSampler::with_probe(Box::new(BrokenProbe));
        let snapshot = sampler.snapshot();
        assert_eq!(snapshot.cpu, 0.0);
        assert_eq!(snapshot.memory, 0.0);
        assert_eq!(snapshot.memory_percent, 0.0);
        assert!(snapshot.timestamp <= Utc::now());

        assert_eq!(sampler.system_info(), SystemInfo::default());
    }

    #[test]
    fn test_delta_may_be_negative() {
        let t0 = Utc::now();
        let start = MetricsSnapshot {
            cpu: 40.0,
            memory: 2048.0,
            memory_percent: 50.0,
            timestamp: t0,
        };
        let end = MetricsSnapshot {
            cpu: 25.0,
            memory: 2050.5,
            memory_percent: 50.1,
            timestamp: t0 + chrono::Duration::milliseconds(1500),
        };

        let delta = MetricsSampler::delta(&start, &end);
        assert_eq!(delta.cpu_usage, -15.0);
        assert_eq!(delta.memory_usage, 2.5);
        assert!((delta.duration - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_monitor_collects_samples() {
        let sampler = MetricsSampler::with_probe(Box::new(SequenceProbe {
            calls: AtomicUsize::new(0),
        }));
        let history = sampler.monitor(Duration::from_millis(30), Duration::from_millis(5));

        assert!(!history.samples.is_empty());
        assert!(history.max_cpu >= history.average_cpu);
        assert!(history.max_memory >= history.average_memory);
    }

    #[test]
    fn test_monitor_zero_duration() {
        let sampler = MetricsSampler::with_probe(Box::new(BrokenProbe));
        let history = sampler.monitor(Duration::ZERO, Duration::from_millis(5));
        assert!(history.samples.is_empty());
        assert_eq!(history.average_cpu, 0.0);
        assert_eq!(history.max_memory, 0.0);
    }

    #[test]
    fn test_sysinfo_probe_reads() {
        let probe = SysinfoProbe::new();
        let reading = probe.read().unwrap();
        assert!(reading.memory_used_mb > 0.0);
        assert!(reading.memory_percent > 0.0 && reading.memory_percent <= 100.0);
    }
}
