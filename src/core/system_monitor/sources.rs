//! Host metric sources.
//!
//! Every call is synchronous and may fail. Samplers own their source, so
//! no state is shared between widgets.

use sysinfo::{CpuRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::error::{PoptopError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Cumulative counters for one network interface since boot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// Cumulative disk counters summed over physical disks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskCounters {
    /// Completed operations, when the platform reports them
    pub read_ops: Option<u64>,
    pub write_ops: Option<u64>,
    pub read_bytes: u64,
    pub write_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub command: String,
}

pub trait MetricSource: Send {
    fn load_average(&mut self) -> Result<LoadAverage>;

    /// Busy percentage of each logical core.
    ///
    /// Empty when there is nothing to report yet, such as before a baseline.
    fn cpu_percentages(&mut self) -> Result<Vec<f64>>;

    fn network_counters(&mut self) -> Result<Vec<InterfaceCounters>>;

    fn disk_counters(&mut self) -> Result<DiskCounters>;

    fn processes(&mut self) -> Result<Vec<ProcessSample>>;
}

/// Builds a fresh source for each sampler.
pub type SourceFactory = std::sync::Arc<dyn Fn() -> Box<dyn MetricSource> + Send + Sync>;

/// [`MetricSource`] backed by sysinfo, and procfs for Linux disk counters.
pub struct SysinfoSource {
    system: System,
    networks: Option<Networks>,
    #[cfg(not(target_os = "linux"))]
    disks: Option<sysinfo::Disks>,
    cpu_primed: bool,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            networks: None,
            #[cfg(not(target_os = "linux"))]
            disks: None,
            cpu_primed: false,
        }
    }

    pub fn factory() -> SourceFactory {
        std::sync::Arc::new(|| Box::new(SysinfoSource::new()) as Box<dyn MetricSource>)
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for SysinfoSource {
    fn load_average(&mut self) -> Result<LoadAverage> {
        let load = System::load_average();
        Ok(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn cpu_percentages(&mut self) -> Result<Vec<f64>> {
        self.system
            .refresh_cpu_specifics(CpuRefreshKind::nothing().with_cpu_usage());

        let cpus = self.system.cpus();
        if cpus.is_empty() {
            return Err(PoptopError::metric_source("no CPUs reported"));
        }
        // Usage is a delta between refreshes, the first one has nothing to compare to.
        if !self.cpu_primed {
            self.cpu_primed = true;
            return Ok(Vec::new());
        }
        Ok(cpus.iter().map(|cpu| cpu.cpu_usage() as f64).collect())
    }

    fn network_counters(&mut self) -> Result<Vec<InterfaceCounters>> {
        let networks = self
            .networks
            .get_or_insert_with(Networks::new_with_refreshed_list);
        networks.refresh(true);

        Ok(networks
            .iter()
            .map(|(name, data)| InterfaceCounters {
                name: name.to_string(),
                bytes_received: data.total_received(),
                bytes_sent: data.total_transmitted(),
            })
            .collect())
    }

    #[cfg(target_os = "linux")]
    fn disk_counters(&mut self) -> Result<DiskCounters> {
        let stats = procfs::diskstats()
            .map_err(|e| PoptopError::metric_source(format!("reading diskstats: {e}")))?;

        let mut counters = DiskCounters::default();
        let mut last_disk = String::new();
        let (mut read_ops, mut write_ops) = (0u64, 0u64);

        for stat in stats {
            let name = &stat.name;
            if name.starts_with("loop")
                || name.starts_with("ram")
                || name.starts_with("zram")
                || name.starts_with("dm-")
                || name.starts_with("md")
            {
                continue;
            }
            // Partitions are listed right after their disk and would be counted twice.
            if !last_disk.is_empty() && name.starts_with(&last_disk) {
                continue;
            }
            last_disk = name.clone();

            read_ops += stat.reads as u64;
            write_ops += stat.writes as u64;
            counters.read_bytes += stat.sectors_read as u64 * 512;
            counters.write_bytes += stat.sectors_written as u64 * 512;
        }

        counters.read_ops = Some(read_ops);
        counters.write_ops = Some(write_ops);
        Ok(counters)
    }

    #[cfg(not(target_os = "linux"))]
    fn disk_counters(&mut self) -> Result<DiskCounters> {
        let disks = self
            .disks
            .get_or_insert_with(sysinfo::Disks::new_with_refreshed_list);
        disks.refresh(true);

        let mut counters = DiskCounters::default();
        for disk in disks.list() {
            let usage = disk.usage();
            counters.read_bytes += usage.total_read_bytes;
            counters.write_bytes += usage.total_written_bytes;
        }
        Ok(counters)
    }

    fn processes(&mut self) -> Result<Vec<ProcessSample>> {
        self.system
            .refresh_memory_specifics(sysinfo::MemoryRefreshKind::nothing().with_ram());
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let total_memory = self.system.total_memory();
        if total_memory == 0 {
            return Err(PoptopError::metric_source("total memory reported as zero"));
        }

        Ok(self
            .system
            .processes()
            .values()
            .map(|process| ProcessSample {
                pid: process.pid().as_u32(),
                cpu_percent: process.cpu_usage() as f64,
                memory_percent: process.memory() as f64 / total_memory as f64 * 100.0,
                command: process.name().to_string_lossy().to_string(),
            })
            .collect())
    }
}
