//! Disk activity charts.
//!
//! IOPS is the simpler measure when many processes share the disk; byte
//! throughput is better when one heavy writer or reader dominates.

use crate::core::config::SamplerParams;
use crate::core::system_monitor::handles::{ChartHandle, ValueFormat};
use crate::core::system_monitor::series::BoundedSeries;
use crate::core::system_monitor::sources::{DiskCounters, MetricSource};
use crate::error::Result;

use super::{publish, CounterRate, Sampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskMode {
    /// Operations per second
    Iops,
    /// KiB per second
    Throughput,
}

impl DiskMode {
    fn title(self) -> &'static str {
        match self {
            DiskMode::Iops => " Disk IOPS (read, write) ",
            DiskMode::Throughput => " Disk IO (KiB/s) (read, write) ",
        }
    }

    /// (read, write) counters and the divisor applied to their rates.
    fn readings(self, counters: &DiskCounters) -> Option<(u64, u64, f64)> {
        match self {
            DiskMode::Iops => Some((counters.read_ops?, counters.write_ops?, 1.0)),
            DiskMode::Throughput => Some((counters.read_bytes, counters.write_bytes, 1024.0)),
        }
    }
}

pub struct DiskSampler {
    mode: DiskMode,
    source: Box<dyn MetricSource>,
    chart: ChartHandle,
    params: SamplerParams,
    read: BoundedSeries,
    write: BoundedSeries,
    read_rate: CounterRate,
    write_rate: CounterRate,
}

impl DiskSampler {
    pub fn new(mode: DiskMode, source: Box<dyn MetricSource>, params: SamplerParams) -> Result<Self> {
        let chart = ChartHandle::new(mode.title(), ValueFormat::Whole);
        chart.set_x_labels(params.x_labels());

        Ok(Self {
            mode,
            source,
            chart,
            params,
            read: BoundedSeries::new(params.retention)?,
            write: BoundedSeries::new(params.retention)?,
            read_rate: CounterRate::new(params.samples_per_second()),
            write_rate: CounterRate::new(params.samples_per_second()),
        })
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }
}

impl Sampler for DiskSampler {
    fn sample(&mut self) -> Result<()> {
        let counters = self.source.disk_counters()?;
        let Some((read, write, divisor)) = self.mode.readings(&counters) else {
            log::debug!("Disk operation counts are not available on this platform");
            return Ok(());
        };

        if let Some(rate) = self.read_rate.next(read) {
            self.read.push(rate / divisor);
        }
        if let Some(rate) = self.write_rate.next(write) {
            self.write.push(rate / divisor);
        }

        let smoothing = self.params.smoothing;
        publish(&self.chart, "write", 196, &self.write, smoothing);
        publish(&self.chart, "read", 33, &self.read, smoothing);
        Ok(())
    }
}
