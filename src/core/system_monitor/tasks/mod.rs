//! Per-widget samplers.
//!
//! Each sampler owns its metric source and its series, and is driven by its
//! own periodic task. Nothing here is shared between widgets.

mod cpu;
mod disks;
mod load;
mod network;
mod rate;
mod top;

pub use cpu::CpuSampler;
pub use disks::{DiskMode, DiskSampler};
pub use load::LoadSampler;
pub use network::{busiest_interface, NetworkSampler};
pub use rate::CounterRate;
pub use top::{format_top_lines, TopSampler};

use crate::error::Result;

use super::handles::ChartHandle;
use super::series::BoundedSeries;

/// One tick of a widget's sampling loop.
pub trait Sampler: Send {
    fn sample(&mut self) -> Result<()>;
}

fn publish(chart: &ChartHandle, name: &'static str, color: u8, series: &BoundedSeries, smoothing: usize) {
    chart.set_series(name, color, series.smoothed(smoothing));
}
