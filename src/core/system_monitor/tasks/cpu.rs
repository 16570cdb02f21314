//! CPU busy chart.
//!
//! Shows min, average and max busy percentage across cores, which reads
//! more easily than a single average or one line per core.

use crate::core::config::SamplerParams;
use crate::core::system_monitor::handles::{ChartHandle, ValueFormat};
use crate::core::system_monitor::series::BoundedSeries;
use crate::core::system_monitor::sources::MetricSource;
use crate::error::Result;

use super::{publish, Sampler};

pub struct CpuSampler {
    source: Box<dyn MetricSource>,
    chart: ChartHandle,
    params: SamplerParams,
    min: BoundedSeries,
    avg: BoundedSeries,
    max: BoundedSeries,
}

impl CpuSampler {
    pub fn new(source: Box<dyn MetricSource>, params: SamplerParams) -> Result<Self> {
        let chart = ChartHandle::new(" CPU (%) (min, avg, max) ", ValueFormat::Percent);
        chart.set_x_labels(params.x_labels());

        Ok(Self {
            source,
            chart,
            params,
            min: BoundedSeries::new(params.retention)?,
            avg: BoundedSeries::new(params.retention)?,
            max: BoundedSeries::new(params.retention)?,
        })
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }
}

/// Min, mean and max of `values`, or `None` when empty.
fn spread(values: &[f64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((min, mean, max))
}

impl Sampler for CpuSampler {
    fn sample(&mut self) -> Result<()> {
        let per_core = self.source.cpu_percentages()?;
        let Some((min, avg, max)) = spread(&per_core) else {
            log::debug!("No per-core CPU readings this tick");
            return Ok(());
        };

        self.min.push(min);
        self.avg.push(avg);
        self.max.push(max);

        let smoothing = self.params.smoothing;
        publish(&self.chart, "min", 33, &self.min, smoothing);
        publish(&self.chart, "max", 196, &self.max, smoothing);
        publish(&self.chart, "avg", 202, &self.avg, smoothing);
        Ok(())
    }
}
