//! CPU load chart.
//!
//! Load is roughly how many processes are executing or waiting to execute
//! on a CPU. Load above the core count means processes are waiting.

use crate::core::config::SamplerParams;
use crate::core::system_monitor::handles::{ChartHandle, ValueFormat};
use crate::core::system_monitor::series::BoundedSeries;
use crate::core::system_monitor::sources::MetricSource;
use crate::error::Result;

use super::{publish, Sampler};

pub struct LoadSampler {
    source: Box<dyn MetricSource>,
    chart: ChartHandle,
    params: SamplerParams,
    load1: BoundedSeries,
    load5: BoundedSeries,
    load15: BoundedSeries,
}

impl LoadSampler {
    pub fn new(source: Box<dyn MetricSource>, params: SamplerParams) -> Result<Self> {
        let chart = ChartHandle::new(" CPU Load (1min, 5min, 15min) ", ValueFormat::OneDecimal);
        chart.set_x_labels(params.x_labels());

        Ok(Self {
            source,
            chart,
            params,
            load1: BoundedSeries::new(params.retention)?,
            load5: BoundedSeries::new(params.retention)?,
            load15: BoundedSeries::new(params.retention)?,
        })
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }
}

impl Sampler for LoadSampler {
    fn sample(&mut self) -> Result<()> {
        let load = self.source.load_average()?;

        self.load1.push(load.one);
        self.load5.push(load.five);
        self.load15.push(load.fifteen);

        let smoothing = self.params.smoothing;
        publish(&self.chart, "15min", 124, &self.load15, smoothing);
        publish(&self.chart, "5min", 93, &self.load5, smoothing);
        publish(&self.chart, "1min", 87, &self.load1, smoothing);
        Ok(())
    }
}
