//! Network throughput chart.
//!
//! Follows the interface that has received the most bytes since boot. When
//! a different interface takes the lead the chart starts over, so two
//! devices are never mixed into one series.

use crate::core::config::SamplerParams;
use crate::core::system_monitor::handles::{ChartHandle, ValueFormat};
use crate::core::system_monitor::series::BoundedSeries;
use crate::core::system_monitor::sources::{InterfaceCounters, MetricSource};
use crate::error::Result;

use super::{publish, CounterRate, Sampler};

const TITLE: &str = " Network IO (KiB/s) (send, recv) ";

/// The interface with the most bytes received, ignoring idle ones.
///
/// Ties keep the first interface listed.
pub fn busiest_interface(counters: &[InterfaceCounters]) -> Option<&InterfaceCounters> {
    counters
        .iter()
        .filter(|c| c.bytes_received > 0)
        .fold(None, |best: Option<&InterfaceCounters>, c| match best {
            Some(b) if b.bytes_received >= c.bytes_received => Some(b),
            _ => Some(c),
        })
}

pub struct NetworkSampler {
    source: Box<dyn MetricSource>,
    chart: ChartHandle,
    params: SamplerParams,
    device: Option<String>,
    sent: BoundedSeries,
    received: BoundedSeries,
    sent_rate: CounterRate,
    received_rate: CounterRate,
}

impl NetworkSampler {
    pub fn new(source: Box<dyn MetricSource>, params: SamplerParams) -> Result<Self> {
        let chart = ChartHandle::new(TITLE, ValueFormat::Whole);
        chart.set_x_labels(params.x_labels());

        Ok(Self {
            source,
            chart,
            params,
            device: None,
            sent: BoundedSeries::new(params.retention)?,
            received: BoundedSeries::new(params.retention)?,
            sent_rate: CounterRate::new(params.samples_per_second()),
            received_rate: CounterRate::new(params.samples_per_second()),
        })
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }

    /// Interface currently charted.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    fn switch_device(&mut self, name: &str) -> Result<()> {
        match &self.device {
            Some(old) => log::info!("Network device changed from {old} to {name}, restarting chart"),
            None => log::info!("Charting network device {name}"),
        }

        self.sent = BoundedSeries::new(self.params.retention)?;
        self.received = BoundedSeries::new(self.params.retention)?;
        self.sent_rate.reset();
        self.received_rate.reset();
        self.device = Some(name.to_string());
        self.chart
            .set_title(format!(" Network IO (KiB/s) on {name} (send, recv) "));
        Ok(())
    }
}

impl Sampler for NetworkSampler {
    fn sample(&mut self) -> Result<()> {
        let counters = self.source.network_counters()?;
        let Some(busiest) = busiest_interface(&counters) else {
            log::debug!("No network interface has received data yet");
            return Ok(());
        };

        if self.device.as_deref() != Some(busiest.name.as_str()) {
            self.switch_device(&busiest.name)?;
        }

        if let Some(rate) = self.sent_rate.next(busiest.bytes_sent) {
            self.sent.push(rate / 1024.0);
        }
        if let Some(rate) = self.received_rate.next(busiest.bytes_received) {
            self.received.push(rate / 1024.0);
        }

        let smoothing = self.params.smoothing;
        publish(&self.chart, "recv", 33, &self.received, smoothing);
        publish(&self.chart, "send", 196, &self.sent, smoothing);
        Ok(())
    }
}
