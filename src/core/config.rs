use std::time::Duration;

use serde::Serialize;

use crate::core::system_monitor::{LayoutOptions, Orientation};
use crate::error::{PoptopError, Result};

pub const MIN_REDRAW_INTERVAL: Duration = Duration::from_millis(50);
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// Upper bound on samples kept per series.
pub const MAX_CHART_SAMPLES: usize = 100_000;

/// Process lists are point-in-time, so they are sampled less often than charts.
pub const TOP_INTERVAL_MULTIPLIER: u32 = 4;

/// A box of information on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum WidgetKind {
    CpuLoad = 0,
    CpuPercent = 1,
    NetworkIo = 2,
    DiskIops = 3,
    DiskIo = 4,
    TopCpu = 5,
    TopMemory = 6,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 7] = [
        WidgetKind::CpuLoad,
        WidgetKind::CpuPercent,
        WidgetKind::NetworkIo,
        WidgetKind::DiskIops,
        WidgetKind::DiskIo,
        WidgetKind::TopCpu,
        WidgetKind::TopMemory,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// The sibling sharing this widget's sampler, if any.
    pub fn coupled(self) -> Option<Self> {
        match self {
            WidgetKind::TopCpu => Some(WidgetKind::TopMemory),
            WidgetKind::TopMemory => Some(WidgetKind::TopCpu),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WidgetKind::CpuLoad => "CPU load",
            WidgetKind::CpuPercent => "CPU %",
            WidgetKind::NetworkIo => "Network IO",
            WidgetKind::DiskIops => "Disk IOPS",
            WidgetKind::DiskIo => "Disk IO",
            WidgetKind::TopCpu => "Top CPU",
            WidgetKind::TopMemory => "Top memory",
        }
    }
}

/// Dashboard configuration, owned by the driver.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Widgets in display order
    pub widgets: Vec<WidgetKind>,
    /// How often the whole terminal is repainted
    pub redraw_interval: Duration,
    /// How often each chart takes a new sample
    pub sample_interval: Duration,
    /// Width of the chart x axis in time
    pub chart_duration: Duration,
    /// Samples averaged into a single plotted point
    pub smoothing_samples: usize,
    pub tile: bool,
    pub orientation: Orientation,
    /// Rows shown in the top process lists
    pub top_rows: usize,
    // Set once a widget is selected explicitly, replacing the defaults.
    select_mode: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            widgets: vec![
                WidgetKind::CpuLoad,
                WidgetKind::CpuPercent,
                WidgetKind::NetworkIo,
                WidgetKind::DiskIops,
            ],
            redraw_interval: Duration::from_millis(500),
            sample_interval: Duration::from_millis(500),
            chart_duration: Duration::from_secs(120),
            smoothing_samples: 4,
            tile: false,
            orientation: Orientation::Stacked,
            top_rows: 25,
            select_mode: false,
        }
    }
}

impl DashboardConfig {
    /// Add a widget picked on the command line.
    ///
    /// The first call drops the default widget list.
    pub fn select_widget(&mut self, widget: WidgetKind) {
        if !self.select_mode {
            self.select_mode = true;
            self.widgets.clear();
        }
        if !self.widgets.contains(&widget) {
            self.widgets.push(widget);
        }
    }

    /// Add `widget` if absent, remove it if present.
    ///
    /// Returns false when removal would leave the dashboard empty.
    pub fn toggle_widget(&mut self, widget: WidgetKind) -> bool {
        match self.widgets.iter().position(|w| *w == widget) {
            Some(_) if self.widgets.len() == 1 => false,
            Some(index) => {
                self.widgets.remove(index);
                true
            }
            None => {
                self.widgets.push(widget);
                true
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.redraw_interval < MIN_REDRAW_INTERVAL {
            return Err(PoptopError::config(format!(
                "redraw interval of {}ms is likely to stress the system, use at least {}ms",
                self.redraw_interval.as_millis(),
                MIN_REDRAW_INTERVAL.as_millis()
            )));
        }
        if self.sample_interval < MIN_SAMPLE_INTERVAL {
            return Err(PoptopError::config(format!(
                "sample interval of {}ms is likely to stress the system, use at least {}ms",
                self.sample_interval.as_millis(),
                MIN_SAMPLE_INTERVAL.as_millis()
            )));
        }
        if self.chart_duration < self.sample_interval {
            return Err(PoptopError::config(
                "chart duration must cover at least one sample interval",
            ));
        }
        let samples = self
            .chart_duration
            .as_nanos()
            .div_ceil(self.sample_interval.as_nanos().max(1));
        if samples > MAX_CHART_SAMPLES as u128 {
            return Err(PoptopError::config(format!(
                "chart duration of {}s at a {}ms sample interval needs {} samples per series, at most {} are kept",
                self.chart_duration.as_secs(),
                self.sample_interval.as_millis(),
                samples,
                MAX_CHART_SAMPLES
            )));
        }
        // The moving average may not reach past the retained history.
        if self.smoothing_samples == 0 || self.smoothing_samples > self.num_samples() {
            return Err(PoptopError::InvalidWindow(self.smoothing_samples));
        }
        if self.top_rows == 0 {
            return Err(PoptopError::config("top process lists need at least one row"));
        }
        if self.widgets.is_empty() {
            return Err(PoptopError::NoWidgets);
        }
        Ok(())
    }

    /// Samples retained per series: chart duration over sample interval, rounded up.
    pub fn num_samples(&self) -> usize {
        let duration = self.chart_duration.as_nanos();
        let interval = self.sample_interval.as_nanos().max(1);
        duration.div_ceil(interval) as usize
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            orientation: self.orientation,
            tile: self.tile,
        }
    }

    pub fn sampler_params(&self) -> SamplerParams {
        SamplerParams {
            interval: self.sample_interval,
            retention: self.num_samples(),
            smoothing: self.smoothing_samples,
            top_rows: self.top_rows,
        }
    }
}

/// Immutable copy of the settings a sampler needs, taken when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerParams {
    pub interval: Duration,
    pub retention: usize,
    pub smoothing: usize,
    pub top_rows: usize,
}

impl SamplerParams {
    pub fn samples_per_second(&self) -> f64 {
        1.0 / self.interval.as_secs_f64()
    }

    pub fn top_interval(&self) -> Duration {
        self.interval * TOP_INTERVAL_MULTIPLIER
    }

    /// X axis labels: seconds since the left edge of the chart.
    pub fn x_labels(&self) -> Vec<String> {
        (0..self.retention)
            .map(|n| format!("{:.0}s", n as f64 * self.interval.as_secs_f64()))
            .collect()
    }
}
