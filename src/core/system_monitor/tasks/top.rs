//! Top CPU and top memory process lists.
//!
//! Both lists come from the same process snapshot, so one sampler feeds
//! both panels.

use std::cmp::Ordering;

use crate::core::config::SamplerParams;
use crate::core::system_monitor::handles::TextHandle;
use crate::core::system_monitor::sources::{MetricSource, ProcessSample};
use crate::error::Result;

use super::Sampler;

pub struct TopSampler {
    source: Box<dyn MetricSource>,
    rows: usize,
    cpu_panel: TextHandle,
    memory_panel: TextHandle,
}

impl TopSampler {
    pub fn new(source: Box<dyn MetricSource>, params: SamplerParams) -> Self {
        Self {
            source,
            rows: params.top_rows,
            cpu_panel: TextHandle::new(" Top CPU Processes (%, pid, command) "),
            memory_panel: TextHandle::new(" Top Memory Processes (%, pid, command) "),
        }
    }

    pub fn cpu_panel(&self) -> &TextHandle {
        &self.cpu_panel
    }

    pub fn memory_panel(&self) -> &TextHandle {
        &self.memory_panel
    }
}

/// Highest `rows` processes by `key`, formatted one per line.
pub fn format_top_lines(
    processes: &mut [ProcessSample],
    rows: usize,
    key: impl Fn(&ProcessSample) -> f64,
) -> String {
    processes.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));

    processes
        .iter()
        .take(rows)
        .map(|p| format!("{:3.0}%  {:<5}  {}\n", key(p), p.pid, p.command))
        .collect()
}

impl Sampler for TopSampler {
    fn sample(&mut self) -> Result<()> {
        let mut processes = self.source.processes()?;

        self.cpu_panel
            .replace(format_top_lines(&mut processes, self.rows, |p| p.cpu_percent));
        self.memory_panel
            .replace(format_top_lines(&mut processes, self.rows, |p| p.memory_percent));
        Ok(())
    }
}
