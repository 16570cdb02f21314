//! Widget cache.
//!
//! A widget's sampler starts the first time the widget is needed and keeps
//! running after it leaves the screen, so bringing it back shows the
//! history collected in the meantime.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::core::config::{SamplerParams, WidgetKind};
use crate::error::Result;

use super::handles::WidgetHandle;
use super::runtime::SamplerSpawner;
use super::sources::SourceFactory;
use super::tasks::{CpuSampler, DiskMode, DiskSampler, LoadSampler, NetworkSampler, Sampler, TopSampler};

/// Aborts the sampler task when the last widget using it is dropped.
struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

struct CachedWidget {
    handle: WidgetHandle,
    _task: Arc<TaskGuard>,
}

pub struct WidgetCache {
    entries: HashMap<WidgetKind, CachedWidget>,
    params: SamplerParams,
    sources: SourceFactory,
    spawner: SamplerSpawner,
    samplers_started: usize,
}

impl WidgetCache {
    pub fn new(params: SamplerParams, sources: SourceFactory, spawner: SamplerSpawner) -> Self {
        Self {
            entries: HashMap::new(),
            params,
            sources,
            spawner,
            samplers_started: 0,
        }
    }

    /// Handle for `kind`, starting its sampler on first use.
    pub fn resolve(&mut self, kind: WidgetKind) -> Result<WidgetHandle> {
        if let Some(cached) = self.entries.get(&kind) {
            log::debug!("Widget cache hit for {}", kind.label());
            return Ok(cached.handle.clone());
        }

        log::debug!("Widget cache miss for {}, starting sampler", kind.label());
        let source = (self.sources)();
        let params = self.params;

        let (sampler, handle): (Box<dyn Sampler>, WidgetHandle) = match kind {
            WidgetKind::CpuLoad => {
                let sampler = LoadSampler::new(source, params)?;
                let handle = WidgetHandle::Chart(sampler.chart().clone());
                (Box::new(sampler), handle)
            }
            WidgetKind::CpuPercent => {
                let sampler = CpuSampler::new(source, params)?;
                let handle = WidgetHandle::Chart(sampler.chart().clone());
                (Box::new(sampler), handle)
            }
            WidgetKind::NetworkIo => {
                let sampler = NetworkSampler::new(source, params)?;
                let handle = WidgetHandle::Chart(sampler.chart().clone());
                (Box::new(sampler), handle)
            }
            WidgetKind::DiskIops | WidgetKind::DiskIo => {
                let mode = if kind == WidgetKind::DiskIops {
                    DiskMode::Iops
                } else {
                    DiskMode::Throughput
                };
                let sampler = DiskSampler::new(mode, source, params)?;
                let handle = WidgetHandle::Chart(sampler.chart().clone());
                (Box::new(sampler), handle)
            }
            WidgetKind::TopCpu | WidgetKind::TopMemory => {
                return Ok(self.start_top_pair(kind, TopSampler::new(source, params)));
            }
        };

        let task = self.spawner.spawn(kind, params.interval, sampler);
        self.samplers_started += 1;
        self.entries.insert(
            kind,
            CachedWidget {
                handle: handle.clone(),
                _task: Arc::new(TaskGuard(task)),
            },
        );
        Ok(handle)
    }

    // Both top lists read one process snapshot, so they are cached together.
    fn start_top_pair(&mut self, kind: WidgetKind, sampler: TopSampler) -> WidgetHandle {
        let cpu = WidgetHandle::Text(sampler.cpu_panel().clone());
        let memory = WidgetHandle::Text(sampler.memory_panel().clone());

        let task = Arc::new(TaskGuard(self.spawner.spawn(
            kind,
            self.params.top_interval(),
            Box::new(sampler),
        )));
        self.samplers_started += 1;

        self.entries.insert(
            WidgetKind::TopCpu,
            CachedWidget {
                handle: cpu.clone(),
                _task: task.clone(),
            },
        );
        self.entries.insert(
            WidgetKind::TopMemory,
            CachedWidget {
                handle: memory.clone(),
                _task: task,
            },
        );

        if kind == WidgetKind::TopCpu {
            cpu
        } else {
            memory
        }
    }

    pub fn resolve_all(&mut self, kinds: &[WidgetKind]) -> Result<Vec<WidgetHandle>> {
        kinds.iter().map(|kind| self.resolve(*kind)).collect()
    }

    pub fn contains(&self, kind: WidgetKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of sampler tasks started so far.
    pub fn samplers_started(&self) -> usize {
        self.samplers_started
    }
}
