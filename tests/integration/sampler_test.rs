use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use poptop::core::config::{SamplerParams, WidgetKind};
use poptop::core::system_monitor::sources::{
    DiskCounters, InterfaceCounters, LoadAverage, MetricSource, ProcessSample,
};
use poptop::core::system_monitor::{
    has_data, SamplerSpawner, SourceFactory, WidgetCache, WidgetHandle,
};
use poptop::PoptopError;
use tokio::sync::{broadcast, mpsc};

/// Source whose counters climb steadily; fails after `budget` readings
struct SteadySource {
    ticks: Arc<AtomicU64>,
    budget: u64,
}

impl SteadySource {
    fn tick(&self) -> poptop::Result<u64> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        if tick >= self.budget {
            return Err(PoptopError::metric_source("device unplugged"));
        }
        Ok(tick)
    }
}

impl MetricSource for SteadySource {
    fn load_average(&mut self) -> poptop::Result<LoadAverage> {
        let tick = self.tick()? as f64;
        Ok(LoadAverage {
            one: tick,
            five: tick / 2.0,
            fifteen: tick / 4.0,
        })
    }

    fn cpu_percentages(&mut self) -> poptop::Result<Vec<f64>> {
        self.tick()?;
        Ok(vec![10.0, 20.0, 90.0])
    }

    fn network_counters(&mut self) -> poptop::Result<Vec<InterfaceCounters>> {
        let tick = self.tick()?;
        Ok(vec![InterfaceCounters {
            name: "eth0".to_string(),
            bytes_received: 1024 * (tick + 1),
            bytes_sent: 512 * (tick + 1),
        }])
    }

    fn disk_counters(&mut self) -> poptop::Result<DiskCounters> {
        let tick = self.tick()?;
        Ok(DiskCounters {
            read_ops: Some(tick),
            write_ops: Some(tick),
            read_bytes: tick * 4096,
            write_bytes: tick * 4096,
        })
    }

    fn processes(&mut self) -> poptop::Result<Vec<ProcessSample>> {
        self.tick()?;
        Ok(vec![ProcessSample {
            pid: 42,
            cpu_percent: 75.0,
            memory_percent: 5.0,
            command: "stress".to_string(),
        }])
    }
}

fn params() -> SamplerParams {
    SamplerParams {
        interval: Duration::from_millis(10),
        retention: 16,
        smoothing: 1,
        top_rows: 3,
    }
}

fn cache(budget: u64) -> (WidgetCache, mpsc::UnboundedReceiver<poptop::core::system_monitor::SamplerFailure>) {
    let (shutdown_tx, _) = broadcast::channel(1);
    let (failure_tx, failure_rx) = mpsc::unbounded_channel();
    let spawner = SamplerSpawner::new(tokio::runtime::Handle::current(), shutdown_tx, failure_tx);
    let sources: SourceFactory = Arc::new(move || {
        Box::new(SteadySource {
            ticks: Arc::new(AtomicU64::new(0)),
            budget,
        }) as Box<dyn MetricSource>
    });
    (WidgetCache::new(params(), sources, spawner), failure_rx)
}

async fn wait_for(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cpu_chart_fills_in_over_time() {
    let (mut cache, _failures) = cache(u64::MAX);
    let WidgetHandle::Chart(chart) = cache.resolve(WidgetKind::CpuPercent).unwrap() else {
        panic!("CPU % is a chart");
    };

    // No series exist until the first tick publishes them.
    wait_for(|| {
        let series = chart.snapshot().series;
        series.len() == 3
            && series
                .iter()
                .all(|s| s.values.iter().filter(|v| has_data(**v)).count() >= 3)
    })
    .await;

    let state = chart.snapshot();
    let latest = |name: &str| {
        state
            .series
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.values.last().copied())
            .unwrap()
    };
    assert_eq!(latest("min"), 10.0);
    assert_eq!(latest("max"), 90.0);
    assert_eq!(latest("avg"), 40.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_top_lists_fill_together() {
    let (mut cache, _failures) = cache(u64::MAX);
    let WidgetHandle::Text(cpu) = cache.resolve(WidgetKind::TopCpu).unwrap() else {
        panic!("Top CPU is a text panel");
    };
    let WidgetHandle::Text(memory) = cache.resolve(WidgetKind::TopMemory).unwrap() else {
        panic!("Top memory is a text panel");
    };
    assert_eq!(cache.samplers_started(), 1);

    wait_for(|| !cpu.snapshot().body.is_empty() && !memory.snapshot().body.is_empty()).await;
    assert_eq!(cpu.snapshot().body, " 75%  42     stress\n");
    assert_eq!(memory.snapshot().body, "  5%  42     stress\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_source_failure_is_reported() {
    let (mut cache, mut failures) = cache(3);
    cache.resolve(WidgetKind::NetworkIo).unwrap();

    let failure = tokio::time::timeout(Duration::from_secs(5), failures.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failure.widget, WidgetKind::NetworkIo);
    assert!(failure.error.to_string().contains("device unplugged"));
}
