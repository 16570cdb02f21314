//! Tokio runtime and periodic driver for sampler tasks.
//!
//! Every sampler runs in its own task on its own timer. All tasks listen to
//! one shutdown broadcast, and a failing sampler reports itself on a channel
//! instead of taking the process down.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::core::config::WidgetKind;
use crate::error::PoptopError;

use super::tasks::Sampler;

/// A sampler that stopped because its metric source failed.
#[derive(Debug)]
pub struct SamplerFailure {
    pub widget: WidgetKind,
    pub error: PoptopError,
}

/// Starts sampler tasks wired to the shared shutdown and failure channels.
#[derive(Debug, Clone)]
pub struct SamplerSpawner {
    handle: tokio::runtime::Handle,
    shutdown_tx: broadcast::Sender<()>,
    failure_tx: mpsc::UnboundedSender<SamplerFailure>,
}

impl SamplerSpawner {
    pub fn new(
        handle: tokio::runtime::Handle,
        shutdown_tx: broadcast::Sender<()>,
        failure_tx: mpsc::UnboundedSender<SamplerFailure>,
    ) -> Self {
        Self {
            handle,
            shutdown_tx,
            failure_tx,
        }
    }

    pub fn spawn(
        &self,
        widget: WidgetKind,
        period: Duration,
        sampler: Box<dyn Sampler>,
    ) -> JoinHandle<()> {
        self.handle.spawn(run_periodic(
            widget,
            period,
            sampler,
            self.shutdown_tx.subscribe(),
            self.failure_tx.clone(),
        ))
    }
}

/// Call `sampler` every `period` until shutdown or the first error.
///
/// Missed ticks are skipped rather than bunched up, so an overloaded
/// sampler only ever records the latest value. Each tick runs on the
/// blocking pool, so a slow or hung source stalls only its own widget.
pub async fn run_periodic(
    widget: WidgetKind,
    period: Duration,
    sampler: Box<dyn Sampler>,
    mut shutdown: broadcast::Receiver<()>,
    failure_tx: mpsc::UnboundedSender<SamplerFailure>,
) {
    log::info!("{} sampler started, every {:?}", widget.label(), period);

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut slot = Some(sampler);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.recv() => {
                log::info!("{} sampler shutting down", widget.label());
                break;
            }
        }

        // Every path that doesn't hand the sampler back ends the loop.
        let mut sampler = slot.take().expect("sampler returned by previous tick");
        let tick = tokio::task::spawn_blocking(move || {
            let result = sampler.sample();
            (sampler, result)
        });

        let result = tokio::select! {
            joined = tick => match joined {
                Ok((returned, result)) => {
                    slot = Some(returned);
                    result
                }
                Err(e) => Err(PoptopError::metric_source(format!("sampler panicked: {e}"))),
            },
            _ = shutdown.recv() => {
                // The tick in flight finishes on its own and is discarded.
                log::info!("{} sampler shutting down mid-sample", widget.label());
                break;
            }
        };

        if let Err(error) = result {
            log::error!("{} sampler failed: {}", widget.label(), error);
            // Only fails once the driver is gone, nobody is left to tell.
            let _ = failure_tx.send(SamplerFailure { widget, error });
            break;
        }
    }
}

/// Owns the runtime that all sampler tasks run on.
pub struct MetricsRuntime {
    spawner: SamplerSpawner,
    failure_rx: mpsc::UnboundedReceiver<SamplerFailure>,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl MetricsRuntime {
    pub fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("metrics-worker")
            .build()?;

        let (shutdown_tx, _) = broadcast::channel::<()>(1);
        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        let spawner = SamplerSpawner::new(runtime.handle().clone(), shutdown_tx.clone(), failure_tx);

        Ok(Self {
            spawner,
            failure_rx,
            shutdown_tx,
            runtime,
        })
    }

    pub fn spawner(&self) -> SamplerSpawner {
        self.spawner.clone()
    }

    /// First sampler failure reported since the last call, if any.
    pub fn try_failure(&mut self) -> Option<SamplerFailure> {
        self.failure_rx.try_recv().ok()
    }

    /// Signal every sampler to stop and wait briefly for them to exit.
    pub fn shutdown(self) {
        log::info!("Shutting down metrics runtime");
        // Fails only when no sampler is subscribed.
        let _ = self.shutdown_tx.send(());
        self.runtime.shutdown_timeout(Duration::from_millis(500));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::Result;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail_after: usize,
    }

    impl Sampler for Counting {
        fn sample(&mut self) -> Result<()> {
            let calls = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if calls > self.fail_after {
                return Err(PoptopError::metric_source("source went away"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_panicked() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (failure_tx, mut failure_rx) = mpsc::unbounded_channel();
        let spawner = SamplerSpawner::new(tokio::runtime::Handle::current(), shutdown_tx, failure_tx);

        let calls = Arc::new(AtomicUsize::new(0));
        let task = spawner.spawn(
            WidgetKind::DiskIo,
            Duration::from_millis(5),
            Box::new(Counting {
                calls: calls.clone(),
                fail_after: 2,
            }),
        );

        let failure = failure_rx.recv().await.unwrap();
        assert_eq!(failure.widget, WidgetKind::DiskIo);
        assert!(matches!(failure.error, PoptopError::MetricSource(_)));
        task.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    struct Stalling(Duration);

    impl Sampler for Stalling {
        fn sample(&mut self) -> Result<()> {
            std::thread::sleep(self.0);
            Ok(())
        }
    }

    struct Panicking;

    impl Sampler for Panicking {
        fn sample(&mut self) -> Result<()> {
            panic!("source blew up");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_samplers_do_not_starve_fast_ones() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (failure_tx, _failure_rx) = mpsc::unbounded_channel();
        let spawner =
            SamplerSpawner::new(tokio::runtime::Handle::current(), shutdown_tx.clone(), failure_tx);

        // One stalled sampler per worker thread.
        for widget in [WidgetKind::DiskIops, WidgetKind::DiskIo] {
            spawner.spawn(
                widget,
                Duration::from_millis(1),
                Box::new(Stalling(Duration::from_secs(2))),
            );
        }

        let calls = Arc::new(AtomicUsize::new(0));
        spawner.spawn(
            WidgetKind::CpuLoad,
            Duration::from_millis(10),
            Box::new(Counting {
                calls: calls.clone(),
                fail_after: usize::MAX,
            }),
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        let ticks = calls.load(Ordering::SeqCst);
        shutdown_tx.send(()).unwrap();
        assert!(ticks >= 10, "fast sampler only ticked {ticks} times");
    }

    #[tokio::test]
    async fn test_panicking_sampler_is_reported() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (failure_tx, mut failure_rx) = mpsc::unbounded_channel();
        let spawner = SamplerSpawner::new(tokio::runtime::Handle::current(), shutdown_tx, failure_tx);

        let task = spawner.spawn(WidgetKind::TopCpu, Duration::from_millis(5), Box::new(Panicking));

        let failure = failure_rx.recv().await.unwrap();
        assert_eq!(failure.widget, WidgetKind::TopCpu);
        assert!(failure.error.to_string().contains("panicked"));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_stops_every_task() {
        let (shutdown_tx, _) = broadcast::channel(1);
        let (failure_tx, _failure_rx) = mpsc::unbounded_channel();
        let spawner =
            SamplerSpawner::new(tokio::runtime::Handle::current(), shutdown_tx.clone(), failure_tx);

        let tasks: Vec<_> = [WidgetKind::CpuLoad, WidgetKind::NetworkIo]
            .into_iter()
            .map(|widget| {
                spawner.spawn(
                    widget,
                    Duration::from_secs(3600),
                    Box::new(Counting {
                        calls: Arc::new(AtomicUsize::new(0)),
                        fail_after: usize::MAX,
                    }),
                )
            })
            .collect();

        shutdown_tx.send(()).unwrap();
        for task in tasks {
            tokio::time::timeout(Duration::from_secs(5), task)
                .await
                .unwrap()
                .unwrap();
        }
    }
}
