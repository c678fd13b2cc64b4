//! Pass scheduler
//!
//! One background task drives the reconciliation loop: a first pass
//! immediately on start, then one per interval. Because the pass is awaited
//! inside the timer loop, passes can never overlap; a pass that outlives
//! its interval simply delays the next tick.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::reconciler::Reconciler;

struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct Scheduler {
    reconciler: Arc<Reconciler>,
    every: Duration,
    running: Mutex<Option<SchedulerHandle>>,
}

impl Scheduler {
    pub fn new(reconciler: Arc<Reconciler>, every: Duration) -> Self {
        Self {
            reconciler,
            every,
            running: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Start the background loop. No-op if already running.
    ///
    /// A pass failure is logged and swallowed; the timer must never die to
    /// an unhandled error.
    pub fn start(&self) {
        let mut slot = self.running.lock();
        if slot.is_some() {
            warn!("scheduler already running");
            return;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let reconciler = self.reconciler.clone();
        let every = self.every;

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = reconciler.run_once().await {
                            error!(error = %err, "scheduled reconciliation pass failed");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            info!("scheduler loop exited");
        });

        *slot = Some(SchedulerHandle { shutdown, task });
        info!(interval_ms = every.as_millis() as u64, "scheduler started");
    }

    /// Stop scheduling future passes and wait for the loop to exit.
    ///
    /// Idempotent. The shutdown signal is only observed between passes, so
    /// an in-flight pass (and any transaction it already submitted) runs
    /// to completion; stop never cancels mid-write.
    pub async fn stop(&self) {
        let handle = self.running.lock().take();
        match handle {
            Some(handle) => {
                let _ = handle.shutdown.send(true);
                let _ = handle.task.await;
                info!("scheduler stopped");
            }
            None => {
                warn!("scheduler not running");
            }
        }
    }
}
