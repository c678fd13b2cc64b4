//! Reconciliation loop
//!
//! One pass: fetch every tournament, classify each against the wall clock,
//! execute the indicated action, and keep going when an individual
//! tournament fails. Tournaments are processed sequentially on purpose:
//! every write shares the one signing account, and concurrent writes would
//! contend on its nonce sequence.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use lifecycle_logic::Action;

use crate::chain::TournamentChain;
use crate::error::Result;
use crate::executors::{self, ExecOutcome};

/// Aggregate outcome of one reconciliation pass
#[derive(Clone, Debug, Default, Serialize)]
pub struct PassSummary {
    /// Tournaments examined (including no-ops)
    pub processed: usize,
    /// State-changing actions that landed
    pub applied: usize,
    /// Actions dropped by an executor precondition re-check
    pub skipped: usize,
    /// Tournaments whose action failed
    pub errors: usize,
    pub elapsed_secs: f64,
}

pub struct Reconciler {
    chain: Arc<dyn TournamentChain>,
    /// Serializes passes across the scheduler and the admin HTTP trigger:
    /// at most one pass in flight, a second caller queues behind it
    pass_lock: Mutex<()>,
}

impl Reconciler {
    pub fn new(chain: Arc<dyn TournamentChain>) -> Self {
        Self {
            chain,
            pass_lock: Mutex::new(()),
        }
    }

    /// Run one full classify-and-act pass over all tournaments.
    ///
    /// Fails fast if the listing read fails; there is no partial list to
    /// act on. Per-tournament failures are counted and do not abort the
    /// pass.
    pub async fn run_once(&self) -> Result<PassSummary> {
        let _pass = self.pass_lock.lock().await;
        let started = Instant::now();
        info!("starting reconciliation pass");

        let tournaments = self.chain.fetch_all_tournaments().await?;
        debug!(count = tournaments.len(), "fetched tournaments");

        let seed = pass_seed();
        let mut summary = PassSummary::default();

        for snapshot in &tournaments {
            let now = unix_now();
            let action = snapshot.classify(now);
            summary.processed += 1;

            let outcome = match action {
                Action::NoOp => {
                    debug!(tournament = snapshot.id, status = ?snapshot.status, "no action needed");
                    continue;
                }
                Action::Cancel => executors::cancel_unfilled(self.chain.as_ref(), snapshot).await,
                Action::SimulateScores => {
                    executors::simulate_gameplay(self.chain.as_ref(), snapshot, seed).await
                }
                Action::Finalize => executors::finalize(self.chain.as_ref(), snapshot, now).await,
            };

            match outcome {
                Ok(ExecOutcome::Applied) => summary.applied += 1,
                Ok(ExecOutcome::Skipped(reason)) => {
                    debug!(tournament = snapshot.id, ?action, reason = %reason, "action skipped");
                    summary.skipped += 1;
                }
                Err(err) => {
                    error!(tournament = snapshot.id, ?action, error = %err, "action failed");
                    summary.errors += 1;
                }
            }
        }

        summary.elapsed_secs = started.elapsed().as_secs_f64();
        info!(
            processed = summary.processed,
            applied = summary.applied,
            skipped = summary.skipped,
            errors = summary.errors,
            elapsed_secs = summary.elapsed_secs,
            "reconciliation pass complete"
        );

        Ok(summary)
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Fresh entropy for one pass's score generation.
pub fn pass_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
