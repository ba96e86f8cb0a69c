//! Cancellable periodic policy check.
//!
//! One background task per writer, started explicitly. Each tick evaluates
//! the policy and, on a positive decision, runs the rotation on the
//! blocking pool. A shutdown signal stops the loop; an in-flight rotation
//! is allowed to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::writer::Shared;

pub(crate) struct SchedulerHandle {
    shutdown: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Spawn the check loop on the current tokio runtime.
    pub(crate) fn spawn(shared: Arc<Shared>, interval: Duration) -> Self {
        let (shutdown, shutdown_rx) = broadcast::channel(1);
        let join = tokio::spawn(run(shared, interval, shutdown_rx));
        Self { shutdown, join }
    }

    /// Signal the loop and wait for it to wind down. No new check starts
    /// after this returns.
    pub(crate) async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.join.await {
            tracing::warn!(error = %err, "scheduler task join failure");
        }
    }
}

async fn run(shared: Arc<Shared>, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ticker.tick().await; // consume the immediate tick; first check is one interval out

    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            _ = ticker.tick() => {
                let for_check = Arc::clone(&shared);
                let outcome =
                    tokio::task::spawn_blocking(move || for_check.check_and_rotate()).await;

                match outcome {
                    Ok(Ok(Some(backup))) => {
                        tracing::info!(backup = %backup.display(), "log file rotated");
                    }
                    Ok(Ok(None)) => {}
                    Ok(Err(err)) => {
                        tracing::warn!(error = %err, "rotation failed; retrying next tick");
                        shared.report(&err);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "rotation task join failure");
                    }
                }
            }
        }
    }
}
