//! Periodic republishing of replica metadata for display.
//!
//! # Design
//! A timer task samples the `ReplicaTracker` on a fixed period and publishes
//! the result on a watch channel, decoupled from the request/response path.
//! Publishing is sticky: a `None` sample never overwrites a previously
//! published value, so the display keeps showing the last known replica.
//! The poller owns its timer task; `stop` (or dropping the poller) aborts
//! it — there is no in-flight work to wait for.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::replica::ReplicaTracker;

/// Default sampling period.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(2);

/// Last published replica metadata, as shown to subscribers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplicaStatus {
    pub replica_id: Option<String>,
    pub upstream_server: Option<String>,
}

pub struct ReplicaPoller {
    status: watch::Receiver<ReplicaStatus>,
    handle: JoinHandle<()>,
}

impl ReplicaPoller {
    /// Start sampling `tracker` every `period`.
    pub fn spawn(tracker: Arc<ReplicaTracker>, period: Duration) -> Self {
        let (tx, status) = watch::channel(ReplicaStatus::default());
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let sample = tracker.snapshot();
                let updated = tx.send_if_modified(|status| {
                    let mut changed = false;
                    if sample.replica_id.is_some() && status.replica_id != sample.replica_id {
                        status.replica_id = sample.replica_id.clone();
                        changed = true;
                    }
                    if sample.upstream_server.is_some()
                        && status.upstream_server != sample.upstream_server
                    {
                        status.upstream_server = sample.upstream_server.clone();
                        changed = true;
                    }
                    changed
                });
                if updated {
                    debug!(
                        replica_id = ?sample.replica_id,
                        upstream_server = ?sample.upstream_server,
                        "replica status updated"
                    );
                }
            }
        });
        Self { status, handle }
    }

    /// Subscribe to published status updates.
    pub fn subscribe(&self) -> watch::Receiver<ReplicaStatus> {
        self.status.clone()
    }

    /// Stop the timer task.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for ReplicaPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
