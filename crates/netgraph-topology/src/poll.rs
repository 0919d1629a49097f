use crate::store::{RefreshOutcome, TopologyStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Where the polling loop currently stands. `Stopped` means a fetch
/// failed and automatic retries are paused until a new poller (or a
/// manual `refresh`) takes over; the last good snapshot stays
/// published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerStatus {
    Running,
    Stopped { error: String },
    ShutDown,
}

/// Interval-driven refresh task. The store's single-flight guard makes
/// an overlapping tick harmless, so the loop never stacks refreshes.
pub struct Poller {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    status: watch::Receiver<PollerStatus>,
}

impl Poller {
    pub fn spawn(store: Arc<TopologyStore>, interval: Duration) -> Poller {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let (status_tx, status) = watch::channel(PollerStatus::Running);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match store.refresh().await {
                            Ok(RefreshOutcome::Published { added, removed }) => {
                                tracing::info!(added, removed, "topology updated");
                            }
                            Ok(RefreshOutcome::Clean) => {
                                tracing::debug!("topology unchanged");
                            }
                            Ok(RefreshOutcome::Skipped) | Ok(RefreshOutcome::Stale) => {
                                tracing::debug!("refresh superseded by a concurrent caller");
                            }
                            Err(err) => {
                                tracing::error!(error = %err, "refresh failed; pausing automatic polling");
                                let _ = status_tx.send(PollerStatus::Stopped { error: err.to_string() });
                                return;
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        let _ = status_tx.send(PollerStatus::ShutDown);
                        return;
                    }
                }
            }
        });

        Poller { handle, shutdown, status }
    }

    pub fn status(&self) -> watch::Receiver<PollerStatus> {
        self.status.clone()
    }

    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    pub async fn join(self) {
        let _ = self.handle.await;
    }
}
