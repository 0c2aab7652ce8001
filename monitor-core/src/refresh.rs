use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dashboard::{Dashboard, LoadKind};
use crate::error::ClientError;

#[derive(Debug, Clone, Copy)]
pub struct RefreshConfig {
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Handle to the background refresh task. Dropping it without calling
/// `stop` leaves the task running; restart means stop + spawn, so at
/// most one timer drives the dashboard at a time.
pub struct RefresherHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl RefresherHandle {
    pub async fn stop(self) -> Result<(), ClientError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(ClientError::from)
    }
}

/// Spawns the recurring auto-refresh task. Each tick re-reads the
/// dashboard's current pagination cursor and filter, so the query
/// always reflects the state at fire time rather than at spawn time.
pub fn spawn_refresher(dashboard: Dashboard, config: RefreshConfig) -> RefresherHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // An interval's first tick completes immediately; the first
        // refresh belongs one full period after startup.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("refresher shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    let page = dashboard.current_page().await;
                    debug!(page, "auto-refreshing results");
                    dashboard.load_results(page, LoadKind::AutoRefresh).await;
                }
            }
        }
    });

    RefresherHandle { cancel_tx, join }
}
