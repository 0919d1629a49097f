mod config;
mod http;

use anyhow::{Context, Result};
use netgraph_topology::{Poller, PollerStatus, TopologyStore};
use std::sync::Arc;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = config::parse_args()?;
    tracing::info!(
        base_url = %cfg.base_url,
        interval_secs = cfg.interval_secs,
        hide_down = cfg.hide_down,
        hide_docker = cfg.hide_docker,
        "starting netgraph agent"
    );

    let api = Arc::new(
        http::RouterApi::new(cfg.base_url.clone(), cfg.token.clone())
            .context("build router api client")?,
    );
    let store = Arc::new(TopologyStore::new(api.clone(), api));
    store.set_hide_down(cfg.hide_down);
    store.set_hide_docker(cfg.hide_docker);

    // Log every publish so the topology history shows up in the journal.
    let mut snapshots = store.subscribe();
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let snap = snapshots.borrow_and_update().clone();
            tracing::info!(
                seq = snap.seq,
                nodes = snap.nodes.len(),
                edges = snap.edges.len(),
                "topology changed"
            );
        }
    });

    let poller = Poller::spawn(store, Duration::from_secs(cfg.interval_secs.max(1)));
    let mut status = poller.status();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received ctrl-c; shutting down");
            poller.stop();
        }
        changed = status.changed() => {
            if changed.is_ok() {
                let current = status.borrow().clone();
                if let PollerStatus::Stopped { error } = current {
                    poller.join().await;
                    anyhow::bail!("topology polling failed: {error}");
                }
            }
        }
    }

    poller.join().await;
    Ok(())
}
