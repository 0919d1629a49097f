use crate::classify::{self, ClassifyOptions};
use crate::layout;
use crate::reconcile;
use crate::source::{DockerNetworkSource, FetchError, InterfaceSource};
use netgraph_core::{DeviceSnapshot, NodeId, TopologyEdge, TopologyNode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// One published view of the topology. Immutable once published; a
/// refresh replaces the whole `Arc` so consumers always see a
/// consistent (nodes, edges, index) triple.
#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    /// Monotonic refresh ticket that produced this snapshot.
    pub seq: u64,
    pub nodes: Vec<TopologyNode>,
    pub edges: Vec<TopologyEdge>,
    pub index_by_id: HashMap<NodeId, usize>,
}

impl TopologySnapshot {
    fn empty() -> Self {
        Self { seq: 0, nodes: Vec::new(), edges: Vec::new(), index_by_id: HashMap::new() }
    }

    fn build(seq: u64, nodes: Vec<TopologyNode>, edges: Vec<TopologyEdge>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self { seq, nodes, edges, index_by_id }
    }

    pub fn node(&self, id: &NodeId) -> Option<&TopologyNode> {
        self.index_by_id.get(id).map(|i| &self.nodes[*i])
    }
}

/// What one `refresh` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The node set changed; a new snapshot was published.
    Published { added: usize, removed: usize },
    /// Fetch and reconciliation ran, nothing changed, nothing was
    /// republished and the layout did not run.
    Clean,
    /// Another refresh held the working set; this call did nothing.
    Skipped,
    /// The snapshot lost the publish race to a newer ticket and was
    /// discarded.
    Stale,
}

struct WorkingSet {
    nodes: Vec<TopologyNode>,
    edges: Vec<TopologyEdge>,
}

/// Orchestrates the poll cycle: fetch, classify, reconcile, lay out,
/// publish. One store owns one topology; all consumer reads go through
/// the published snapshot.
pub struct TopologyStore {
    interfaces: Arc<dyn InterfaceSource>,
    docker: Arc<dyn DockerNetworkSource>,
    hide_down: AtomicBool,
    hide_docker: AtomicBool,
    seq: AtomicU64,
    working: Mutex<WorkingSet>,
    published: watch::Sender<Arc<TopologySnapshot>>,
}

impl TopologyStore {
    pub fn new(interfaces: Arc<dyn InterfaceSource>, docker: Arc<dyn DockerNetworkSource>) -> Self {
        let (published, _) = watch::channel(Arc::new(TopologySnapshot::empty()));
        Self {
            interfaces,
            docker,
            hide_down: AtomicBool::new(true),
            hide_docker: AtomicBool::new(false),
            seq: AtomicU64::new(0),
            working: Mutex::new(WorkingSet { nodes: Vec::new(), edges: Vec::new() }),
            published,
        }
    }

    /// Runs one poll cycle. Single-flight: a call that finds another
    /// refresh in progress returns `Skipped` without fetching. A fetch
    /// failure aborts before any state is touched, leaving the last
    /// good snapshot published.
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        let Ok(mut working) = self.working.try_lock() else {
            tracing::debug!("refresh already in flight; skipping");
            return Ok(RefreshOutcome::Skipped);
        };
        let ticket = self.seq.fetch_add(1, Ordering::Relaxed) + 1;

        let devices = self.interfaces.list_interfaces().await?;
        let networks = self.docker.list_networks().await?;

        let opts = ClassifyOptions {
            hide_down: self.hide_down.load(Ordering::Relaxed),
            hide_docker: self.hide_docker.load(Ordering::Relaxed),
        };
        let fresh = classify::build_nodes(&devices, &networks, opts);

        let diff = reconcile::diff(&fresh, &working.nodes);
        let (added, removed) = (diff.added.len(), diff.removed.len());
        let WorkingSet { nodes, edges } = &mut *working;
        if !reconcile::apply(nodes, edges, diff) {
            tracing::debug!(ticket, "topology unchanged");
            return Ok(RefreshOutcome::Clean);
        }
        layout::layout(nodes);

        let snapshot = Arc::new(TopologySnapshot::build(
            ticket,
            working.nodes.clone(),
            working.edges.clone(),
        ));
        if !self.publish_if_newer(snapshot) {
            return Ok(RefreshOutcome::Stale);
        }
        tracing::info!(ticket, added, removed, "published topology snapshot");
        Ok(RefreshOutcome::Published { added, removed })
    }

    /// Publishes must land in ticket order; a completion older than the
    /// current snapshot is dropped.
    fn publish_if_newer(&self, snapshot: Arc<TopologySnapshot>) -> bool {
        let mut accepted = false;
        self.published.send_if_modified(|current| {
            if snapshot.seq > current.seq {
                *current = snapshot;
                accepted = true;
                true
            } else {
                tracing::warn!(
                    stale = snapshot.seq,
                    current = current.seq,
                    "discarding stale refresh completion"
                );
                false
            }
        });
        accepted
    }

    /// Takes effect on the next `refresh`, not retroactively.
    pub fn set_hide_down(&self, hide: bool) {
        self.hide_down.store(hide, Ordering::Relaxed);
    }

    /// Takes effect on the next `refresh`, not retroactively.
    pub fn set_hide_docker(&self, hide: bool) {
        self.hide_docker.store(hide, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Arc<TopologySnapshot> {
        self.published.borrow().clone()
    }

    /// Watch handle for consumers that want to react to publishes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TopologySnapshot>> {
        self.published.subscribe()
    }

    pub fn find_node_by_iface_name(&self, name: &str) -> Option<TopologyNode> {
        self.snapshot().node(&NodeId::from(name)).cloned()
    }

    pub fn find_device_by_iface_name(&self, name: &str) -> Option<DeviceSnapshot> {
        self.find_node_by_iface_name(name)
            .map(|node| node.device().clone())
    }

    pub fn is_bridge(&self, name: &str) -> bool {
        self.find_node_by_iface_name(name)
            .is_some_and(|node| node.device().is_bridge())
    }
}
