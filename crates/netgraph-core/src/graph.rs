use crate::dev::DeviceSnapshot;
use crate::docker::DockerNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identity, derived from the interface name. Kernel
/// ifindexes are recycled and must never end up in here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        NodeId(name.to_string())
    }
}

impl From<String> for NodeId {
    fn from(name: String) -> Self {
        NodeId(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// What a topology node actually is. Matched exhaustively everywhere;
/// adding a variant is a deliberate API change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "data")]
pub enum NodePayload {
    /// A plain interface: physical NIC, bridge, bond, tunnel.
    Interface { dev: DeviceSnapshot },
    /// An interface that is simultaneously the bound bridge of a
    /// Docker network.
    DockerInterface {
        dev: DeviceSnapshot,
        network: DockerNetwork,
    },
    /// A container-attached virtual interface whose logical parent is a
    /// Docker network node rather than a physical bridge.
    DockerLeaf { dev: DeviceSnapshot },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyNode {
    pub id: NodeId,
    pub label: String,
    /// Written only by the layout engine.
    pub position: Position,
    /// Lookup key into the current snapshot, not an owning reference.
    pub parent: Option<NodeId>,
    pub payload: NodePayload,
}

impl TopologyNode {
    pub fn new(dev: DeviceSnapshot, parent: Option<NodeId>) -> Self {
        Self {
            id: NodeId(dev.name.clone()),
            label: dev.name.clone(),
            position: Position::default(),
            parent,
            payload: NodePayload::Interface { dev },
        }
    }

    pub fn docker_interface(dev: DeviceSnapshot, network: DockerNetwork) -> Self {
        Self {
            id: NodeId(dev.name.clone()),
            label: dev.name.clone(),
            position: Position::default(),
            parent: None,
            payload: NodePayload::DockerInterface { dev, network },
        }
    }

    pub fn docker_leaf(dev: DeviceSnapshot, parent: NodeId) -> Self {
        Self {
            id: NodeId(dev.name.clone()),
            label: dev.name.clone(),
            position: Position::default(),
            parent: Some(parent),
            payload: NodePayload::DockerLeaf { dev },
        }
    }

    pub fn device(&self) -> &DeviceSnapshot {
        match &self.payload {
            NodePayload::Interface { dev }
            | NodePayload::DockerInterface { dev, .. }
            | NodePayload::DockerLeaf { dev } => dev,
        }
    }

    pub fn docker_network(&self) -> Option<&DockerNetwork> {
        match &self.payload {
            NodePayload::DockerInterface { network, .. } => Some(network),
            NodePayload::Interface { .. } | NodePayload::DockerLeaf { .. } => None,
        }
    }

    /// The containment edge from this node's parent, if it has one.
    pub fn containment_edge(&self) -> Option<TopologyEdge> {
        self.parent
            .as_ref()
            .map(|parent| TopologyEdge::between(parent.clone(), self.id.clone()))
    }
}

/// Directed parent→child containment relation. Edges are derived from
/// the node set and regenerated with it, never mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub label: Option<String>,
    pub animated: bool,
    /// Render hints passed through to the visualization layer.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
}

impl TopologyEdge {
    pub fn between(source: NodeId, target: NodeId) -> Self {
        Self {
            id: format!("{source}:{target}"),
            source,
            target,
            label: None,
            animated: true,
            kind: None,
            class: None,
        }
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev::DeviceKind;

    fn dev(name: &str) -> DeviceSnapshot {
        serde_json::from_value(serde_json::json!({ "name": name, "index": 1 }))
            .expect("device snapshot")
    }

    #[test]
    fn edge_id_is_source_colon_target() {
        let edge = TopologyEdge::between(NodeId::from("br-lan"), NodeId::from("eth1"));
        assert_eq!(edge.id, "br-lan:eth1");
        assert!(edge.animated);
        assert!(edge.touches(&NodeId::from("eth1")));
        assert!(!edge.touches(&NodeId::from("eth2")));
    }

    #[test]
    fn containment_edge_requires_a_parent() {
        let orphan = TopologyNode::new(dev("eth0"), None);
        assert!(orphan.containment_edge().is_none());

        let child = TopologyNode::new(dev("eth1"), Some(NodeId::from("br-lan")));
        let edge = child.containment_edge().expect("edge");
        assert_eq!(edge.source, NodeId::from("br-lan"));
        assert_eq!(edge.target, NodeId::from("eth1"));
    }

    #[test]
    fn node_id_comes_from_the_name_not_the_index() {
        let mut d = dev("wan0");
        d.index = 999;
        d.kind = DeviceKind::Ppp;
        let node = TopologyNode::new(d, None);
        assert_eq!(node.id, NodeId::from("wan0"));
    }
}
