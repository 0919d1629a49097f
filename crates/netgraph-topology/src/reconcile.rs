use netgraph_core::{NodeId, TopologyEdge, TopologyNode};
use std::collections::HashSet;

/// Result of comparing two node sets by id.
#[derive(Debug, Default)]
pub struct NodeDiff {
    pub added: Vec<TopologyNode>,
    pub removed: HashSet<NodeId>,
}

impl NodeDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Id-set difference between the freshly classified node array and the
/// previously live one. A node present in both is the same logical
/// entity and appears in neither list.
pub fn diff(new_nodes: &[TopologyNode], old_nodes: &[TopologyNode]) -> NodeDiff {
    let new_ids: HashSet<&NodeId> = new_nodes.iter().map(|n| &n.id).collect();
    let old_ids: HashSet<&NodeId> = old_nodes.iter().map(|n| &n.id).collect();

    let added = new_nodes
        .iter()
        .filter(|n| !old_ids.contains(&n.id))
        .cloned()
        .collect();
    let removed = old_nodes
        .iter()
        .filter(|n| !new_ids.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();

    NodeDiff { added, removed }
}

/// Applies a diff to the live arrays and reports whether anything
/// changed. Removals take every edge touching the removed node with
/// them; additions bring their containment edge. Surviving nodes keep
/// their array order and positions — the caller decides whether to
/// re-run the layout.
pub fn apply(
    nodes: &mut Vec<TopologyNode>,
    edges: &mut Vec<TopologyEdge>,
    diff: NodeDiff,
) -> bool {
    if diff.is_empty() {
        return false;
    }

    if !diff.removed.is_empty() {
        nodes.retain(|n| !diff.removed.contains(&n.id));
        edges.retain(|e| !diff.removed.contains(&e.source) && !diff.removed.contains(&e.target));
    }

    for node in diff.added {
        if let Some(edge) = node.containment_edge() {
            edges.push(edge);
        }
        nodes.push(node);
    }

    true
}
