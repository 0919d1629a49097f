use netgraph_core::{DeviceSnapshot, DockerNetwork, NodeId, TopologyNode, Zone};
use std::collections::{HashMap, HashSet};

/// Visibility toggles applied while building a node set. They only
/// matter at classification time; already-published nodes are untouched
/// until the next refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    pub hide_down: bool,
    pub hide_docker: bool,
}

/// Topological role of a node, used by the layout engine to pick a
/// lane. Router is the singular managing-host slot and Client is
/// reserved for dynamic leaf devices; neither is produced by the
/// current classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Wan,
    Router,
    Lan,
    WifiAccessPoint,
    Other,
    Client,
}

/// Role precedence: WAN > Router > LAN > access point > everything
/// else. Malformed or missing classification data lands in `Other`.
pub fn role_of(node: &TopologyNode) -> NodeRole {
    let dev = node.device();
    match dev.zone {
        Zone::Wan => NodeRole::Wan,
        Zone::Lan => NodeRole::Lan,
        Zone::Undefined => {
            if dev.is_access_point() {
                NodeRole::WifiAccessPoint
            } else {
                NodeRole::Other
            }
        }
    }
}

/// Turns one poll's raw device and Docker-network listings into the
/// candidate node set.
///
/// Suppressions: loopback devices always; any device with a Down link
/// when `hide_down`; Docker leaves when `hide_docker`. Controller back
/// references are resolved by name first, then through the ifindex map
/// built from this same listing; a reference that does not land on an
/// emitted node degrades to "no parent".
pub fn build_nodes(
    devices: &[DeviceSnapshot],
    docker_networks: &[DockerNetwork],
    opts: ClassifyOptions,
) -> Vec<TopologyNode> {
    let mut name_by_index: HashMap<u32, &str> = HashMap::new();
    for dev in devices {
        name_by_index.insert(dev.index, dev.name.as_str());
    }

    let mut docker_by_iface: HashMap<&str, &DockerNetwork> = HashMap::new();
    for net in docker_networks {
        docker_by_iface.insert(net.iface_name.as_str(), net);
    }

    // Docker-bound interfaces first: their ifindexes decide which of
    // the remaining devices are container leaves.
    let mut docker_ifindexes: HashMap<u32, &str> = HashMap::new();
    let mut docker_nodes: Vec<TopologyNode> = Vec::new();
    let mut rest: Vec<&DeviceSnapshot> = Vec::new();
    for dev in devices {
        if dev.is_loopback() {
            continue;
        }
        match docker_by_iface.get(dev.name.as_str()) {
            Some(net) => {
                if opts.hide_down && dev.is_down() {
                    continue;
                }
                docker_ifindexes.insert(dev.index, dev.name.as_str());
                docker_nodes.push(TopologyNode::docker_interface(dev.clone(), (*net).clone()));
            }
            None => rest.push(dev),
        }
    }

    let mut iface_nodes: Vec<TopologyNode> = Vec::new();
    let mut leaf_nodes: Vec<TopologyNode> = Vec::new();
    for dev in rest {
        if opts.hide_down && dev.is_down() {
            continue;
        }
        if let Some(parent) = dev
            .controller_id
            .and_then(|id| docker_ifindexes.get(&id).copied())
        {
            if !opts.hide_docker {
                leaf_nodes.push(TopologyNode::docker_leaf(dev.clone(), NodeId::from(parent)));
            }
            continue;
        }
        let parent = dev
            .controller_name
            .as_deref()
            .or_else(|| dev.controller_id.and_then(|id| name_by_index.get(&id).copied()))
            .map(NodeId::from);
        iface_nodes.push(TopologyNode::new(dev.clone(), parent));
    }

    let mut nodes = iface_nodes;
    nodes.append(&mut docker_nodes);
    nodes.append(&mut leaf_nodes);

    dedup_by_id(&mut nodes);
    clear_dangling_parents(&mut nodes);
    nodes
}

/// Two devices resolving to the same derived id is a data-integrity
/// problem (e.g. duplicate names across namespaces). The last-seen
/// device wins.
fn dedup_by_id(nodes: &mut Vec<TopologyNode>) {
    let mut keep = vec![true; nodes.len()];
    let mut last_seen: HashMap<NodeId, usize> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        if let Some(prev) = last_seen.insert(node.id.clone(), i) {
            tracing::warn!(id = %node.id, "duplicate node id in one snapshot; keeping last-seen device");
            keep[prev] = false;
        }
    }
    let mut it = keep.into_iter();
    nodes.retain(|_| it.next().unwrap_or(true));
}

fn clear_dangling_parents(nodes: &mut [TopologyNode]) {
    let ids: HashSet<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
    for node in nodes.iter_mut() {
        let dangling = node.parent.as_ref().is_some_and(|p| !ids.contains(p));
        if dangling {
            tracing::debug!(id = %node.id, "controller missing from node set; dropping parent link");
            node.parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netgraph_core::{DeviceKind, LinkState, NodePayload, WifiBand, WifiMode, WifiRole};

    fn dev(name: &str, index: u32) -> DeviceSnapshot {
        DeviceSnapshot {
            name: name.to_string(),
            index,
            mac: None,
            kind: DeviceKind::Physical,
            link_state: LinkState::Up,
            zone: Zone::Undefined,
            controller_name: None,
            controller_id: None,
            peer_link_id: None,
            wifi: None,
            carrier: true,
        }
    }

    fn docker_net(iface_name: &str) -> DockerNetwork {
        DockerNetwork {
            name: format!("net-{iface_name}"),
            iface_name: iface_name.to_string(),
            id: format!("{iface_name}-id"),
            driver: Some("bridge".to_string()),
            containers: HashMap::new(),
        }
    }

    #[test]
    fn loopback_is_never_emitted() {
        let mut lo = dev("lo", 1);
        lo.kind = DeviceKind::Loopback;
        let nodes = build_nodes(&[lo, dev("eth0", 2)], &[], ClassifyOptions::default());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, NodeId::from("eth0"));
    }

    #[test]
    fn hide_down_suppresses_only_down_devices() {
        let mut down = dev("eth1", 3);
        down.link_state = LinkState::Down;
        let mut dormant = dev("eth2", 4);
        dormant.link_state = LinkState::Dormant;

        let opts = ClassifyOptions { hide_down: true, hide_docker: false };
        let nodes = build_nodes(&[dev("eth0", 2), down, dormant], &[], opts);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["eth0", "eth2"]);
    }

    #[test]
    fn docker_bound_interface_becomes_docker_interface_node() {
        let mut bridge = dev("br-dock", 7);
        bridge.kind = DeviceKind::Bridge;
        let nodes = build_nodes(&[bridge], &[docker_net("br-dock")], ClassifyOptions::default());
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0].payload, NodePayload::DockerInterface { .. }));
    }

    #[test]
    fn container_veth_becomes_leaf_parented_to_the_docker_node() {
        let mut bridge = dev("br-dock", 7);
        bridge.kind = DeviceKind::Bridge;
        let mut veth = dev("veth01ab", 12);
        veth.kind = DeviceKind::Veth;
        veth.controller_id = Some(7);

        let nodes = build_nodes(&[bridge, veth], &[docker_net("br-dock")], ClassifyOptions::default());
        let leaf = nodes
            .iter()
            .find(|n| n.id == NodeId::from("veth01ab"))
            .expect("leaf node");
        assert!(matches!(leaf.payload, NodePayload::DockerLeaf { .. }));
        assert_eq!(leaf.parent, Some(NodeId::from("br-dock")));
    }

    #[test]
    fn hide_docker_drops_the_leaves_but_keeps_the_network_node() {
        let mut bridge = dev("br-dock", 7);
        bridge.kind = DeviceKind::Bridge;
        let mut veth = dev("veth01ab", 12);
        veth.controller_id = Some(7);

        let opts = ClassifyOptions { hide_down: false, hide_docker: true };
        let nodes = build_nodes(&[bridge, veth], &[docker_net("br-dock")], opts);
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["br-dock"]);
    }

    #[test]
    fn controller_id_resolves_to_a_name_for_the_parent_link() {
        let mut bridge = dev("br-lan", 5);
        bridge.kind = DeviceKind::Bridge;
        bridge.zone = Zone::Lan;
        let mut port = dev("eth1", 6);
        port.controller_id = Some(5);

        let nodes = build_nodes(&[bridge, port], &[], ClassifyOptions::default());
        let port_node = nodes
            .iter()
            .find(|n| n.id == NodeId::from("eth1"))
            .expect("port node");
        assert_eq!(port_node.parent, Some(NodeId::from("br-lan")));
    }

    #[test]
    fn dangling_controller_degrades_to_no_parent() {
        let mut port = dev("eth1", 6);
        port.controller_name = Some("br-gone".to_string());
        let nodes = build_nodes(&[port], &[], ClassifyOptions::default());
        assert_eq!(nodes[0].parent, None);
    }

    #[test]
    fn duplicate_ids_keep_the_last_seen_device() {
        let mut first = dev("eth0", 2);
        first.zone = Zone::Lan;
        let mut second = dev("eth0", 40);
        second.zone = Zone::Wan;

        let nodes = build_nodes(&[first, second], &[], ClassifyOptions::default());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].device().index, 40);
        assert_eq!(nodes[0].device().zone, Zone::Wan);
    }

    #[test]
    fn role_precedence_wan_beats_access_point() {
        let mut ap = dev("wlan0", 9);
        ap.zone = Zone::Wan;
        ap.wifi = Some(WifiRole { mode: WifiMode::AccessPoint, band: WifiBand::Band5G });
        let node = TopologyNode::new(ap, None);
        assert_eq!(role_of(&node), NodeRole::Wan);
    }

    #[test]
    fn unclassified_access_point_gets_the_ap_role() {
        let mut ap = dev("wlan0", 9);
        ap.wifi = Some(WifiRole { mode: WifiMode::AccessPoint, band: WifiBand::Band2G });
        let node = TopologyNode::new(ap, None);
        assert_eq!(role_of(&node), NodeRole::WifiAccessPoint);

        let mut station = dev("wlan1", 10);
        station.wifi = Some(WifiRole { mode: WifiMode::Station, band: WifiBand::Unknown });
        let node = TopologyNode::new(station, None);
        assert_eq!(role_of(&node), NodeRole::Other);
    }
}
