use crate::classify::{role_of, NodeRole};
use netgraph_core::{Position, TopologyNode};

const WAN_X: f32 = 100.0;
const ROUTER_X: f32 = 400.0;
const ROUTER_Y: f32 = 500.0;
const LAN_X: f32 = 700.0;
const SIDE_X: f32 = 1000.0;
const CLIENT_X: f32 = 1300.0;

const WAN_STEP: f32 = 140.0;
const LAN_STEP: f32 = 120.0;
const SIDE_STEP: f32 = 120.0;
const CLIENT_STEP: f32 = 100.0;

/// Assigns lane coordinates. Each role maps to a fixed column; rows
/// advance by a per-lane step in the order nodes are visited, so the
/// result depends only on the node array order.
#[derive(Debug, Default)]
pub struct LanePlanner {
    wan: f32,
    lan: f32,
    side: f32,
    client: f32,
}

impl LanePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, node: &mut TopologyNode) {
        let role = role_of(node);
        self.assign_role(role, node);
    }

    pub fn assign_role(&mut self, role: NodeRole, node: &mut TopologyNode) {
        node.position = match role {
            NodeRole::Wan => {
                let y = self.wan;
                self.wan += WAN_STEP;
                Position { x: WAN_X, y }
            }
            // The managing host is a single fixed slot, not a lane.
            NodeRole::Router => Position { x: ROUTER_X, y: ROUTER_Y },
            NodeRole::Lan => {
                let y = self.lan;
                self.lan += LAN_STEP;
                Position { x: LAN_X, y }
            }
            NodeRole::WifiAccessPoint | NodeRole::Other => {
                let y = self.side;
                self.side += SIDE_STEP;
                Position { x: SIDE_X, y }
            }
            NodeRole::Client => {
                let y = self.client;
                self.client += CLIENT_STEP;
                Position { x: CLIENT_X, y }
            }
        };
    }
}

/// Recomputes every position from scratch, in array order. Run only
/// when the reconciler reported a change.
pub fn layout(nodes: &mut [TopologyNode]) {
    let mut planner = LanePlanner::new();
    for node in nodes.iter_mut() {
        planner.assign(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netgraph_core::{DeviceKind, DeviceSnapshot, LinkState, Zone};

    fn node(name: &str, index: u32, zone: Zone) -> TopologyNode {
        let dev = DeviceSnapshot {
            name: name.to_string(),
            index,
            mac: None,
            kind: DeviceKind::Physical,
            link_state: LinkState::Up,
            zone,
            controller_name: None,
            controller_id: None,
            peer_link_id: None,
            wifi: None,
            carrier: true,
        };
        TopologyNode::new(dev, None)
    }

    #[test]
    fn layout_is_deterministic_for_a_fixed_order() {
        let build = || {
            vec![
                node("ppp0", 10, Zone::Wan),
                node("br-lan", 11, Zone::Lan),
                node("eth3", 12, Zone::Undefined),
                node("eth4", 13, Zone::Undefined),
            ]
        };
        let mut a = build();
        let mut b = build();
        layout(&mut a);
        layout(&mut b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn lanes_advance_monotonically_by_their_step() {
        let mut nodes = vec![
            node("eth0", 1, Zone::Wan),
            node("ppp0", 2, Zone::Wan),
            node("br-lan", 3, Zone::Lan),
            node("br-guest", 4, Zone::Lan),
            node("eth3", 5, Zone::Undefined),
            node("eth4", 6, Zone::Undefined),
        ];
        layout(&mut nodes);

        assert_eq!(nodes[0].position, Position { x: 100.0, y: 0.0 });
        assert_eq!(nodes[1].position, Position { x: 100.0, y: 140.0 });
        assert_eq!(nodes[2].position, Position { x: 700.0, y: 0.0 });
        assert_eq!(nodes[3].position, Position { x: 700.0, y: 120.0 });
        assert_eq!(nodes[4].position, Position { x: 1000.0, y: 0.0 });
        assert_eq!(nodes[5].position, Position { x: 1000.0, y: 120.0 });
    }

    #[test]
    fn router_and_client_slots_are_supported() {
        let mut host = node("router", 1, Zone::Undefined);
        let mut planner = LanePlanner::new();
        planner.assign_role(NodeRole::Router, &mut host);
        assert_eq!(host.position, Position { x: 400.0, y: 500.0 });

        let mut phone = node("phone", 2, Zone::Undefined);
        let mut laptop = node("laptop", 3, Zone::Undefined);
        planner.assign_role(NodeRole::Client, &mut phone);
        planner.assign_role(NodeRole::Client, &mut laptop);
        assert_eq!(phone.position, Position { x: 1300.0, y: 0.0 });
        assert_eq!(laptop.position, Position { x: 1300.0, y: 100.0 });
    }

    #[test]
    fn relayout_resets_the_lane_cursors() {
        let mut nodes = vec![node("eth0", 1, Zone::Wan)];
        layout(&mut nodes);
        assert_eq!(nodes[0].position.y, 0.0);

        nodes.insert(0, node("ppp0", 2, Zone::Wan));
        layout(&mut nodes);
        assert_eq!(nodes[0].position.y, 0.0);
        assert_eq!(nodes[1].position.y, 140.0);
    }
}
