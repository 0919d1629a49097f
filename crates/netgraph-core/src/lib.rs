pub mod dev;
pub mod docker;
pub mod graph;

pub use dev::{DeviceKind, DeviceSnapshot, LinkState, MacAddr, WifiBand, WifiMode, WifiRole, Zone};
pub use docker::{DockerContainer, DockerNetwork};
pub use graph::{NodeId, NodePayload, Position, TopologyEdge, TopologyNode};
