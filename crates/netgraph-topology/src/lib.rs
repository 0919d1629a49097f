pub mod classify;
pub mod layout;
pub mod poll;
pub mod reconcile;
pub mod source;
pub mod store;

pub use classify::{ClassifyOptions, NodeRole};
pub use poll::{Poller, PollerStatus};
pub use source::{DockerNetworkSource, FetchError, InterfaceSource};
pub use store::{RefreshOutcome, TopologySnapshot, TopologyStore};
