use crate::dev::MacAddr;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A Docker-managed virtual network as reported by the router-control
/// API, keyed for correlation by the host interface it is bound to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerNetwork {
    pub name: String,
    /// Name of the host bridge interface backing this network.
    pub iface_name: String,
    pub id: String,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub containers: HashMap<String, DockerContainer>,
}

impl DockerNetwork {
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerContainer {
    pub name: String,
    #[serde(default)]
    pub mac: Option<MacAddr>,
}
