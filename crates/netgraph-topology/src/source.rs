use async_trait::async_trait;
use netgraph_core::{DeviceSnapshot, DockerNetwork};
use thiserror::Error;

/// Failure of a collaborator fetch. A refresh cycle aborts on the first
/// one without touching published state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {reason}")]
    Request { reason: String },
    #[error("response not decodable: {reason}")]
    Decode { reason: String },
}

impl FetchError {
    pub fn request(reason: impl Into<String>) -> Self {
        Self::Request { reason: reason.into() }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode { reason: reason.into() }
    }
}

/// The interface-listing collaborator: one full set of device
/// snapshots per call.
#[async_trait]
pub trait InterfaceSource: Send + Sync {
    async fn list_interfaces(&self) -> Result<Vec<DeviceSnapshot>, FetchError>;
}

/// The Docker network-listing collaborator.
#[async_trait]
pub trait DockerNetworkSource: Send + Sync {
    async fn list_networks(&self) -> Result<Vec<DockerNetwork>, FetchError>;
}
