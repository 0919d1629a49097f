use async_trait::async_trait;
use netgraph_core::{DeviceSnapshot, DockerNetwork};
use netgraph_topology::{DockerNetworkSource, FetchError, InterfaceSource};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the router-control backend. Implements both
/// collaborator sources; the topology engine only ever sees the
/// traits.
pub struct RouterApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RouterApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, base_url: base_url.into(), token })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = endpoint(&self.base_url, path);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::request(e.to_string()))?;
        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::decode(e.to_string()))
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

#[async_trait]
impl InterfaceSource for RouterApi {
    async fn list_interfaces(&self) -> Result<Vec<DeviceSnapshot>, FetchError> {
        self.get_json("iface").await
    }
}

#[async_trait]
impl DockerNetworkSource for RouterApi {
    async fn list_networks(&self) -> Result<Vec<DockerNetwork>, FetchError> {
        self.get_json("docker/networks").await
    }
}
