//! Maintenance calls against the local model server.
//!
//! Resolution never touches the network; these helpers exist for operators
//! to probe reachability and to evict loaded models between runs. Failures
//! are logged and reported as `false`, never raised.

use crate::client::LOCAL_BASE_URL;
use log::{info, warn};
use serde_json::json;
use std::time::Duration;

/// Timeout for the reachability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for model unload requests.
const UNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the local model server's management endpoints.
#[derive(Debug, Clone)]
pub struct LocalServer {
    base_url: String,
    http: reqwest::Client,
}

impl Default for LocalServer {
    fn default() -> Self {
        Self::new(LOCAL_BASE_URL)
    }
}

impl LocalServer {
    /// Create a client for a server at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe whether the server is up and answering.
    pub async fn is_reachable(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!("local model server unreachable ({url}): {err}");
                false
            }
        }
    }

    /// Ask the server to evict a model from memory immediately.
    pub async fn unload(&self, model_name: &str) -> bool {
        let url = format!("{}/api/generate", self.base_url);
        let payload = json!({
            "model": model_name,
            "prompt": "",
            "keep_alive": 0,
        });
        match self
            .http
            .post(&url)
            .json(&payload)
            .timeout(UNLOAD_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!("unloaded local model: {model_name}");
                true
            }
            Ok(response) => {
                warn!(
                    "failed to unload local model {model_name}: status {}",
                    response.status()
                );
                false
            }
            Err(err) => {
                warn!("failed to unload local model {model_name}: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A server that is not listening reports unreachable instead of erroring.
    #[tokio::test]
    async fn unreachable_server_reports_false() {
        // Reserved TEST-NET-1 address, nothing listens there.
        let server = LocalServer::new("http://192.0.2.1:11434");
        // The probe timeout bounds this call.
        assert!(!server.is_reachable().await);
    }

    #[test]
    fn default_points_at_local_base_url() {
        let server = LocalServer::default();
        assert_eq!(server.base_url(), LOCAL_BASE_URL);
    }
}
