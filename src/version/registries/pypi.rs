//! PyPI index client for looking up the latest release of a package

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_SERVICE_URL;
use crate::version::error::IndexError;
use crate::version::index::{IndexClient, IndexRecord};

const USER_AGENT: &str = concat!("versions-checker/", env!("CARGO_PKG_VERSION"));

/// PyPI JSON API client
#[derive(Clone)]
pub struct PypiIndex {
    client: Client,
    base_url: String,
}

impl Default for PypiIndex {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL.to_string())
    }
}

impl PypiIndex {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Client giving up on a request after `timeout`
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, IndexError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
}

/// Package information from PyPI
#[derive(Debug, Deserialize)]
struct PypiInfo {
    /// Canonical project name
    name: String,
    /// Latest version (according to PyPI)
    version: String,
}

#[async_trait]
impl IndexClient for PypiIndex {
    async fn search(&self, package_name: &str) -> Result<Vec<IndexRecord>, IndexError> {
        let url = format!("{}/{}/json", self.base_url, package_name);
        debug!("Fetching PyPI package: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("Package {} not found on PyPI", package_name);
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            return Err(IndexError::InvalidResponse(format!(
                "PyPI API returned status {}",
                response.status()
            )));
        }

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| IndexError::InvalidResponse(e.to_string()))?;

        Ok(vec![IndexRecord::new(
            pypi_response.info.name,
            pypi_response.info.version,
        )])
    }
}
