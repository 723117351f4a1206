//! Index test utilities

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use versions_checker::version::error::IndexError;
use versions_checker::version::index::{IndexClient, IndexRecord};

/// In-memory index answering searches from a fixed table
#[derive(Default)]
pub struct StubIndex {
    records: HashMap<String, Vec<IndexRecord>>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    searches: Mutex<Vec<String>>,
}

impl StubIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register releases of a package, searchable case-insensitively
    pub fn with_versions(mut self, package: &str, versions: Vec<&str>) -> Self {
        let records = self.records.entry(package.to_lowercase()).or_default();
        records.extend(versions.into_iter().map(|v| IndexRecord::new(package, v)));
        self
    }

    /// Register a loosely matching record returned when searching `query`
    pub fn with_near_match(mut self, query: &str, name: &str, version: &str) -> Self {
        self.records
            .entry(query.to_lowercase())
            .or_default()
            .push(IndexRecord::new(name, version));
        self
    }

    /// Make searches for a package fail
    pub fn failing(mut self, package: &str) -> Self {
        self.failing.insert(package.to_lowercase());
        self
    }

    /// Delay the answer for a package
    pub fn with_delay(mut self, package: &str, delay: Duration) -> Self {
        self.delays.insert(package.to_lowercase(), delay);
        self
    }

    /// Names searched so far, in call order
    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexClient for StubIndex {
    async fn search(&self, package_name: &str) -> Result<Vec<IndexRecord>, IndexError> {
        self.searches.lock().unwrap().push(package_name.to_string());

        let key = package_name.to_lowercase();
        if let Some(delay) = self.delays.get(&key) {
            sleep(*delay).await;
        }
        if self.failing.contains(&key) {
            return Err(IndexError::InvalidResponse(format!(
                "stub failure for {package_name}"
            )));
        }
        Ok(self.records.get(&key).cloned().unwrap_or_default())
    }
}
