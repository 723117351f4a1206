//! Package index trait and latest version lookup

#[cfg(test)]
use mockall::automock;

use tracing::{debug, info};

use crate::manifest::PackageName;
use crate::version::error::{FetchError, IndexError};
use crate::version::ordering::{LooseVersion, ZERO_VERSION};

/// A package release reported by an index search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub name: String,
    pub version: String,
}

impl IndexRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Trait for searching a package index by name
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait IndexClient: Send + Sync {
    /// Searches the index for releases of a package
    ///
    /// The index may match loosely and return other packages; callers filter
    /// on the name. An unknown package yields an empty list, not an error.
    ///
    /// # Returns
    /// * `Ok(Vec<IndexRecord>)` - Candidate releases, in no particular order
    /// * `Err(IndexError)` - If the index could not be queried
    async fn search(&self, package_name: &str) -> Result<Vec<IndexRecord>, IndexError>;
}

/// Fetch the highest version the index knows for a package
///
/// Only records whose name matches case-insensitively are considered.
/// Returns [`ZERO_VERSION`] when there is none.
pub async fn fetch_latest(
    client: &dyn IndexClient,
    package: &PackageName,
) -> Result<String, FetchError> {
    info!("> Fetching latest datas for {}...", package);

    let records = client
        .search(package.as_str())
        .await
        .map_err(|source| FetchError {
            package: package.as_str().to_string(),
            source,
        })?;

    let mut latest = LooseVersion::parse(ZERO_VERSION);
    for record in records {
        if record.name.to_lowercase() != package.key() {
            continue;
        }
        let candidate = LooseVersion::parse(&record.version);
        if candidate > latest {
            latest = candidate;
        }
    }

    debug!("-> Last version of {} is {}.", package, latest);
    Ok(latest.as_str().to_string())
}
