//! Concurrent lookup of the latest versions of a package set

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::manifest::{PackageName, PackageVersions};
use crate::version::error::FetchError;
use crate::version::index::{IndexClient, fetch_latest};

/// Latest version per package, in no particular order
pub type VersionResults = HashMap<PackageName, String>;

/// Results of a batch of fetches
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub results: VersionResults,
    pub failures: Vec<FetchError>,
}

impl FetchOutcome {
    /// Number of packages a fetch was attempted for
    pub fn attempted(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

/// Fetch the latest version of every package with at most `concurrency`
/// requests in flight
///
/// A concurrency of 0 or 1 runs the fetches one after the other. A failed
/// fetch is recorded in the outcome and does not stop the others.
pub async fn fetch_all(
    client: &dyn IndexClient,
    packages: &PackageVersions,
    concurrency: usize,
) -> FetchOutcome {
    let fetches = stream::iter(packages.keys())
        .map(|package| async move { (package, fetch_latest(client, package).await) })
        .buffer_unordered(concurrency.max(1));

    fetches
        .fold(FetchOutcome::default(), |mut outcome, (package, result)| async move {
            match result {
                Ok(version) => {
                    outcome.results.insert(package.clone(), version);
                }
                Err(e) => {
                    warn!("{}", e);
                    outcome.failures.push(e);
                }
            }
            outcome
        })
        .await
}
