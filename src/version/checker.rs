//! Update detection for pinned versions

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CheckerConfig;
use crate::manifest::{Manifest, PackageName, PackageVersions};
use crate::version::error::{CheckError, FetchError};
use crate::version::fetch::{VersionResults, fetch_all};
use crate::version::index::IndexClient;
use crate::version::ordering::ZERO_VERSION;

/// Packages selected for checking with their pinned versions
pub type PackageSet = PackageVersions;

/// Packages whose latest version differs from the pin, with that version
pub type UpdateSet = PackageVersions;

/// Result of a check run
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Number of packages checked
    pub checked: usize,
    pub updates: UpdateSet,
    /// Packages whose latest version could not be fetched
    pub failures: Vec<FetchError>,
}

/// Select the packages to check
///
/// Includes missing from the manifest are added with the zero version, in the
/// order given; then every exclude is removed. Names match case-insensitively.
pub fn filter_packages(manifest: &Manifest, includes: &[String], excludes: &[String]) -> PackageSet {
    let mut packages = manifest.versions().clone();

    for include in includes {
        let name = PackageName::new(include.as_str());
        if !packages.contains_key(&name) {
            packages.insert(name, ZERO_VERSION.to_string());
        }
    }

    let excluded: HashSet<PackageName> = excludes
        .iter()
        .map(|exclude| PackageName::new(exclude.as_str()))
        .collect();
    packages.retain(|name, _| !excluded.contains(name));

    info!("- {} packages need to be checked for updates.", packages.len());
    packages
}

/// Compare pins with the fetched versions
///
/// Versions are compared as plain strings: `1.0` and `1.0.0` differ. Packages
/// without a fetched version are skipped.
pub fn find_updates(packages: &PackageSet, latest: &VersionResults) -> UpdateSet {
    let mut updates = UpdateSet::new();

    for (package, current_version) in packages {
        let Some(last_version) = latest.get(package) else {
            continue;
        };
        if last_version != current_version {
            debug!(
                "=> {} current version ({}) and last version ({}) are different.",
                package, current_version, last_version
            );
            updates.insert(package.clone(), last_version.clone());
        }
    }

    info!("- {} package updates found.", updates.len());
    updates
}

/// Checks the pins of a manifest against a package index
pub struct VersionsChecker {
    client: Arc<dyn IndexClient>,
    config: CheckerConfig,
}

impl VersionsChecker {
    pub fn new(client: Arc<dyn IndexClient>, config: CheckerConfig) -> Self {
        Self { client, config }
    }

    /// Filter, fetch and compare
    ///
    /// In strict mode the first failed fetch fails the run. Otherwise failures
    /// are reported alongside the updates, and the run only fails when every
    /// fetch failed.
    pub async fn check(
        &self,
        manifest: &Manifest,
        includes: &[String],
        excludes: &[String],
    ) -> Result<CheckReport, CheckError> {
        let packages = filter_packages(manifest, includes, excludes);
        let outcome = fetch_all(self.client.as_ref(), &packages, self.config.threads).await;

        let attempted = outcome.attempted();
        let mut failures = outcome.failures;
        if self.config.strict && !failures.is_empty() {
            return Err(CheckError::Fetch(failures.remove(0)));
        }
        if attempted > 0 && failures.len() == attempted {
            return Err(CheckError::AllFetchesFailed { count: attempted });
        }
        let updates = find_updates(&packages, &outcome.results);

        Ok(CheckReport {
            checked: packages.len(),
            updates,
            failures,
        })
    }
}
