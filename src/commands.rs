//! Command flows behind the command line
//!
//! - `updates`: check the pins against the index, then print or write the updates
//! - `unused`: find pins without an installed egg, then print or remove them

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::info;

use crate::config::{CheckerConfig, VERSIONS_SECTION};
use crate::manifest::writer::render_section;
use crate::manifest::{ManifestStore, PackageName, WriteOptions};
use crate::unused::{find_unused, installed_packages};
use crate::version::checker::{CheckReport, UpdateSet, VersionsChecker};
use crate::version::index::IndexClient;
use crate::version::registries::PypiIndex;

#[derive(Debug, Clone, Default)]
pub struct UpdatesOptions {
    pub source: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    /// Write the updates into the source instead of printing them
    pub write: bool,
    pub layout: WriteOptions,
    pub config: CheckerConfig,
}

#[derive(Debug, Clone, Default)]
pub struct UnusedOptions {
    pub source: PathBuf,
    pub eggs: PathBuf,
    pub excludes: Vec<String>,
    /// Remove the unused pins from the source instead of only listing them
    pub write: bool,
    pub layout: WriteOptions,
}

/// Create the index client described by the configuration
pub fn create_index_client(config: &CheckerConfig) -> Result<Arc<dyn IndexClient>> {
    let index = PypiIndex::with_timeout(
        config.service_url.clone(),
        Duration::from_millis(config.timeout_ms),
    )
    .context("Failed to create the index client")?;
    Ok(Arc::new(index))
}

/// Render updates as a `[versions]` block
pub fn render_updates(updates: &UpdateSet, layout: &WriteOptions) -> String {
    let entries: IndexMap<String, String> = updates
        .iter()
        .map(|(name, version)| (name.as_str().to_string(), version.clone()))
        .collect();
    render_section(VERSIONS_SECTION, &entries, layout)
}

/// Check the pins of a versions file and print or write the updates
///
/// Nothing is printed or written when there is no update.
pub async fn execute_updates(
    options: &UpdatesOptions,
    client: Arc<dyn IndexClient>,
    out: &mut impl Write,
) -> Result<CheckReport> {
    let store = ManifestStore::new(&options.source);
    let manifest = store.load()?;

    let checker = VersionsChecker::new(client, options.config.clone());
    let report = checker
        .check(&manifest, &options.includes, &options.excludes)
        .await?;

    if report.updates.is_empty() {
        return Ok(report);
    }

    if options.write {
        let mut manifest = manifest;
        manifest.apply(&report.updates);
        store.write(&manifest, &options.layout)?;
    } else {
        out.write_all(render_updates(&report.updates, &options.layout).as_bytes())
            .context("Failed to print the updates")?;
    }

    Ok(report)
}

/// List the pins of a versions file that no installed egg uses, optionally
/// removing them
pub fn execute_unused(options: &UnusedOptions, out: &mut impl Write) -> Result<Vec<PackageName>> {
    let store = ManifestStore::new(&options.source);
    let manifest = store.load()?;

    let installed = installed_packages(&options.eggs)?;
    let unused = find_unused(&manifest, &installed, &options.excludes);

    if unused.is_empty() {
        return Ok(unused);
    }

    for package in &unused {
        writeln!(out, "- {} is unused.", package).context("Failed to print unused pins")?;
    }

    if options.write {
        let mut manifest = manifest;
        for package in &unused {
            manifest.remove(package);
        }
        store.write(&manifest, &options.layout)?;
        info!("- {} unused pins removed.", unused.len());
    }

    Ok(unused)
}
