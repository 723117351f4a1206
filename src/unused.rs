//! Pins without a matching installed egg

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::manifest::{Manifest, PackageName};

#[derive(Debug, Error)]
pub enum UnusedError {
    #[error("Cannot list eggs in {}: {source}", path.display())]
    EggDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Project names of the eggs installed in a directory
///
/// Only `*.egg` entries count; the project name is the part of the file name
/// before the first `-`.
pub fn installed_packages(egg_directory: &Path) -> Result<HashSet<String>, UnusedError> {
    let directory_error = |source: io::Error| UnusedError::EggDirectory {
        path: egg_directory.to_path_buf(),
        source,
    };

    let mut installed = HashSet::new();
    for entry in fs::read_dir(egg_directory).map_err(directory_error)? {
        let entry = entry.map_err(directory_error)?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if !file_name.ends_with(".egg") {
            continue;
        }
        let project = file_name.split('-').next().unwrap_or(file_name);
        installed.insert(normalize(project));
    }

    info!(
        "- {} packages found in {}.",
        installed.len(),
        egg_directory.display()
    );
    Ok(installed)
}

/// Pins of the manifest matching no installed package, in manifest order
pub fn find_unused(
    manifest: &Manifest,
    installed: &HashSet<String>,
    excludes: &[String],
) -> Vec<PackageName> {
    let excluded: HashSet<String> = excludes.iter().map(|e| normalize(e)).collect();

    let unused: Vec<PackageName> = manifest
        .iter()
        .map(|(name, _)| name)
        .filter(|name| {
            let key = normalize(name.as_str());
            !installed.contains(&key) && !excluded.contains(&key)
        })
        .cloned()
        .collect();

    debug!("Unused pins: {:?}", unused);
    info!("- {} unused versions found.", unused.len());
    unused
}

// Egg file names spell `-` as `_`.
fn normalize(name: &str) -> String {
    name.to_lowercase().replace('-', "_")
}
