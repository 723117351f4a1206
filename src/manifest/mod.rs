//! Versions file handling
//!
//! - [`document`]: INI document model keeping untouched sections verbatim
//! - [`writer`]: layout of rewritten sections (indentation, key sorting)
//! - [`store`]: reading and atomically writing a versions file
//! - [`name`]: case-insensitive package names
//! - [`error`]: manifest errors

pub mod document;
pub mod error;
pub mod name;
pub mod store;
pub mod writer;

pub use document::{Document, Section};
pub use error::ManifestError;
pub use name::PackageName;
pub use store::ManifestStore;
pub use writer::{Sorting, WriteOptions};

use indexmap::IndexMap;
use tracing::warn;

/// Ordered mapping of package name to version string
pub type PackageVersions = IndexMap<PackageName, String>;

/// Pinned versions read from the `[versions]` section, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    versions: PackageVersions,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pins of a section
    ///
    /// Keys that only differ in case collapse onto the first one; the last
    /// value wins.
    pub fn from_section(section: &Section) -> Self {
        let mut manifest = Self::new();
        for (key, value) in section.entries() {
            let name = PackageName::new(key.as_str());
            if let Some((_, existing, _)) = manifest.versions.get_full(&name) {
                warn!(
                    "Duplicate pin {} in [{}], keeping {} = {}",
                    key,
                    section.name(),
                    existing,
                    value
                );
            }
            manifest.insert(name, value.clone());
        }
        manifest
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.versions
            .get(&PackageName::new(name))
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.versions.contains_key(&PackageName::new(name))
    }

    /// Pin a package, keeping the existing spelling and position if already pinned
    pub fn insert(&mut self, name: PackageName, version: impl Into<String>) {
        self.versions.insert(name, version.into());
    }

    /// Remove a pin, keeping the order of the others
    pub fn remove(&mut self, name: &PackageName) -> Option<String> {
        self.versions.shift_remove(name)
    }

    /// Pin every package of an update set
    pub fn apply(&mut self, updates: &PackageVersions) {
        for (name, version) in updates {
            self.insert(name.clone(), version.clone());
        }
    }

    pub fn versions(&self) -> &PackageVersions {
        &self.versions
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PackageName, &String)> {
        self.versions.iter()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Entries keyed by their original spelling, ready to be written
    pub fn to_entries(&self) -> IndexMap<String, String> {
        self.versions
            .iter()
            .map(|(name, version)| (name.as_str().to_string(), version.clone()))
            .collect()
    }
}

impl FromIterator<(PackageName, String)> for Manifest {
    fn from_iter<T: IntoIterator<Item = (PackageName, String)>>(iter: T) -> Self {
        let mut manifest = Self::new();
        for (name, version) in iter {
            manifest.insert(name, version);
        }
        manifest
    }
}
