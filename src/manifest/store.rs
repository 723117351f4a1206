//! Reading and writing versions files

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::VERSIONS_SECTION;
use crate::manifest::document::Document;
use crate::manifest::error::ManifestError;
use crate::manifest::writer::WriteOptions;
use crate::manifest::Manifest;

/// Versions file on disk
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document
    pub fn read_document(&self) -> Result<Document, ManifestError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ManifestError::NotFound {
            path: self.path.clone(),
            source,
        })?;

        Document::parse(&content).map_err(|e| ManifestError::Parse {
            path: self.path.clone(),
            line: e.line,
            message: e.to_string(),
        })
    }

    /// Load the pinned versions
    ///
    /// A file without a `[versions]` section has no pins.
    pub fn load(&self) -> Result<Manifest, ManifestError> {
        let document = self.read_document()?;

        let Some(section) = document.section(VERSIONS_SECTION) else {
            debug!(
                "'{}' section not found in {}.",
                VERSIONS_SECTION,
                self.path.display()
            );
            return Ok(Manifest::new());
        };

        let manifest = Manifest::from_section(section);
        info!(
            "- {} versions found in {}.",
            manifest.len(),
            self.path.display()
        );
        Ok(manifest)
    }

    /// Rewrite the file with the given pins
    ///
    /// Other sections are kept as they are. The new content is written to a
    /// temporary file next to the target and renamed over it, so the target
    /// is either fully rewritten or left untouched.
    pub fn write(&self, manifest: &Manifest, options: &WriteOptions) -> Result<(), ManifestError> {
        let mut document = self.read_document()?;
        if manifest.is_empty() && !document.has_section(VERSIONS_SECTION) {
            debug!("No pins to write, creating no '{}' section.", VERSIONS_SECTION);
        } else {
            document.set_entries(VERSIONS_SECTION, manifest.to_entries());
        }

        let content = document.render(options);
        self.replace_contents(&content)
            .map_err(|source| ManifestError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!("- {} updated.", self.path.display());
        Ok(())
    }

    fn replace_contents(&self, content: &str) -> std::io::Result<()> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(content.as_bytes())?;
        file.as_file().sync_all()?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            file.as_file().set_permissions(metadata.permissions())?;
        }

        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{PackageName, Sorting};
    use tempfile::TempDir;

    fn create_manifest_file(content: &str) -> (TempDir, ManifestStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("versions.cfg");
        fs::write(&path, content).unwrap();
        (temp_dir, ManifestStore::new(path))
    }

    #[test]
    fn load_returns_versions_in_document_order() {
        let (_temp_dir, store) =
            create_manifest_file("[versions]\nzc.buildout = 2.0\nDjango = 1.5\negg = 0.3\n");

        let manifest = store.load().unwrap();

        let names: Vec<_> = manifest.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["zc.buildout", "Django", "egg"]);
        assert_eq!(manifest.get("django"), Some("1.5"));
    }

    #[test]
    fn load_returns_empty_manifest_without_versions_section() {
        let (_temp_dir, store) = create_manifest_file("[buildout]\nparts = test\n");

        let manifest = store.load().unwrap();

        assert!(manifest.is_empty());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = ManifestStore::new(temp_dir.path().join("missing.cfg"));

        let error = store.load().unwrap_err();

        assert!(matches!(error, ManifestError::NotFound { .. }));
        assert!(error.to_string().contains("missing.cfg"));
    }

    #[test]
    fn load_fails_for_invalid_syntax() {
        let (_temp_dir, store) = create_manifest_file("[versions]\nnot an option\n");

        let error = store.load().unwrap_err();

        assert!(matches!(error, ManifestError::Parse { line: 2, .. }));
    }

    #[test]
    fn write_updates_versions_and_keeps_other_sections() {
        let (_temp_dir, store) = create_manifest_file(
            "[buildout]\nextends = base.cfg\n\n[versions]\negg = 0.1\nDjango = 1.5\n\n[sources]\nfoo = git https://example.com/foo\n",
        );
        let mut manifest = store.load().unwrap();
        manifest.insert(PackageName::new("django"), "1.6");

        store.write(&manifest, &WriteOptions::default()).unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[buildout]\nextends = base.cfg\n\n[versions]\negg    = 0.1\nDjango = 1.6\n\n[sources]\nfoo = git https://example.com/foo\n"
        );
    }

    #[test]
    fn write_creates_missing_versions_section() {
        let (_temp_dir, store) = create_manifest_file("[buildout]\nparts = test\n");
        let mut manifest = store.load().unwrap();
        manifest.insert(PackageName::new("egg"), "1.0");

        store
            .write(
                &manifest,
                &WriteOptions {
                    indentation: Some(8),
                    sorting: Sorting::None,
                },
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "[buildout]\nparts = test\n\n[versions]\negg     = 1.0\n"
        );
    }

    #[test]
    fn write_without_changes_keeps_canonical_file_identical() {
        let content = "[buildout]\nparts = test\n\n[versions]\nDjango         = 1.5\nzope.interface = 4.0.5\n";
        let (_temp_dir, store) = create_manifest_file(content);
        let manifest = store.load().unwrap();

        store.write(&manifest, &WriteOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
    }

    #[test]
    fn write_fails_when_source_disappeared() {
        let temp_dir = TempDir::new().unwrap();
        let store = ManifestStore::new(temp_dir.path().join("gone.cfg"));

        let error = store
            .write(&Manifest::new(), &WriteOptions::default())
            .unwrap_err();

        assert!(matches!(error, ManifestError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_leaves_original_untouched() {
        use std::os::unix::fs::PermissionsExt;

        let content = "[versions]\negg = 0.1\n";
        let (temp_dir, store) = create_manifest_file(content);
        let mut manifest = store.load().unwrap();
        manifest.insert(PackageName::new("egg"), "0.2");

        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o500)).unwrap();
        let result = store.write(&manifest, &WriteOptions::default());
        fs::set_permissions(temp_dir.path(), fs::Permissions::from_mode(0o700)).unwrap();

        // Privileged users can still write into the directory.
        if let Err(error) = result {
            assert!(matches!(error, ManifestError::Write { .. }));
            assert_eq!(fs::read_to_string(store.path()).unwrap(), content);
        }
    }
}
