//! End-to-end tests for the unused command

mod helper;

use std::fs;
use std::path::{Path, PathBuf};

use helper::{create_manifest_file, read_manifest_file};
use versions_checker::commands::{UnusedOptions, execute_unused};
use versions_checker::manifest::PackageName;
use versions_checker::unused::UnusedError;

const BUILDOUT: &str = "\
[buildout]
parts = test
eggs-directory = eggs

[versions]
Django         = 1.5
lxml           = 3.2.1
setuptools     = 0.9.8
zope.interface = 4.0.5
";

fn create_eggs(root: &Path, eggs: &[&str]) -> PathBuf {
    let directory = root.join("eggs");
    fs::create_dir(&directory).unwrap();
    for egg in eggs {
        fs::create_dir(directory.join(egg)).unwrap();
    }
    directory
}

fn names(packages: &[PackageName]) -> Vec<&str> {
    packages.iter().map(PackageName::as_str).collect()
}

#[test]
fn unused_pins_are_listed() {
    let (temp_dir, path) = create_manifest_file(BUILDOUT);
    let eggs = create_eggs(
        temp_dir.path(),
        &["Django-1.5-py2.7.egg", "zope.interface-4.0.5-py2.7-linux-x86_64.egg"],
    );
    let options = UnusedOptions {
        source: path.clone(),
        eggs,
        ..UnusedOptions::default()
    };

    let mut out = Vec::new();
    let unused = execute_unused(&options, &mut out).unwrap();

    assert_eq!(names(&unused), vec!["lxml", "setuptools"]);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "- lxml is unused.\n- setuptools is unused.\n"
    );
    assert_eq!(read_manifest_file(&path), BUILDOUT);
}

#[test]
fn unused_pins_are_removed_from_source() {
    let (temp_dir, path) = create_manifest_file(BUILDOUT);
    let eggs = create_eggs(temp_dir.path(), &["Django-1.5-py2.7.egg"]);
    let options = UnusedOptions {
        source: path.clone(),
        eggs,
        excludes: vec!["setuptools".to_string()],
        write: true,
        ..UnusedOptions::default()
    };

    let mut out = Vec::new();
    let unused = execute_unused(&options, &mut out).unwrap();

    assert_eq!(names(&unused), vec!["lxml", "zope.interface"]);
    assert_eq!(
        read_manifest_file(&path),
        "[buildout]\nparts = test\neggs-directory = eggs\n\n[versions]\nDjango     = 1.5\nsetuptools = 0.9.8\n"
    );
}

#[test]
fn nothing_is_written_when_every_pin_is_used() {
    let (temp_dir, path) = create_manifest_file("[versions]\nlxml=3.2.1\n");
    let eggs = create_eggs(temp_dir.path(), &["lxml-3.2.1-py2.7-linux-x86_64.egg"]);
    let options = UnusedOptions {
        source: path.clone(),
        eggs,
        write: true,
        ..UnusedOptions::default()
    };

    let mut out = Vec::new();
    let unused = execute_unused(&options, &mut out).unwrap();

    assert!(unused.is_empty());
    assert!(out.is_empty());
    assert_eq!(read_manifest_file(&path), "[versions]\nlxml=3.2.1\n");
}

#[test]
fn missing_egg_directory_is_reported() {
    let (temp_dir, path) = create_manifest_file(BUILDOUT);
    let options = UnusedOptions {
        source: path,
        eggs: temp_dir.path().join("eggs"),
        ..UnusedOptions::default()
    };

    let error = execute_unused(&options, &mut Vec::new()).unwrap_err();

    assert!(matches!(
        error.downcast_ref::<UnusedError>(),
        Some(UnusedError::EggDirectory { .. })
    ));
}
