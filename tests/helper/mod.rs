//! Shared test utilities

#![allow(dead_code, unused_imports)]

pub mod index;
pub mod manifest;

pub use index::StubIndex;
pub use manifest::{create_manifest_file, read_manifest_file};
