//! Checks the pinned versions of a buildout-style `[versions]` file against a
//! package index and reports or writes the available updates.

pub mod commands;
pub mod config;
pub mod manifest;
pub mod unused;
pub mod version;
