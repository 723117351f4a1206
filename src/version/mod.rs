//! Version checking layer
//!
//! This module looks up the latest versions of pinned packages on a package
//! index and compares them with the pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Checker   │────▶│    Fetch    │────▶│ IndexClient │
//! │(filter,diff)│     │ (fan-out)   │     │  (search)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │  Ordering   │◀────│ Registries  │
//!                     │(loose cmp)  │     │   (PyPI)    │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: package filtering, update detection and the check pipeline
//! - [`fetch`]: bounded concurrent lookup of latest versions
//! - [`index`]: index client trait and latest version lookup
//! - [`registries`]: concrete index clients (PyPI)
//! - [`ordering`]: loose version ordering
//! - [`error`]: error types for index and check operations

pub mod checker;
pub mod error;
pub mod fetch;
pub mod index;
pub mod ordering;
pub mod registries;

pub use checker::{CheckReport, PackageSet, UpdateSet, VersionsChecker};
pub use error::{CheckError, FetchError, IndexError};
pub use index::{IndexClient, IndexRecord};
pub use ordering::{LooseVersion, ZERO_VERSION};
