//! Index client implementations

pub mod pypi;

pub use pypi::PypiIndex;
