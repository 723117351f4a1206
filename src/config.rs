use serde::Deserialize;

/// Default versions file checked when no source is given
pub const DEFAULT_SOURCE: &str = "versions.cfg";

/// Default directory holding installed eggs
pub const DEFAULT_EGGS_DIR: &str = "./eggs/";

/// Name of the section holding the pinned versions
pub const VERSIONS_SECTION: &str = "versions";

/// Default package index queried for latest versions
pub const DEFAULT_SERVICE_URL: &str = "https://pypi.org/pypi";

/// Default number of concurrent fetches
pub const DEFAULT_THREADS: usize = 10;

/// Timeout for a single fetch in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Settings of a version check run
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Base URL of the package index
    pub service_url: String,
    /// Maximum number of fetches in flight
    pub threads: usize,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Abort the run on the first failed fetch
    pub strict: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            threads: DEFAULT_THREADS,
            timeout_ms: FETCH_TIMEOUT_MS,
            strict: false,
        }
    }
}
