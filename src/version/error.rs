use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure to fetch the latest version of one package
#[derive(Debug, Error)]
#[error("Failed to fetch {package}: {source}")]
pub struct FetchError {
    pub package: String,
    #[source]
    pub source: IndexError,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("All {count} package fetches failed")]
    AllFetchesFailed { count: usize },
}
