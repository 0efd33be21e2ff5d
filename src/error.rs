use thiserror::Error;

/// Everything that can go wrong between pressing a key and seeing a briefing.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Please enter a search keyword")]
    EmptyQuery,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    Status { status: reqwest::StatusCode, url: String },

    #[error("Summary could not be read: {0}")]
    MalformedSummary(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}
