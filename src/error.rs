//! Error types for the collegebot crate

use thiserror::Error;

/// Result type for collegebot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for collegebot operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// URL ranking error
    #[error("Ranking error: {0}")]
    Rank(String),

    /// Answer generation error
    #[error("Answer error: {0}")]
    Answer(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
