//! Error types for the finder library

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("llm request failed: {0}")]
    Llm(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("settings parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = FinderError> = std::result::Result<T, E>;
