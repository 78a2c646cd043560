use crate::model::CollectionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RambleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Missing setting: {0}")]
    MissingSetting(&'static str),
}

/// Rejections of explicit user actions. These are the only failures the
/// engine surfaces to the UI; nothing is mutated when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Collection name cannot be empty")]
    EmptyCollectionName,

    #[error("Collection not found: {0}")]
    CollectionNotFound(CollectionId),

    #[error("Search query cannot be empty")]
    EmptyQuery,
}

/// Failures at the search / keyword-rewrite service boundary.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider is unavailable")]
    Unavailable,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, RambleError>;
