//! Error types for catalog operations

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to an upstream catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The caller declared a media type no catalog serves
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    /// The media type exists but has no episodes or chapters
    #[error("Media type {0} has no episodes or chapters")]
    NotEpisodic(String),

    /// The identifier cannot be sent to the provider
    #[error("Invalid {provider} id: {id}")]
    InvalidId { provider: &'static str, id: String },

    /// Transport failure or undecodable body
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status
    #[error("{provider} returned {status}")]
    Status {
        provider: &'static str,
        status: StatusCode,
    },

    /// A configured base URL cannot carry path segments
    #[error("{provider} base URL is invalid: {url}")]
    InvalidBaseUrl { provider: &'static str, url: String },

    /// The provider answered successfully but without the expected payload
    #[error("{provider} response is missing {what}")]
    MissingData {
        provider: &'static str,
        what: &'static str,
    },
}

impl CatalogError {
    /// Whether the error was raised before any upstream call
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            CatalogError::UnsupportedType(_)
                | CatalogError::NotEpisodic(_)
                | CatalogError::InvalidId { .. }
        )
    }
}

/// Type alias for Result with CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
