//! API models for request and response payloads

use serde::Deserialize;

pub mod activity;

/// Query parameters shared by `/api/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(rename = "type")]
    pub media_type: String,
}

/// Query parameters shared by `/api/detail` and `/api/chapter`
#[derive(Debug, Clone, Deserialize)]
pub struct LookupQuery {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: String,
}
