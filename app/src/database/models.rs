//! Database models
//!
//! Rows of the embedded document database. Documents keep their fields as
//! a JSON string; the server timestamp is duplicated into a numeric
//! column so ordering never depends on string formatting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored document of some collection
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentRecord {
    pub id: String,
    pub collection: String,
    /// JSON object with every server timestamp already resolved
    pub data_json: String,
    pub server_time: DateTime<Utc>,
}

/// Insert document request
#[derive(Debug)]
pub struct InsertDocumentRequest {
    pub id: String,
    pub collection: String,
    pub data_json: String,
    pub server_time: DateTime<Utc>,
}

/// An anonymous identity issued at sign-in
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdentityRecord {
    pub uid: String,
    pub created_at: DateTime<Utc>,
}

/// Sort direction for collection queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}
