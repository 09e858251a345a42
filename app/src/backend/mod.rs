//! Document backend
//!
//! The contract the application needs from a hosted document database:
//! anonymous sign-in, appending documents with server-assigned timestamps,
//! and live queries that re-deliver the full ordered result on every change.
//!
//! `SqliteDocumentStore` is the embedded implementation used by the app
//! and the tests.

pub mod sqlite;

pub use sqlite::SqliteDocumentStore;

use crate::database::SortDirection;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Session identity returned by anonymous sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub uid: String,
    pub signed_in_at: DateTime<Utc>,
}

/// A field of a document being written
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(serde_json::Value),
    /// Replaced by the commit time on the server
    ServerTimestamp,
}

/// A document about to be appended to a collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDocument {
    fields: BTreeMap<String, FieldValue>,
}

impl NewDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields
            .insert(key.to_string(), FieldValue::Value(value.into()));
        self
    }

    pub fn server_timestamp(mut self, key: &str) -> Self {
        self.fields
            .insert(key.to_string(), FieldValue::ServerTimestamp);
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Render the fields, writing `server_time` (or null while the write is
    /// still pending) into every server timestamp field.
    pub fn resolve(&self, server_time: Option<DateTime<Utc>>) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, field) in &self.fields {
            let value = match field {
                FieldValue::Value(v) => v.clone(),
                FieldValue::ServerTimestamp => match server_time {
                    Some(ts) => serde_json::Value::String(ts.to_rfc3339()),
                    None => serde_json::Value::Null,
                },
            };
            object.insert(key.clone(), value);
        }
        serde_json::Value::Object(object)
    }
}

/// A live query over one collection, ordered by server time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    pub direction: SortDirection,
    pub limit: u32,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            direction: SortDirection::Descending,
            limit: u32::MAX,
        }
    }

    pub fn order_by_server_time(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// One document of a query result
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: serde_json::Value,
    /// Written locally, not yet committed by the server
    pub has_pending_writes: bool,
}

/// The full ordered result of a query at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshot {
    pub docs: Vec<DocumentSnapshot>,
}

/// Stream of snapshots for a live query.
///
/// Dropping the watch stops the producer.
pub struct QueryWatch {
    receiver: mpsc::UnboundedReceiver<QuerySnapshot>,
    producer: JoinHandle<()>,
}

impl QueryWatch {
    pub fn new(receiver: mpsc::UnboundedReceiver<QuerySnapshot>, producer: JoinHandle<()>) -> Self {
        Self { receiver, producer }
    }

    /// Wait for the next snapshot. `None` once the backend closed the query.
    pub async fn next(&mut self) -> Option<QuerySnapshot> {
        self.receiver.recv().await
    }
}

impl Drop for QueryWatch {
    fn drop(&mut self) {
        self.producer.abort();
    }
}

/// Hosted document database as seen by the client
pub trait DocumentStore: Send + Sync {
    /// Obtain an anonymous session identity. Required before writing.
    fn sign_in_anonymously(&self) -> BoxFuture<'_, Result<Identity>>;

    /// Append a document, returning its store-assigned id.
    fn add_document<'a>(
        &'a self,
        collection: &'a str,
        document: NewDocument,
    ) -> BoxFuture<'a, Result<String>>;

    /// Open a live query. Fails if the query cannot be established; the
    /// first snapshot is delivered immediately after.
    fn watch(&self, query: Query) -> BoxFuture<'_, Result<QueryWatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_pending_and_committed() {
        let doc = NewDocument::new()
            .set("type", "Nest")
            .set("location", json!({ "lat": 1.0, "lng": 2.0 }))
            .server_timestamp("timestamp");

        let pending = doc.resolve(None);
        assert_eq!(pending["type"], "Nest");
        assert!(pending["timestamp"].is_null());

        let ts = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let committed = doc.resolve(Some(ts));
        assert_eq!(committed["timestamp"], "2026-01-02T03:04:05+00:00");
        assert_eq!(committed["location"]["lng"], 2.0);
    }

    #[test]
    fn test_query_builder() {
        let q = Query::collection("sightings")
            .order_by_server_time(SortDirection::Descending)
            .limit(50);

        assert_eq!(q.collection, "sightings");
        assert_eq!(q.direction, SortDirection::Descending);
        assert_eq!(q.limit, 50);
    }
}
