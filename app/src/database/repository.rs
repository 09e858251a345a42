//! Repository layer for database operations
//!
//! CRUD operations for document and identity rows. Documents are
//! append-only: there is no update or delete path.

use super::models::*;
use crate::error::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Close the pool; later queries fail with `PoolClosed`
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert a document
    pub async fn insert_document(&self, req: InsertDocumentRequest) -> Result<DocumentRecord> {
        let document = sqlx::query_as::<_, DocumentRecord>(
            r#"
            INSERT INTO documents (id, collection, data_json, server_time, server_time_us)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, collection, data_json, server_time
            "#,
        )
        .bind(&req.id)
        .bind(&req.collection)
        .bind(&req.data_json)
        .bind(req.server_time)
        .bind(req.server_time.timestamp_micros())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Inserted document {} into {}", document.id, document.collection);
        Ok(document)
    }

    /// List documents of a collection ordered by server time.
    ///
    /// Documents written in the same microsecond keep insertion order.
    pub async fn list_documents(
        &self,
        collection: &str,
        direction: SortDirection,
        limit: u32,
    ) -> Result<Vec<DocumentRecord>> {
        let sql = match direction {
            SortDirection::Descending => {
                r#"
                SELECT id, collection, data_json, server_time FROM documents
                WHERE collection = ?
                ORDER BY server_time_us DESC, rowid DESC
                LIMIT ?
                "#
            }
            SortDirection::Ascending => {
                r#"
                SELECT id, collection, data_json, server_time FROM documents
                WHERE collection = ?
                ORDER BY server_time_us ASC, rowid ASC
                LIMIT ?
                "#
            }
        };

        let documents = sqlx::query_as::<_, DocumentRecord>(sql)
            .bind(collection)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(documents)
    }

    /// Count documents in a collection
    pub async fn count_documents(&self, collection: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Issue a new anonymous identity
    pub async fn create_identity(&self) -> Result<IdentityRecord> {
        let uid = Uuid::new_v4().to_string();
        let now = Utc::now();

        let identity = sqlx::query_as::<_, IdentityRecord>(
            r#"
            INSERT INTO identities (uid, created_at)
            VALUES (?, ?)
            RETURNING *
            "#,
        )
        .bind(&uid)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created anonymous identity: {}", uid);
        Ok(identity)
    }
}
