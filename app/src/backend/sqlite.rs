//! Embedded document store
//!
//! Implements the backend contract on top of the SQLite repository.
//! Every write is announced on a broadcast channel; each live query owns a
//! task that re-runs its query on every announcement and forwards the new
//! snapshot when it differs from the previous one.
//!
//! Writes are latency compensated: a document shows up in snapshots as a
//! pending write (server timestamps null) before it is committed.

use super::{BoxFuture, DocumentSnapshot, DocumentStore, Identity, NewDocument, Query, QuerySnapshot, QueryWatch};
use crate::config;
use crate::database::{create_pool, InsertDocumentRequest, Repository, SortDirection};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{mpsc, Mutex, RwLock};
use uuid::Uuid;

/// A local write that has not been committed yet
#[derive(Debug, Clone)]
struct PendingWrite {
    id: String,
    collection: String,
    data: serde_json::Value,
}

/// Document store backed by SQLite with in-process change fan-out
#[derive(Clone)]
pub struct SqliteDocumentStore {
    repo: Repository,
    changes: broadcast::Sender<String>,
    pending: Arc<Mutex<Vec<PendingWrite>>>,
    identity: Arc<RwLock<Option<Identity>>>,
    last_server_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl SqliteDocumentStore {
    pub fn new(repo: Repository) -> Self {
        let (changes, _) = broadcast::channel(config::CHANGE_CHANNEL_CAPACITY);
        Self {
            repo,
            changes,
            pending: Arc::new(Mutex::new(Vec::new())),
            identity: Arc::new(RwLock::new(None)),
            last_server_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Open (creating if needed) the database file and wrap it in a store
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = create_pool(db_path).await?;
        Ok(Self::new(Repository::new(pool)))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Identity of the current session, if signed in
    pub async fn current_identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// Close the underlying pool. Every later operation fails.
    pub async fn close(&self) {
        self.repo.close().await;
        tracing::info!("Document store closed");
    }

    /// Commit time for the next write, never earlier than the previous one
    async fn next_server_time(&self) -> DateTime<Utc> {
        let mut last = self.last_server_time.lock().await;
        let now = Utc::now();
        let ts = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(ts);
        ts
    }

    fn notify(&self, collection: &str) {
        // No receivers just means nobody is watching.
        let _ = self.changes.send(collection.to_string());
    }

    /// Current result of a query, pending writes included
    async fn snapshot(&self, query: &Query) -> Result<QuerySnapshot> {
        // Pending first: a write committing in between then shows up twice
        // and is deduplicated, instead of vanishing for one snapshot.
        let pending: Vec<PendingWrite> = self
            .pending
            .lock()
            .await
            .iter()
            .filter(|w| w.collection == query.collection)
            .cloned()
            .collect();

        let records = self
            .repo
            .list_documents(&query.collection, query.direction, query.limit)
            .await?;

        let mut committed = Vec::with_capacity(records.len());
        for record in records {
            match serde_json::from_str(&record.data_json) {
                Ok(data) => committed.push(DocumentSnapshot {
                    id: record.id,
                    data,
                    has_pending_writes: false,
                }),
                Err(e) => tracing::warn!("Document {} has unreadable data: {}", record.id, e),
            }
        }

        let committed_ids: HashSet<&str> = committed.iter().map(|d| d.id.as_str()).collect();
        let pending_docs: Vec<DocumentSnapshot> = pending
            .into_iter()
            .filter(|w| !committed_ids.contains(w.id.as_str()))
            .map(|w| DocumentSnapshot {
                id: w.id,
                data: w.data,
                has_pending_writes: true,
            })
            .collect();

        // Pending writes have no server time yet; they sort as the newest.
        let mut docs = match query.direction {
            SortDirection::Descending => {
                let mut docs: Vec<DocumentSnapshot> = pending_docs.into_iter().rev().collect();
                docs.extend(committed);
                docs
            }
            SortDirection::Ascending => {
                let mut docs = committed;
                docs.extend(pending_docs);
                docs
            }
        };
        docs.truncate(query.limit as usize);

        Ok(QuerySnapshot { docs })
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn sign_in_anonymously(&self) -> BoxFuture<'_, Result<Identity>> {
        Box::pin(async move {
            let record = self.repo.create_identity().await?;
            let identity = Identity {
                uid: record.uid,
                signed_in_at: record.created_at,
            };

            *self.identity.write().await = Some(identity.clone());
            tracing::info!("Signed in anonymously as {}", identity.uid);

            Ok(identity)
        })
    }

    fn add_document<'a>(
        &'a self,
        collection: &'a str,
        document: NewDocument,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            if self.identity.read().await.is_none() {
                return Err(AppError::Unauthenticated);
            }

            let id = Uuid::new_v4().to_string();

            self.pending.lock().await.push(PendingWrite {
                id: id.clone(),
                collection: collection.to_string(),
                data: document.resolve(None),
            });
            self.notify(collection);

            let server_time = self.next_server_time().await;
            let result = match serde_json::to_string(&document.resolve(Some(server_time))) {
                Ok(data_json) => {
                    self.repo
                        .insert_document(InsertDocumentRequest {
                            id: id.clone(),
                            collection: collection.to_string(),
                            data_json,
                            server_time,
                        })
                        .await
                }
                Err(e) => Err(e.into()),
            };

            self.pending.lock().await.retain(|w| w.id != id);
            self.notify(collection);

            match result {
                Ok(record) => {
                    tracing::debug!("Committed document {} to {}", record.id, collection);
                    Ok(record.id)
                }
                Err(e) => {
                    tracing::error!("Write to {} failed: {}", collection, e);
                    Err(e)
                }
            }
        })
    }

    fn watch(&self, query: Query) -> BoxFuture<'_, Result<QueryWatch>> {
        Box::pin(async move {
            // Subscribe before the first read so no change slips in between.
            let mut changes = self.changes.subscribe();
            let initial = self.snapshot(&query).await?;

            let (tx, rx) = mpsc::unbounded_channel();
            let mut last = initial.clone();
            let _ = tx.send(initial);

            tracing::debug!(
                "Opened live query on {} (limit {})",
                query.collection,
                query.limit
            );

            let store = self.clone();
            let producer = tokio::spawn(async move {
                loop {
                    match changes.recv().await {
                        Ok(collection) if collection != query.collection => continue,
                        Ok(_) | Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => break,
                    }

                    match store.snapshot(&query).await {
                        Ok(snapshot) => {
                            if snapshot == last {
                                continue;
                            }
                            last = snapshot.clone();
                            if tx.send(snapshot).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::error!("Live query on {} failed: {}", query.collection, e)
                        }
                    }
                }
                tracing::debug!("Live query on {} stopped", query.collection);
            });

            Ok(QueryWatch::new(rx, producer))
        })
    }
}
