//! Reports service
//!
//! Bridges the sightings collection of the document backend and the rest
//! of the app: live snapshots are decoded into `Report`s and handed to a
//! callback, and submissions are appended with a fresh location sample.

use crate::backend::{DocumentStore, NewDocument, Query};
use crate::config;
use crate::database::SortDirection;
use crate::error::{Result, SubmitError};
use crate::models::Report;
use crate::services::LocationService;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to a live feed subscription.
///
/// Delivery stops when the handle is dropped or `unsubscribe` is called.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!("Sightings subscription released");
    }
}

/// Service for reading and submitting sightings
#[derive(Clone)]
pub struct ReportsService {
    store: Arc<dyn DocumentStore>,
    location: LocationService,
    window: u32,
}

impl ReportsService {
    pub fn new(store: Arc<dyn DocumentStore>, location: LocationService, window: u32) -> Self {
        Self {
            store,
            location,
            window,
        }
    }

    /// Number of most recent sightings the feed keeps
    pub fn window(&self) -> u32 {
        self.window
    }

    fn feed_query(&self) -> Query {
        Query::collection(config::SIGHTINGS_COLLECTION)
            .order_by_server_time(SortDirection::Descending)
            .limit(self.window)
    }

    /// Subscribe to the newest sightings.
    ///
    /// `on_update` receives the complete ordered list on every change,
    /// starting with the current contents. Documents that are not
    /// sightings are left out.
    pub async fn subscribe<F>(&self, mut on_update: F) -> Result<Subscription>
    where
        F: FnMut(Vec<Report>) + Send + 'static,
    {
        let mut watch = self.store.watch(self.feed_query()).await?;
        tracing::info!("Subscribed to sightings (window {})", self.window);

        let task = tokio::spawn(async move {
            while let Some(snapshot) = watch.next().await {
                let reports: Vec<Report> = snapshot
                    .docs
                    .iter()
                    .filter_map(|doc| Report::from_document(&doc.id, &doc.data))
                    .collect();

                tracing::debug!(
                    "Sightings snapshot: {} of {} documents usable",
                    reports.len(),
                    snapshot.docs.len()
                );
                on_update(reports);
            }
        });

        Ok(Subscription { task })
    }

    /// Submit a sighting, returning the new document id.
    ///
    /// Empty or missing notes are replaced by the default text. When no
    /// location can be sampled the sentinel is stored instead.
    pub async fn submit(
        &self,
        category_code: &str,
        notes: Option<&str>,
    ) -> std::result::Result<String, SubmitError> {
        let notes = match notes {
            Some(text) if !text.is_empty() => text,
            _ => config::DEFAULT_NOTES,
        };

        let location = self.location.sample_or_sentinel().await;

        let document = NewDocument::new()
            .set("type", category_code)
            .set("notes", notes)
            .set(
                "location",
                serde_json::json!({ "lat": location.lat, "lng": location.lng }),
            )
            .server_timestamp("timestamp");

        tracing::info!("Submitting {} sighting", category_code);

        let id = self
            .store
            .add_document(config::SIGHTINGS_COLLECTION, document)
            .await?;

        tracing::info!("Sighting logged: {}", id);

        Ok(id)
    }
}
