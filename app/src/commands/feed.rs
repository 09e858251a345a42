//! Feed commands
//!
//! Mounting the live feed and refreshing the startup location hint.

use crate::app::AppState;
use crate::models::Report;
use crate::services::Subscription;
use std::sync::Arc;
use tokio::sync::watch;

/// Start delivering sightings into `AppState::feed`.
///
/// Keep the returned subscription for as long as the feed is mounted.
/// A failure to open the live query is logged and yields `None`; the feed
/// then stays at its last contents.
pub async fn mount_feed(state: &AppState) -> Option<Subscription> {
    let feed = Arc::clone(&state.feed);

    match state
        .reports_service
        .subscribe(move |reports| {
            feed.send_replace(Arc::new(reports));
        })
        .await
    {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            tracing::error!("Connection error: {}", e);
            None
        }
    }
}

/// Receiver that observes every new sightings snapshot
pub fn watch_feed(state: &AppState) -> watch::Receiver<Arc<Vec<Report>>> {
    state.feed.subscribe()
}

/// Sample the device location once and keep it as the user location hint.
///
/// An unavailable location leaves the previous hint untouched.
pub async fn refresh_user_location(state: &AppState) {
    if let Some(position) = state.location_service.sample().await {
        *state.user_location.write().await = Some(position);
        tracing::debug!("User location updated");
    }
}
