//! Sighting commands

use crate::app::AppState;
use crate::categories::CategoryDescriptor;
use crate::error::Result;
use crate::session::View;

/// Submit a sighting and return to the feed.
///
/// Only one submission runs at a time; a second call while one is in
/// flight fails with `SubmissionInProgress`. On failure the view stays
/// where it was and the error carries the user notice.
pub async fn submit_sighting(
    state: &AppState,
    category_code: String,
    notes: Option<String>,
) -> Result<String> {
    let _slot = state.session.begin_submission()?;

    match state
        .reports_service
        .submit(&category_code, notes.as_deref())
        .await
    {
        Ok(id) => {
            if let Err(e) = state.session.navigate(View::Feed).await {
                tracing::debug!("Not returning to feed: {}", e);
            }
            Ok(id)
        }
        Err(e) => {
            tracing::error!("{} ({})", e.notice(), e);
            Err(e.into())
        }
    }
}

/// Categories offered on the report entry screen, in order
pub fn list_categories(state: &AppState) -> Vec<CategoryDescriptor> {
    state.registry.entries().to_vec()
}
