//! Settings commands
//!
//! Reading and updating the persisted settings, one section at a time.
//! Updates are written to disk and take effect on the next start.

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::{AppSettings, FeedSettings, LocationSettings, MapSettings};

/// Get the persisted settings
pub async fn get_settings(state: &AppState) -> Result<AppSettings> {
    state.settings_service.load().await
}

/// Update feed settings
pub async fn update_feed_settings(state: &AppState, feed: FeedSettings) -> Result<()> {
    ensure_unlocked(state)?;
    state.settings_service.update_feed(feed).await?;
    tracing::info!("Feed settings updated; restart to apply");
    Ok(())
}

/// Update location settings
pub async fn update_location_settings(state: &AppState, location: LocationSettings) -> Result<()> {
    ensure_unlocked(state)?;
    state.settings_service.update_location(location).await?;
    tracing::info!("Location settings updated; restart to apply");
    Ok(())
}

/// Update map settings
pub async fn update_map_settings(state: &AppState, map: MapSettings) -> Result<()> {
    ensure_unlocked(state)?;
    state.settings_service.update_map(map).await?;
    tracing::info!("Map settings updated; restart to apply");
    Ok(())
}

// Nothing is written back to disk once panic has wiped it.
fn ensure_unlocked(state: &AppState) -> Result<()> {
    if state.session.is_panic_engaged() {
        return Err(AppError::PanicEngaged);
    }
    Ok(())
}
