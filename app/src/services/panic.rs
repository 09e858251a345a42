//! Panic switch
//!
//! One-way latch that hides the app behind the cover page. Engaging it
//! also wipes everything kept in the local store and puts the settings
//! file back to defaults, which drops any saved position. Nothing releases
//! the latch short of restarting the process.

use crate::services::SettingsService;
use crate::storage::LocalStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct PanicSwitch {
    engaged: Arc<AtomicBool>,
    local_store: LocalStore,
    settings: SettingsService,
}

impl PanicSwitch {
    pub fn new(local_store: LocalStore, settings: SettingsService) -> Self {
        Self {
            engaged: Arc::new(AtomicBool::new(false)),
            local_store,
            settings,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::SeqCst)
    }

    /// Engage the latch, then clear local state.
    ///
    /// The latch is set before the wipe so the cover page shows even if
    /// clearing fails; failed wipes are logged only.
    pub async fn engage(&self) {
        let first = !self.engaged.swap(true, Ordering::SeqCst);
        if first {
            tracing::warn!("Panic switch engaged");
        }

        if let Err(e) = self.local_store.clear().await {
            tracing::error!("Failed to clear local state: {}", e);
        }

        if let Err(e) = self.settings.reset().await {
            tracing::error!("Failed to reset settings: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use crate::services::settings::LocationSettings;
    use tempfile::TempDir;

    async fn create_test_switch() -> (PanicSwitch, LocalStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = LocalStore::new(temp_dir.path().join("local"));
        store.initialize().await.unwrap();
        let settings = SettingsService::new(temp_dir.path().to_path_buf());
        (PanicSwitch::new(store.clone(), settings), store, temp_dir)
    }

    #[tokio::test]
    async fn test_engage_sets_latch_and_clears_store() {
        let (switch, store, _temp) = create_test_switch().await;
        store.set("recent_code", "Nest").await.unwrap();

        assert!(!switch.is_engaged());
        switch.engage().await;

        assert!(switch.is_engaged());
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_latch_is_shared_and_permanent() {
        let (switch, _store, _temp) = create_test_switch().await;
        let other = switch.clone();

        switch.engage().await;
        switch.engage().await;

        assert!(other.is_engaged());
    }

    #[tokio::test]
    async fn test_engage_forgets_saved_position() {
        let (switch, _store, temp) = create_test_switch().await;
        let settings = SettingsService::new(temp.path().to_path_buf());
        settings
            .update_location(LocationSettings {
                timeout_ms: 2_000,
                fixed_position: Some(Coordinates::new(40.5, -78.4)),
            })
            .await
            .unwrap();

        switch.engage().await;

        let content = std::fs::read_to_string(temp.path().join("settings.json")).unwrap();
        assert!(!content.contains("40.5"));
        assert_eq!(settings.get_location().await.unwrap(), LocationSettings::default());
    }
}
