//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config;
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Live feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Number of newest sightings kept in view
    #[serde(default = "default_window_limit")]
    pub window_limit: u32,
    /// Show the distance from the user on each feed row
    #[serde(default = "default_true")]
    pub show_distance: bool,
}

fn default_window_limit() -> u32 {
    config::DEFAULT_FEED_WINDOW
}

fn default_true() -> bool {
    true
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            window_limit: default_window_limit(),
            show_distance: true,
        }
    }
}

/// Device location settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    /// Longest wait for one location sample in milliseconds
    #[serde(default = "default_location_timeout")]
    pub timeout_ms: u64,
    /// Fixed position reported by a host without a location sensor
    #[serde(default)]
    pub fixed_position: Option<Coordinates>,
}

fn default_location_timeout() -> u64 {
    config::DEFAULT_LOCATION_TIMEOUT_MS
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_location_timeout(),
            fixed_position: None,
        }
    }
}

/// Map view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Center used when the user location is unknown
    #[serde(default = "default_map_center")]
    pub default_center: Coordinates,
    #[serde(default = "default_map_zoom")]
    pub zoom: u8,
}

fn default_map_center() -> Coordinates {
    Coordinates::new(config::DEFAULT_MAP_CENTER_LAT, config::DEFAULT_MAP_CENTER_LNG)
}

fn default_map_zoom() -> u8 {
    config::DEFAULT_MAP_ZOOM
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: default_map_center(),
            zoom: default_map_zoom(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub feed: FeedSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub map: MapSettings,
}

impl AppSettings {
    /// Check every value against the limits in `config`
    pub fn validate(&self) -> Result<()> {
        let window = self.feed.window_limit;
        if !(config::MIN_FEED_WINDOW..=config::MAX_FEED_WINDOW).contains(&window) {
            return Err(AppError::InvalidSettings(format!(
                "feed window must be between {} and {}, got {}",
                config::MIN_FEED_WINDOW,
                config::MAX_FEED_WINDOW,
                window
            )));
        }

        let timeout = self.location.timeout_ms;
        if !(config::MIN_LOCATION_TIMEOUT_MS..=config::MAX_LOCATION_TIMEOUT_MS).contains(&timeout) {
            return Err(AppError::InvalidSettings(format!(
                "location timeout must be between {} and {} ms, got {}",
                config::MIN_LOCATION_TIMEOUT_MS,
                config::MAX_LOCATION_TIMEOUT_MS,
                timeout
            )));
        }

        if self.map.zoom > config::MAX_MAP_ZOOM {
            return Err(AppError::InvalidSettings(format!(
                "map zoom must be at most {}, got {}",
                config::MAX_MAP_ZOOM,
                self.map.zoom
            )));
        }

        let center = self.map.default_center;
        if !center.is_in_range() {
            return Err(AppError::InvalidSettings(format!(
                "map center out of range: {}, {}",
                center.lat, center.lng
            )));
        }

        Ok(())
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::InvalidSettings(format!("Failed to parse settings: {}", e)))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        settings.validate()?;

        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Overwrite the file with defaults
    pub async fn reset(&self) -> Result<()> {
        self.save(&AppSettings::default()).await?;
        tracing::info!("Settings reset to defaults");
        Ok(())
    }

    pub async fn get_feed(&self) -> Result<FeedSettings> {
        Ok(self.load().await?.feed)
    }

    pub async fn update_feed(&self, feed: FeedSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.feed = feed;
        self.save(&settings).await
    }

    pub async fn get_location(&self) -> Result<LocationSettings> {
        Ok(self.load().await?.location)
    }

    pub async fn update_location(&self, location: LocationSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.location = location;
        self.save(&settings).await
    }

    pub async fn get_map(&self) -> Result<MapSettings> {
        Ok(self.load().await?.map)
    }

    pub async fn update_map(&self, map: MapSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.map = map;
        self.save(&settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.feed.window_limit, 100);
        assert!(settings.feed.show_distance);
        assert_eq!(settings.location.timeout_ms, 5_000);
        assert_eq!(settings.location.fixed_position, None);
        assert_eq!(settings.map.default_center, Coordinates::new(40.518, -78.394));
        assert_eq!(settings.map.zoom, 13);
        assert!(temp.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{ "feed": { "window_limit": 50 } }"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.feed.window_limit, 50);
        assert!(settings.feed.show_distance);
        assert_eq!(settings.map.zoom, 13);
    }

    #[tokio::test]
    async fn test_update_persists_and_preserves_other_sections() {
        let temp_dir = TempDir::new().unwrap();

        {
            let service = SettingsService::new(temp_dir.path().to_path_buf());
            service
                .update_location(LocationSettings {
                    timeout_ms: 2_000,
                    fixed_position: Some(Coordinates::new(40.5, -78.4)),
                })
                .await
                .unwrap();
        }

        {
            let service = SettingsService::new(temp_dir.path().to_path_buf());
            let location = service.get_location().await.unwrap();
            assert_eq!(location.timeout_ms, 2_000);
            assert_eq!(location.fixed_position, Some(Coordinates::new(40.5, -78.4)));
            assert_eq!(service.get_feed().await.unwrap(), FeedSettings::default());
        }
    }

    #[tokio::test]
    async fn test_invalid_values_rejected() {
        let (service, _temp) = create_test_service();

        let result = service
            .update_feed(FeedSettings {
                window_limit: 0,
                show_distance: false,
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidSettings(_))));

        let result = service
            .update_location(LocationSettings {
                timeout_ms: 10,
                fixed_position: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidSettings(_))));

        let result = service
            .update_map(MapSettings {
                default_center: Coordinates::new(95.0, 0.0),
                zoom: 13,
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidSettings(_))));

        // Rejected updates leave the file untouched
        assert_eq!(service.load().await.unwrap(), AppSettings::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let (service, temp) = create_test_service();
        std::fs::write(temp.path().join("settings.json"), "{ not json").unwrap();

        assert!(matches!(
            service.load().await,
            Err(AppError::InvalidSettings(_))
        ));
    }
}
