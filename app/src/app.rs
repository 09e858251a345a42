//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::backend::{DocumentStore, Identity, SqliteDocumentStore};
use crate::categories::CategoryRegistry;
use crate::error::Result;
use crate::models::{Coordinates, Report};
use crate::services::location::FixedLocation;
use crate::services::{
    AppSettings, LocationService, LocationSource, PanicSwitch, ReportsService, SettingsService,
};
use crate::session::SessionState;
use crate::storage::LocalStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    /// Settings in effect for this session; changes apply on next start
    pub settings: AppSettings,
    pub settings_service: SettingsService,
    /// `None` when anonymous sign-in failed at startup
    pub identity: Option<Identity>,
    pub registry: Arc<CategoryRegistry>,
    pub reports_service: ReportsService,
    pub location_service: LocationService,
    pub local_store: LocalStore,
    pub session: SessionState,
    /// Latest decoded sightings snapshot
    pub feed: Arc<watch::Sender<Arc<Vec<Report>>>>,
    /// Startup location hint used for distances and map centering
    pub user_location: Arc<RwLock<Option<Coordinates>>>,
}

impl AppState {
    /// Wire the services together around an already opened backend.
    ///
    /// Signs in anonymously; a failed sign-in is logged and leaves the app
    /// usable in read-only fashion.
    pub async fn with_store(
        app_data_dir: PathBuf,
        settings: AppSettings,
        store: Arc<dyn DocumentStore>,
        location_source: Option<Arc<dyn LocationSource>>,
    ) -> Result<Self> {
        settings.validate()?;

        let identity = match store.sign_in_anonymously().await {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::error!("Connection error: {}", e);
                None
            }
        };

        let location_source = location_source.or_else(|| {
            settings
                .location
                .fixed_position
                .map(|position| Arc::new(FixedLocation(position)) as Arc<dyn LocationSource>)
        });
        let location_service = LocationService::new(
            location_source,
            Duration::from_millis(settings.location.timeout_ms),
        );

        let reports_service = ReportsService::new(
            store,
            location_service.clone(),
            settings.feed.window_limit,
        );

        let local_store = LocalStore::new(app_data_dir.join("local"));
        local_store.initialize().await?;

        let settings_service = SettingsService::new(app_data_dir.clone());
        let session = SessionState::new(PanicSwitch::new(
            local_store.clone(),
            settings_service.clone(),
        ));
        let (feed, _) = watch::channel(Arc::new(Vec::new()));

        Ok(Self {
            app_data_dir,
            settings,
            settings_service,
            identity,
            registry: Arc::new(CategoryRegistry::builtin()),
            reports_service,
            location_service,
            local_store,
            session,
            feed: Arc::new(feed),
            user_location: Arc::new(RwLock::new(None)),
        })
    }

    /// Current sightings snapshot
    pub fn latest_reports(&self) -> Arc<Vec<Report>> {
        self.feed.borrow().clone()
    }

    pub async fn user_location(&self) -> Option<Coordinates> {
        *self.user_location.read().await
    }
}

/// Application setup - called once on startup
pub async fn setup(
    app_data_dir: PathBuf,
    location_source: Option<Arc<dyn LocationSource>>,
) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", app_data_dir);

    std::fs::create_dir_all(&app_data_dir)?;

    let settings = SettingsService::new(app_data_dir.clone()).load().await?;
    let store = SqliteDocumentStore::open(&app_data_dir.join("backend.db")).await?;

    let state = AppState::with_store(app_data_dir, settings, Arc::new(store), location_source).await?;

    tracing::info!("Application initialized successfully");

    Ok(state)
}
