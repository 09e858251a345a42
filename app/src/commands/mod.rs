//! Commands exposed to a UI shell
//!
//! This module organizes commands into logical submodules:
//! - `feed`: Live feed subscription and location refresh
//! - `views`: Navigation and screen rendering
//! - `sightings`: Sighting submission and categories
//! - `panic`: The panic switch
//! - `settings`: Persisted settings
//!
//! All commands follow the pattern:
//! - Take `&AppState` as first parameter
//! - Return `Result<T, AppError>` when they can fail
//! - Are async when performing I/O

pub mod feed;
pub mod panic;
pub mod settings;
pub mod sightings;
pub mod views;

pub use feed::*;
pub use panic::*;
pub use settings::*;
pub use sightings::*;
pub use views::*;

use crate::app::AppState;
use serde::Serialize;

/// Get application information
pub async fn get_app_info(state: &AppState) -> AppInfo {
    AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        signed_in: state.identity.is_some(),
        feed_window: state.reports_service.window(),
    }
}

/// Application information structure
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub signed_in: bool,
    pub feed_window: u32,
}
