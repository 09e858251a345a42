//! Services module
//!
//! Business logic that sits between the command surface and the backend.

pub mod feed;
pub mod location;
pub mod map;
pub mod panic;
pub mod reports;
pub mod settings;

pub use feed::{DistanceMode, ReportView};
pub use location::{LocationService, LocationSource};
pub use map::{MapMarker, MapViewport};
pub use panic::PanicSwitch;
pub use reports::{ReportsService, Subscription};
pub use settings::{AppSettings, FeedSettings, LocationSettings, MapSettings, SettingsService};
