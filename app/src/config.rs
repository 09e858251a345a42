//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the application.

// ===== Remote Collection =====

/// Name of the remote collection holding sighting reports
pub const SIGHTINGS_COLLECTION: &str = "sightings";

/// Default number of most recent sightings kept in the live feed window.
/// Older sightings drop out of view without being deleted.
pub const DEFAULT_FEED_WINDOW: u32 = 100;

/// Smallest accepted feed window
pub const MIN_FEED_WINDOW: u32 = 1;

/// Largest accepted feed window
pub const MAX_FEED_WINDOW: u32 = 500;

// ===== Report Defaults =====

/// Stored in place of empty or missing notes on submission
pub const DEFAULT_NOTES: &str = "No specific details.";

/// Shown for a report whose server timestamp has not come back yet
pub const JUST_NOW_LABEL: &str = "Just now";

/// Shown when a distance cannot be computed
pub const UNKNOWN_DISTANCE_LABEL: &str = "?";

/// Notice shown to the user when a submission fails
pub const SUBMIT_FAILURE_NOTICE: &str = "Could not log sighting.";

/// Notice shown above the feed
pub const FEED_NOTICE: &str = "Recent sightings. Verify species before logging.";

// ===== Geodesy =====

/// Mean earth radius in kilometers used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers to statute miles
pub const KM_TO_MILES: f64 = 0.621371;

// ===== Location Limits =====

/// Default time allowed for a single device location sample
pub const DEFAULT_LOCATION_TIMEOUT_MS: u64 = 5_000;

/// Minimum location timeout in milliseconds.
/// Shorter values make a fresh fix practically impossible.
pub const MIN_LOCATION_TIMEOUT_MS: u64 = 250;

/// Maximum location timeout in milliseconds (1 minute).
/// Submissions wait on this, so it must stay bounded.
pub const MAX_LOCATION_TIMEOUT_MS: u64 = 60_000;

// ===== Map Defaults =====

/// Latitude of the map center used when the user location is unknown
pub const DEFAULT_MAP_CENTER_LAT: f64 = 40.518;

/// Longitude of the map center used when the user location is unknown
pub const DEFAULT_MAP_CENTER_LNG: f64 = -78.394;

/// Default map zoom level
pub const DEFAULT_MAP_ZOOM: u8 = 13;

/// Maximum slippy-map zoom level
pub const MAX_MAP_ZOOM: u8 = 19;

// ===== Cover Page =====

pub const COVER_TITLE: &str = "Altoona Nature Society";
pub const COVER_BODY: &str = "Dedicated to the preservation of local wildlife in Blair County.";
pub const COVER_IMAGE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/4/4e/Blue_Jay_in_Through_the_Window_%285157121735%29.jpg/640px-Blue_Jay_in_Through_the_Window_%285157121735%29.jpg";
pub const COVER_IMAGE_ALT: &str = "Blue Jay";
pub const COVER_FOOTER: &str = "Silence is observed during nesting season.";

// ===== Backend =====

/// Capacity of the in-process change fan-out channel.
/// Lagging watchers simply re-query, so this only bounds memory.
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;
