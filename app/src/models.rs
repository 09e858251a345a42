//! Domain models
//!
//! Sighting reports as the rest of the application sees them, decoded
//! from raw backend documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Stored on reports whose location was unavailable at submission time.
    pub const SENTINEL: Coordinates = Coordinates { lat: 0.0, lng: 0.0 };

    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True for the "no location" marker.
    ///
    /// A genuine fix at exactly 0°N 0°E is indistinguishable from it and is
    /// treated as absent too.
    pub fn is_sentinel(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A sighting report as delivered by the live feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    /// Category code; may name a category the registry does not know
    pub category_code: String,
    pub notes: String,
    /// Raw stored location, including the sentinel
    pub location: Option<Coordinates>,
    /// `None` until the server timestamp of a fresh submission comes back
    pub timestamp: Option<DateTime<Utc>>,
}

impl Report {
    /// Location usable for distance and map placement.
    pub fn known_location(&self) -> Option<Coordinates> {
        self.location.filter(|loc| !loc.is_sentinel())
    }

    /// Decode a backend document. Returns `None` for documents that do not
    /// have the sighting shape.
    pub fn from_document(id: &str, data: &serde_json::Value) -> Option<Report> {
        match serde_json::from_value::<SightingDocument>(data.clone()) {
            Ok(SightingDocument {
                location: Some(location),
                ..
            }) if !location.is_in_range() => {
                tracing::warn!(
                    "Skipping malformed sighting {}: location out of range ({}, {})",
                    id,
                    location.lat,
                    location.lng
                );
                None
            }
            Ok(doc) => Some(Report {
                id: id.to_string(),
                category_code: doc.kind,
                notes: doc.notes,
                location: doc.location,
                timestamp: doc.timestamp,
            }),
            Err(e) => {
                tracing::warn!("Skipping malformed sighting {}: {}", id, e);
                None
            }
        }
    }
}

/// Wire shape of a document in the sightings collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: String,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
