//! Map projection
//!
//! One marker per sighting that has a usable location. Sightings stored
//! with the "no location" sentinel never reach the map.

use crate::categories::CategoryRegistry;
use crate::config;
use crate::models::{Coordinates, Report};
use serde::Serialize;

/// A positioned marker with the data its popup shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub report_id: String,
    pub position: Coordinates,
    pub pin_color: String,
    pub code: String,
    pub glyph: String,
    pub color_token: String,
    pub notes: String,
}

/// Initial center and zoom of the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapViewport {
    pub center: Coordinates,
    pub zoom: u8,
}

pub fn project(reports: &[Report], registry: &CategoryRegistry) -> Vec<MapMarker> {
    reports
        .iter()
        .filter_map(|report| {
            let position = report.known_location()?;
            let category = registry.resolve_or_default(&report.category_code);

            Some(MapMarker {
                report_id: report.id.clone(),
                position,
                pin_color: category.pin_color.clone(),
                code: category.code.clone(),
                glyph: category.glyph.clone(),
                color_token: category.color_token.clone(),
                notes: report.notes.clone(),
            })
        })
        .collect()
}

/// Center on the user when their location is known, else on `fallback`
pub fn viewport(user_location: Option<Coordinates>, fallback: Coordinates, zoom: u8) -> MapViewport {
    MapViewport {
        center: user_location.unwrap_or(fallback),
        zoom: zoom.min(config::MAX_MAP_ZOOM),
    }
}
