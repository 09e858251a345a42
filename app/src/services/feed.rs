//! Feed reconciliation
//!
//! Turns the latest sightings snapshot into feed rows. The snapshot order
//! is kept as delivered.

use crate::categories::{CategoryDescriptor, CategoryRegistry, CategoryResolution};
use crate::config;
use crate::models::{Coordinates, Report};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whether feed rows carry a distance from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    #[default]
    Hidden,
    Shown,
}

/// One row of the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub id: String,
    pub category: CategoryDescriptor,
    /// True when the report's code was unknown and the default category was used
    pub used_default_category: bool,
    pub notes: String,
    pub time_label: String,
    /// Miles with one decimal, `"?"` when unknown, absent when hidden
    pub distance_label: Option<String>,
}

/// Build feed rows for `reports` as of `now`
pub fn reconcile(
    reports: &[Report],
    user_location: Option<Coordinates>,
    registry: &CategoryRegistry,
    now: DateTime<Utc>,
    mode: DistanceMode,
) -> Vec<ReportView> {
    reports
        .iter()
        .map(|report| {
            let (category, used_default_category) = match registry.resolve(&report.category_code) {
                CategoryResolution::Found(descriptor) => (descriptor, false),
                CategoryResolution::UseDefault => (registry.default_entry(), true),
            };

            let distance_label = match mode {
                DistanceMode::Shown => Some(distance_label(user_location, report.location)),
                DistanceMode::Hidden => None,
            };

            ReportView {
                id: report.id.clone(),
                category: category.clone(),
                used_default_category,
                notes: report.notes.clone(),
                time_label: relative_time(report.timestamp, now),
                distance_label,
            }
        })
        .collect()
}

/// "Just now", "<m>m ago" under an hour, "<h>h ago" beyond.
///
/// Only the two tiers exist: a week-old report reads "168h ago".
/// Timestamps ahead of `now` read as "0m ago".
pub fn relative_time(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(timestamp) = timestamp else {
        return config::JUST_NOW_LABEL.to_string();
    };

    let minutes = (now - timestamp).num_milliseconds().max(0) / 60_000;
    if minutes < 60 {
        format!("{}m ago", minutes)
    } else {
        format!("{}h ago", minutes / 60)
    }
}

/// Distance from the user to a report in miles, one decimal, or `"?"`
pub fn distance_label(user: Option<Coordinates>, report: Option<Coordinates>) -> String {
    let report = report.filter(|loc| !loc.is_sentinel());
    match (user, report) {
        (Some(user), Some(report)) => {
            let miles = haversine_km(user, report) * config::KM_TO_MILES;
            format!("{:.1}", miles)
        }
        _ => config::UNKNOWN_DISTANCE_LABEL.to_string(),
    }
}

/// Great-circle distance in kilometers
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * config::EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn report(id: &str, code: &str, location: Option<Coordinates>, age: Option<Duration>, now: DateTime<Utc>) -> Report {
        Report {
            id: id.to_string(),
            category_code: code.to_string(),
            notes: format!("notes for {}", id),
            location,
            timestamp: age.map(|age| now - age),
        }
    }

    #[test]
    fn test_relative_time_tiers() {
        let now = Utc::now();

        assert_eq!(relative_time(None, now), "Just now");
        assert_eq!(relative_time(Some(now - Duration::seconds(45)), now), "0m ago");
        assert_eq!(relative_time(Some(now - Duration::minutes(59)), now), "59m ago");
        assert_eq!(relative_time(Some(now - Duration::minutes(60)), now), "1h ago");
        assert_eq!(relative_time(Some(now - Duration::minutes(125)), now), "2h ago");
        assert_eq!(relative_time(Some(now - Duration::days(7)), now), "168h ago");
        assert_eq!(relative_time(Some(now + Duration::minutes(3)), now), "0m ago");
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let here = Coordinates::new(40.5, -78.4);
        assert_eq!(distance_label(Some(here), Some(here)), "0.0");
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Coordinates::new(40.0, -78.4);
        let b = Coordinates::new(41.0, -78.4);

        let miles: f64 = distance_label(Some(a), Some(b)).parse().unwrap();
        assert!((miles - 69.0).abs() <= 0.2, "got {}", miles);
    }

    #[test]
    fn test_distance_unknown_cases() {
        let here = Coordinates::new(40.5, -78.4);

        assert_eq!(distance_label(Some(here), Some(Coordinates::SENTINEL)), "?");
        assert_eq!(distance_label(Some(here), None), "?");
        assert_eq!(distance_label(None, Some(here)), "?");
    }

    #[test]
    fn test_reconcile_keeps_order_and_resolves_categories() {
        let now = Utc::now();
        let registry = CategoryRegistry::builtin();
        let reports = vec![
            report("c", "Flock", None, None, now),
            report("a", "Pigeon", None, Some(Duration::minutes(5)), now),
            report("b", "Nest", None, Some(Duration::hours(3)), now),
        ];

        let views = reconcile(&reports, None, &registry, now, DistanceMode::Hidden);

        let ids: Vec<&str> = views.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        assert_eq!(views[0].category.code, "Flock");
        assert!(!views[0].used_default_category);
        assert_eq!(views[0].time_label, "Just now");

        assert_eq!(views[1].category.code, "Blue Jay");
        assert!(views[1].used_default_category);
        assert_eq!(views[1].time_label, "5m ago");

        assert_eq!(views[2].time_label, "3h ago");
        assert!(views.iter().all(|v| v.distance_label.is_none()));
    }

    #[test]
    fn test_reconcile_with_distance_shown() {
        let now = Utc::now();
        let registry = CategoryRegistry::builtin();
        let here = Coordinates::new(40.5, -78.4);
        let reports = vec![
            report("near", "Nest", Some(here), None, now),
            report("hidden", "Nest", Some(Coordinates::SENTINEL), None, now),
        ];

        let views = reconcile(&reports, Some(here), &registry, now, DistanceMode::Shown);
        assert_eq!(views[0].distance_label.as_deref(), Some("0.0"));
        assert_eq!(views[1].distance_label.as_deref(), Some("?"));

        let views = reconcile(&reports, None, &registry, now, DistanceMode::Shown);
        assert_eq!(views[0].distance_label.as_deref(), Some("?"));
    }
}
