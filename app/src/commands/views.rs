//! View commands
//!
//! Navigation and rendering of the active screen. The panic latch is
//! checked before anything else.

use crate::app::AppState;
use crate::categories::CategoryDescriptor;
use crate::config;
use crate::error::Result;
use crate::services::{feed, map, DistanceMode, MapMarker, MapViewport, ReportView};
use crate::session::View;
use chrono::Utc;
use serde::Serialize;

/// Static page shown once panic is engaged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverPage {
    pub title: &'static str,
    pub body: &'static str,
    pub image_url: &'static str,
    pub image_alt: &'static str,
    pub footer: &'static str,
}

impl Default for CoverPage {
    fn default() -> Self {
        Self {
            title: config::COVER_TITLE,
            body: config::COVER_BODY,
            image_url: config::COVER_IMAGE_URL,
            image_alt: config::COVER_IMAGE_ALT,
            footer: config::COVER_FOOTER,
        }
    }
}

/// Everything a shell needs to draw the current screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Cover(CoverPage),
    Feed {
        notice: &'static str,
        items: Vec<ReportView>,
    },
    Map {
        viewport: MapViewport,
        markers: Vec<MapMarker>,
    },
    ReportEntry {
        categories: Vec<CategoryDescriptor>,
        submitting: bool,
    },
}

/// Switch to another view
pub async fn navigate(state: &AppState, view: View) -> Result<()> {
    state.session.navigate(view).await
}

/// Render the active screen from the latest snapshot
pub async fn current_screen(state: &AppState) -> Screen {
    if state.session.is_panic_engaged() {
        return Screen::Cover(CoverPage::default());
    }

    let reports = state.latest_reports();
    let user_location = state.user_location().await;

    match state.session.current_view().await {
        View::Feed => {
            let mode = if state.settings.feed.show_distance {
                DistanceMode::Shown
            } else {
                DistanceMode::Hidden
            };

            Screen::Feed {
                notice: config::FEED_NOTICE,
                items: feed::reconcile(&reports, user_location, &state.registry, Utc::now(), mode),
            }
        }
        View::Map => Screen::Map {
            viewport: map::viewport(
                user_location,
                state.settings.map.default_center,
                state.settings.map.zoom,
            ),
            markers: map::project(&reports, &state.registry),
        },
        View::ReportEntry => Screen::ReportEntry {
            categories: state.registry.entries().to_vec(),
            submitting: state.session.is_submitting(),
        },
    }
}
