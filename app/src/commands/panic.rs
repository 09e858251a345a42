//! Panic commands

use crate::app::AppState;

/// Hide the app behind the cover page for the rest of the session
pub async fn trigger_panic(state: &AppState) {
    state.session.panic_switch().engage().await;
}

pub fn is_panic_engaged(state: &AppState) -> bool {
    state.session.is_panic_engaged()
}
