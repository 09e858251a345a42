//! Session state
//!
//! Per-process UI state owned by `AppState`: the active view, whether a
//! submission is in flight, and the panic latch. Created at startup and
//! never persisted.

use crate::error::{AppError, Result};
use crate::services::PanicSwitch;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Views reachable while the panic latch is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Feed,
    Map,
    ReportEntry,
}

#[derive(Clone)]
pub struct SessionState {
    current_view: Arc<RwLock<View>>,
    submitting: Arc<AtomicBool>,
    panic: PanicSwitch,
}

impl SessionState {
    pub fn new(panic: PanicSwitch) -> Self {
        Self {
            current_view: Arc::new(RwLock::new(View::default())),
            submitting: Arc::new(AtomicBool::new(false)),
            panic,
        }
    }

    pub async fn current_view(&self) -> View {
        *self.current_view.read().await
    }

    /// Switch views. Refused for the rest of the session once panic is engaged.
    pub async fn navigate(&self, view: View) -> Result<()> {
        if self.panic.is_engaged() {
            tracing::debug!("Ignoring navigation to {:?}: session locked", view);
            return Err(AppError::PanicEngaged);
        }

        let mut current = self.current_view.write().await;
        if *current != view {
            tracing::debug!("View {:?} -> {:?}", *current, view);
            *current = view;
        }

        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Claim the single submission slot.
    ///
    /// The slot is released when the returned guard is dropped.
    pub fn begin_submission(&self) -> Result<SubmissionGuard> {
        if self.panic.is_engaged() {
            return Err(AppError::PanicEngaged);
        }

        self.submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| AppError::SubmissionInProgress)?;

        Ok(SubmissionGuard {
            flag: Arc::clone(&self.submitting),
        })
    }

    pub fn panic_switch(&self) -> &PanicSwitch {
        &self.panic
    }

    pub fn is_panic_engaged(&self) -> bool {
        self.panic.is_engaged()
    }
}

/// Holds the submission slot; see `SessionState::begin_submission`
#[must_use]
pub struct SubmissionGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
