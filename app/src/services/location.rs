//! Location service
//!
//! Best-effort device location. A sample either yields coordinates or
//! nothing; errors, denial, missing capability and timeouts all end up as
//! "no location" and are only logged.

use crate::backend::BoxFuture;
use crate::models::Coordinates;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a position could not be obtained
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// Device capability answering a single "current position" request
pub trait LocationSource: Send + Sync {
    fn current_position(&self) -> BoxFuture<'_, std::result::Result<Coordinates, LocationError>>;
}

/// Source with a fixed position, e.g. configured for a stationary host
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

impl LocationSource for FixedLocation {
    fn current_position(&self) -> BoxFuture<'_, std::result::Result<Coordinates, LocationError>> {
        let position = self.0;
        Box::pin(async move { Ok(position) })
    }
}

/// Source for a user who refused location access
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

impl LocationSource for DeniedLocation {
    fn current_position(&self) -> BoxFuture<'_, std::result::Result<Coordinates, LocationError>> {
        Box::pin(async { Err(LocationError::PermissionDenied) })
    }
}

/// Wraps an optional device capability with a bounded wait
#[derive(Clone)]
pub struct LocationService {
    source: Option<Arc<dyn LocationSource>>,
    timeout: Duration,
}

impl LocationService {
    pub fn new(source: Option<Arc<dyn LocationSource>>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Service for a device without any location capability
    pub fn unsupported() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn is_supported(&self) -> bool {
        self.source.is_some()
    }

    /// Take one sample
    pub async fn sample(&self) -> Option<Coordinates> {
        let Some(source) = &self.source else {
            tracing::debug!("No location capability on this device");
            return None;
        };

        match tokio::time::timeout(self.timeout, source.current_position()).await {
            Ok(Ok(position)) => {
                tracing::debug!("Location sampled: {}, {}", position.lat, position.lng);
                Some(position)
            }
            Ok(Err(e)) => {
                tracing::info!("Location unavailable: {}", e);
                None
            }
            Err(_) => {
                tracing::warn!("Location request timed out after {:?}", self.timeout);
                None
            }
        }
    }

    /// Take one sample, falling back to the "no location" sentinel
    pub async fn sample_or_sentinel(&self) -> Coordinates {
        self.sample().await.unwrap_or(Coordinates::SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that never answers
    struct HangingLocation;

    impl LocationSource for HangingLocation {
        fn current_position(
            &self,
        ) -> BoxFuture<'_, std::result::Result<Coordinates, LocationError>> {
            Box::pin(std::future::pending())
        }
    }

    fn service(source: impl LocationSource + 'static) -> LocationService {
        LocationService::new(Some(Arc::new(source)), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_fixed_location_is_returned() {
        let service = service(FixedLocation(Coordinates::new(40.5, -78.4)));

        assert!(service.is_supported());
        assert_eq!(service.sample().await, Some(Coordinates::new(40.5, -78.4)));
    }

    #[tokio::test]
    async fn test_denied_location_falls_back_to_sentinel() {
        let service = service(DeniedLocation);

        assert_eq!(service.sample().await, None);
        assert_eq!(service.sample_or_sentinel().await, Coordinates::SENTINEL);
    }

    #[tokio::test]
    async fn test_missing_capability() {
        let service = LocationService::unsupported();

        assert!(!service.is_supported());
        assert_eq!(service.sample_or_sentinel().await, Coordinates::SENTINEL);
    }

    #[tokio::test]
    async fn test_hanging_source_times_out() {
        let service = service(HangingLocation);

        assert_eq!(service.sample().await, None);
    }
}
