//! # Location Capture
//!
//! Single-shot GPS acquisition for a harvest entry.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     LocationCapture States                              │
//! │                                                                         │
//! │                request_fix()                                            │
//! │   ┌──────┐ ─────────────────► ┌───────────┐  provider ok  ┌──────────┐  │
//! │   │ Idle │                    │ Acquiring │ ────────────► │ Acquired │  │
//! │   └──────┘                    └───────────┘               └──────────┘  │
//! │      ▲                          │      ▲                     │          │
//! │      │ reset()       provider   │      │   request_fix()     │          │
//! │      │               error /    ▼      └─────────────────────┤          │
//! │      │               absent  ┌────────┐                      │          │
//! │      └────────────────────── │ Failed │ ◄────────────────────┘          │
//! │                              └────────┘    (re-capture may fail)        │
//! │                                                                         │
//! │  • One provider call per request_fix(); no automatic retry              │
//! │  • request_fix() while Acquiring is a no-op                             │
//! │  • A re-capture overwrites the previous fix                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use harvest_core::LocationFix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::capability::{CapabilityError, LocationProvider};
use crate::error::{FlowError, FlowResult};
use crate::settle::Settle;

const CAPABILITY: &str = "location";

// =============================================================================
// States
// =============================================================================

/// Why the last acquisition did not produce a fix.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureFailure {
    /// No provider on this device, or the provider reported itself absent.
    Unavailable,
    /// The provider answered with an error or an unusable reading.
    Acquisition(String),
}

/// Full capture state, including the current fix.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    Idle,
    Acquiring,
    Acquired(LocationFix),
    Failed(CaptureFailure),
}

/// Capture phase without payload, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Idle,
    Acquiring,
    Acquired,
    Failed,
}

impl LocationState {
    pub fn status(&self) -> LocationStatus {
        match self {
            LocationState::Idle => LocationStatus::Idle,
            LocationState::Acquiring => LocationStatus::Acquiring,
            LocationState::Acquired(_) => LocationStatus::Acquired,
            LocationState::Failed(_) => LocationStatus::Failed,
        }
    }
}

// =============================================================================
// Location Capture
// =============================================================================

/// Requests position fixes from an injected provider.
pub struct LocationCapture {
    provider: Option<Arc<dyn LocationProvider>>,
    state: LocationState,
}

impl LocationCapture {
    pub fn new(provider: Option<Arc<dyn LocationProvider>>) -> Self {
        LocationCapture {
            provider,
            state: LocationState::Idle,
        }
    }

    /// Capture for a device without a location sensor.
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    pub fn status(&self) -> LocationStatus {
        self.state.status()
    }

    /// The current fix, only while `Acquired`.
    pub fn fix(&self) -> Option<LocationFix> {
        match self.state {
            LocationState::Acquired(fix) => Some(fix),
            _ => None,
        }
    }

    pub fn is_acquired(&self) -> bool {
        matches!(self.state, LocationState::Acquired(_))
    }

    /// False when `request_fix` fails without ever entering `Acquiring`.
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Requests one fix from the provider.
    ///
    /// On success the new fix replaces any previous one and is returned for
    /// the caller to copy. There is no automatic retry; call again to retry.
    pub async fn request_fix(&mut self) -> FlowResult<LocationFix> {
        if matches!(self.state, LocationState::Acquiring) {
            debug!("Fix request ignored, acquisition already outstanding");
            return Err(FlowError::AcquisitionInProgress);
        }

        let Some(provider) = self.provider.clone() else {
            warn!("No location provider on this device");
            self.state = LocationState::Failed(CaptureFailure::Unavailable);
            return Err(FlowError::CapabilityUnavailable {
                capability: CAPABILITY,
            });
        };

        debug!("Requesting position fix");
        let pending = Settle::enter(
            &mut self.state,
            LocationState::Acquiring,
            LocationState::Failed(CaptureFailure::Acquisition("abandoned".into())),
        );

        let (next, outcome) = match provider.current_position().await {
            Ok(position) => {
                match LocationFix::new(position.latitude, position.longitude, Utc::now()) {
                    Ok(fix) => {
                        info!(
                            latitude = fix.latitude(),
                            longitude = fix.longitude(),
                            "Position fix acquired"
                        );
                        (LocationState::Acquired(fix), Ok(fix))
                    }
                    Err(e) => {
                        warn!(error = %e, "Provider returned an unusable position");
                        let reason = e.to_string();
                        (
                            LocationState::Failed(CaptureFailure::Acquisition(reason.clone())),
                            Err(FlowError::AcquisitionFailed(reason)),
                        )
                    }
                }
            }
            Err(CapabilityError::Unavailable) => {
                warn!("Location provider reported itself unavailable");
                (
                    LocationState::Failed(CaptureFailure::Unavailable),
                    Err(FlowError::CapabilityUnavailable {
                        capability: CAPABILITY,
                    }),
                )
            }
            Err(e) => {
                warn!(error = %e, "Position fix failed");
                let reason = e.to_string();
                (
                    LocationState::Failed(CaptureFailure::Acquisition(reason.clone())),
                    Err(FlowError::AcquisitionFailed(reason)),
                )
            }
        };

        pending.settle(next);
        outcome
    }

    /// Drops any fix and returns to `Idle`.
    pub fn reset(&mut self) {
        self.state = LocationState::Idle;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Position;
    use crate::testing::ScriptedLocation;
    use std::time::Duration;

    #[tokio::test]
    async fn test_successful_fix() {
        let provider = ScriptedLocation::fixed(12.97, 77.59);
        let mut capture = LocationCapture::new(Some(provider.clone()));
        assert_eq!(capture.status(), LocationStatus::Idle);

        let fix = capture.request_fix().await.unwrap();
        assert_eq!(fix.latitude(), 12.97);
        assert_eq!(fix.longitude(), 77.59);
        assert_eq!(capture.status(), LocationStatus::Acquired);
        assert_eq!(capture.fix(), Some(fix));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_provider_is_unavailable() {
        let mut capture = LocationCapture::unavailable();
        assert!(!capture.has_provider());
        let err = capture.request_fix().await.unwrap_err();
        assert!(matches!(err, FlowError::CapabilityUnavailable { .. }));
        assert_eq!(
            capture.state(),
            &LocationState::Failed(CaptureFailure::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_provider_unavailable_is_distinct_from_failure() {
        let mut capture =
            LocationCapture::new(Some(ScriptedLocation::failing(CapabilityError::Unavailable)));
        let err = capture.request_fix().await.unwrap_err();
        assert!(matches!(err, FlowError::CapabilityUnavailable { .. }));

        let mut capture = LocationCapture::new(Some(ScriptedLocation::failing(
            CapabilityError::Failed("timeout".into()),
        )));
        let err = capture.request_fix().await.unwrap_err();
        assert_eq!(err, FlowError::AcquisitionFailed("timeout".into()));
        assert_eq!(
            capture.state(),
            &LocationState::Failed(CaptureFailure::Acquisition("timeout".into()))
        );
    }

    #[tokio::test]
    async fn test_out_of_range_reading_fails() {
        let mut capture = LocationCapture::new(Some(ScriptedLocation::fixed(95.0, 10.0)));
        let err = capture.request_fix().await.unwrap_err();
        assert!(matches!(err, FlowError::AcquisitionFailed(_)));
        assert_eq!(capture.status(), LocationStatus::Failed);
        assert_eq!(capture.fix(), None);
    }

    #[tokio::test]
    async fn test_retry_after_failure_is_explicit() {
        let provider = ScriptedLocation::script(vec![
            Err(CapabilityError::Failed("no signal".into())),
            Ok(Position {
                latitude: 1.0,
                longitude: 2.0,
            }),
        ]);
        let mut capture = LocationCapture::new(Some(provider.clone()));

        assert!(capture.request_fix().await.is_err());
        assert_eq!(provider.calls(), 1);

        let fix = capture.request_fix().await.unwrap();
        assert_eq!(fix.latitude(), 1.0);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_recapture_overwrites_fix() {
        let provider = ScriptedLocation::script(vec![
            Ok(Position {
                latitude: 1.0,
                longitude: 1.0,
            }),
            Ok(Position {
                latitude: 2.0,
                longitude: 2.0,
            }),
        ]);
        let mut capture = LocationCapture::new(Some(provider));

        capture.request_fix().await.unwrap();
        capture.request_fix().await.unwrap();
        assert_eq!(capture.fix().map(|f| f.latitude()), Some(2.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_settles_to_failed() {
        let provider = ScriptedLocation::slow(
            vec![Ok(Position {
                latitude: 1.0,
                longitude: 1.0,
            })],
            Duration::from_secs(60),
        );
        let mut capture = LocationCapture::new(Some(provider.clone()));

        let timed_out =
            tokio::time::timeout(Duration::from_secs(1), capture.request_fix()).await;
        assert!(timed_out.is_err());
        assert_eq!(capture.status(), LocationStatus::Failed);

        // Not stuck in Acquiring: the next request reaches the provider
        capture.request_fix().await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let mut capture = LocationCapture::new(Some(ScriptedLocation::fixed(1.0, 1.0)));
        capture.request_fix().await.unwrap();
        capture.reset();
        assert_eq!(capture.status(), LocationStatus::Idle);
        assert_eq!(capture.fix(), None);
    }
}
