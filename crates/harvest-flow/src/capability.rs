//! # Capability Contracts
//!
//! Narrow request/response traits for everything outside the state machine:
//! the location sensor, the ledger, the share sheet, and the clipboard.
//!
//! ## Injection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Capabilities                                    │
//! │                                                                         │
//! │  location:  Option<Arc<dyn LocationProvider>>  None = no GPS on device  │
//! │  ledger:    Arc<dyn LedgerClient>              always required          │
//! │  share:     Option<Arc<dyn ShareProvider>>     None = no share sheet    │
//! │  clipboard: Option<Arc<dyn Clipboard>>         None = no clipboard      │
//! │                                                                         │
//! │  Host apps wire real devices; tests wire deterministic fakes.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is single-shot: one request, one response, no progress events.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harvest_core::HarvestRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Shared Error
// =============================================================================

/// Failure reported by a device capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The facility does not exist or is switched off.
    #[error("capability unavailable")]
    Unavailable,

    /// The user dismissed the prompt.
    #[error("cancelled by user")]
    Cancelled,

    /// The facility exists but the request failed.
    #[error("{0}")]
    Failed(String),
}

// =============================================================================
// Location
// =============================================================================

/// Raw reading from a location provider, before range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Device geolocation, one fix per call.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Requests the current position.
    ///
    /// Returns `CapabilityError::Unavailable` when the sensor is absent or
    /// permission is denied, distinct from a failed reading.
    async fn current_position(&self) -> Result<Position, CapabilityError>;
}

// =============================================================================
// Ledger
// =============================================================================

/// Ledger acknowledgment of a recorded harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerAck {
    pub acknowledged_at: DateTime<Utc>,
}

/// Why the ledger did not record a harvest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Ledger unreachable or the connection dropped.
    #[error("network error: {0}")]
    Network(String),

    /// Ledger reachable but refused the record.
    #[error("record rejected: {0}")]
    Rejected(String),
}

/// Durable record store. Network-bound and unreliable: latency is arbitrary
/// and any call may end in rejection.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn submit_record(&self, record: &HarvestRecord) -> Result<LedgerAck, LedgerError>;
}

// =============================================================================
// Share / Clipboard
// =============================================================================

/// What the native share sheet receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Native share sheet.
#[async_trait]
pub trait ShareProvider: Send + Sync {
    async fn share(&self, payload: &SharePayload) -> Result<(), CapabilityError>;
}

/// System clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn copy_text(&self, text: &str) -> Result<(), CapabilityError>;
}

// =============================================================================
// Capability Bundle
// =============================================================================

/// Everything a flow needs from its host.
#[derive(Clone)]
pub struct Capabilities {
    pub location: Option<Arc<dyn LocationProvider>>,
    pub ledger: Arc<dyn LedgerClient>,
    pub share: Option<Arc<dyn ShareProvider>>,
    pub clipboard: Option<Arc<dyn Clipboard>>,
}

impl Capabilities {
    /// Only a ledger; every device capability absent.
    pub fn ledger_only(ledger: Arc<dyn LedgerClient>) -> Self {
        Capabilities {
            location: None,
            ledger,
            share: None,
            clipboard: None,
        }
    }

    pub fn with_location(mut self, provider: Arc<dyn LocationProvider>) -> Self {
        self.location = Some(provider);
        self
    }

    pub fn with_share(mut self, provider: Arc<dyn ShareProvider>) -> Self {
        self.share = Some(provider);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }
}
