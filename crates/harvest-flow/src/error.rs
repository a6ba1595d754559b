//! # Flow Error Types
//!
//! Error types for the submission lifecycle.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Flow Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Location     │  │   Submission    │  │      Sharing            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Capability     │  │  Validation     │  │  ShareFailed            │ │
//! │  │   Unavailable   │  │  Submission     │  │  (after clipboard       │ │
//! │  │  Acquisition    │  │   Rejected      │  │   fallback also failed) │ │
//! │  │   Failed/InProg │  │  InvalidState   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  Configuration  │   None of these are fatal. The worst outcome is   │
//! │  │                 │   staying in `editing` until the user retries.    │
//! │  │  InvalidConfig  │                                                    │
//! │  │  ConfigLoad/Save│                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use harvest_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for flow operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Error type covering every failure in the submission lifecycle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    // =========================================================================
    // Location Errors
    // =========================================================================
    /// A device capability is missing on this host.
    #[error("{capability} capability is not available on this device")]
    CapabilityUnavailable { capability: &'static str },

    /// The location provider could not produce a usable fix.
    #[error("Location acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// A fix request is already outstanding.
    #[error("Location acquisition already in progress")]
    AcquisitionInProgress,

    // =========================================================================
    // Submission Errors
    // =========================================================================
    /// The draft is not ready to submit.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The ledger refused the record or could not be reached.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Operation not permitted in the current phase.
    #[error("Cannot {operation} while {phase}")]
    InvalidState {
        operation: &'static str,
        phase: &'static str,
    },

    // =========================================================================
    // Sharing Errors
    // =========================================================================
    /// Neither the share sheet nor the clipboard accepted the link.
    #[error("Share failed: {0}")]
    ShareFailed(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for FlowError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => FlowError::Validation(v),
            CoreError::InvalidCoordinates { .. } => FlowError::AcquisitionFailed(err.to_string()),
            CoreError::InvalidVerificationUrl { .. } => FlowError::InvalidConfig(err.to_string()),
        }
    }
}

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for FlowError {
    fn from(err: toml::de::Error) -> Self {
        FlowError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for FlowError {
    fn from(err: toml::ser::Error) -> Self {
        FlowError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl FlowError {
    /// Returns true if the user can fix this by trying the same action again.
    ///
    /// ## Retryable Errors
    /// - Location failures (re-press capture)
    /// - Ledger rejections and network failures (re-press submit)
    /// - Share failures
    ///
    /// ## Non-Retryable Errors
    /// - Validation (the input has to change first)
    /// - Wrong phase, configuration problems
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::CapabilityUnavailable { .. }
                | FlowError::AcquisitionFailed(_)
                | FlowError::AcquisitionInProgress
                | FlowError::SubmissionRejected(_)
                | FlowError::ShareFailed(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            FlowError::InvalidConfig(_)
                | FlowError::ConfigLoadFailed(_)
                | FlowError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(FlowError::AcquisitionFailed("timeout".into()).is_retryable());
        assert!(FlowError::SubmissionRejected("network".into()).is_retryable());
        assert!(FlowError::CapabilityUnavailable { capability: "location" }.is_retryable());

        assert!(!FlowError::InvalidConfig("bad".into()).is_retryable());
        assert!(!FlowError::InvalidState {
            operation: "submit",
            phase: "confirmed"
        }
        .is_retryable());
        assert!(!FlowError::Validation(ValidationError::Required {
            field: "operator_id".into()
        })
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = FlowError::InvalidState {
            operation: "reset",
            phase: "editing",
        };
        assert_eq!(err.to_string(), "Cannot reset while editing");

        let err = FlowError::CapabilityUnavailable { capability: "location" };
        assert!(err.to_string().contains("location"));
    }

    #[test]
    fn test_core_error_conversion() {
        let err: FlowError = CoreError::InvalidCoordinates {
            latitude: 100.0,
            longitude: 0.0,
        }
        .into();
        assert!(matches!(err, FlowError::AcquisitionFailed(_)));
        assert!(err.is_retryable());
    }
}
