//! Outbound notifications for the presentation layer.

use harvest_core::{LocationFix, SubmissionResult, VerificationLinks};

use crate::location::LocationStatus;
use crate::submission::FlowPhase;

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Trait for emitting flow events (implemented by the host UI).
pub trait FlowEventEmitter: Send + Sync {
    /// Emits a lifecycle phase change.
    fn emit_phase(&self, phase: FlowPhase);

    /// Emits a location capture change. `fix` is set only when acquired.
    fn emit_location(&self, status: LocationStatus, fix: Option<&LocationFix>);

    /// Emits a confirmed submission with its links.
    fn emit_confirmed(&self, result: &SubmissionResult, links: &VerificationLinks);

    /// Emits a flow error.
    fn emit_error(&self, message: &str, retryable: bool);
}

/// No-op event emitter for headless use.
pub struct NoOpEmitter;

impl FlowEventEmitter for NoOpEmitter {
    fn emit_phase(&self, _phase: FlowPhase) {}
    fn emit_location(&self, _status: LocationStatus, _fix: Option<&LocationFix>) {}
    fn emit_confirmed(&self, _result: &SubmissionResult, _links: &VerificationLinks) {}
    fn emit_error(&self, _message: &str, _retryable: bool) {}
}
