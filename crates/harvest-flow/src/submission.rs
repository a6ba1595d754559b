//! # Harvest Submission Flow
//!
//! The form → submit → confirm lifecycle for one harvest entry at a time.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   HarvestSubmissionFlow States                          │
//! │                                                                         │
//! │   update_field()                                                        │
//! │   capture_location()                                                    │
//! │      ┌──────┐                                                           │
//! │      ▼      │     submit()          ledger ack                          │
//! │   ┌─────────┴─┐ ──────────► ┌──────────────┐ ──────────► ┌───────────┐  │
//! │   │  Editing  │             │  Submitting  │             │ Confirmed │  │
//! │   │  (draft)  │ ◄────────── │  { record }  │             │ { result, │  │
//! │   └───────────┘  rejected   └──────────────┘             │   links } │  │
//! │         ▲        / dropped                               └─────┬─────┘  │
//! │         │                                                      │        │
//! │         └──────────────────────── reset() ─────────────────────┘        │
//! │                                                   share() stays here    │
//! │                                                                         │
//! │  • The record is frozen on entry to Submitting; the draft is untouched │
//! │  • A batch id exists only after the ledger acknowledged                 │
//! │  • All operations take &mut self: nothing else can run mid-submit       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use harvest_core::{
    HarvestDraft, HarvestField, HarvestRecord, LocationFix, SubmissionResult, ValidationError,
    VerificationLinks,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::batch::BatchIdGenerator;
use crate::capability::{Capabilities, LedgerClient};
use crate::config::HarvestConfig;
use crate::error::{FlowError, FlowResult};
use crate::events::{FlowEventEmitter, NoOpEmitter};
use crate::location::{LocationCapture, LocationStatus};
use crate::settle::Settle;
use crate::share::{ShareOutcome, VerificationLinkGenerator};
use crate::view::FlowView;

// =============================================================================
// Flow State
// =============================================================================

/// Lifecycle phase without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    Editing,
    Submitting,
    Confirmed,
}

impl FlowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowPhase::Editing => "editing",
            FlowPhase::Submitting => "submitting",
            FlowPhase::Confirmed => "confirmed",
        }
    }
}

/// Lifecycle state with the data each phase owns.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Editing,
    Submitting { record: HarvestRecord },
    Confirmed {
        result: SubmissionResult,
        links: VerificationLinks,
    },
}

impl FlowState {
    pub fn phase(&self) -> FlowPhase {
        match self {
            FlowState::Editing => FlowPhase::Editing,
            FlowState::Submitting { .. } => FlowPhase::Submitting,
            FlowState::Confirmed { .. } => FlowPhase::Confirmed,
        }
    }
}

// =============================================================================
// Submission Flow
// =============================================================================

/// Owns the draft, the location capture, and the batch id sequence.
pub struct HarvestSubmissionFlow {
    draft: HarvestDraft,
    state: FlowState,
    location: LocationCapture,
    ledger: Arc<dyn LedgerClient>,
    batch_ids: BatchIdGenerator,
    links: VerificationLinkGenerator,
    emitter: Arc<dyn FlowEventEmitter>,
    last_error: Option<String>,
}

impl HarvestSubmissionFlow {
    /// Creates a flow in `Editing` with an empty draft.
    pub fn new(config: &HarvestConfig, capabilities: Capabilities) -> FlowResult<Self> {
        let builder = config.link_builder()?;

        Ok(HarvestSubmissionFlow {
            draft: HarvestDraft::new(Utc::now()),
            state: FlowState::Editing,
            location: LocationCapture::new(capabilities.location),
            ledger: capabilities.ledger,
            batch_ids: BatchIdGenerator::new(config.batch.prefix.clone()),
            links: VerificationLinkGenerator::new(
                builder,
                capabilities.share,
                capabilities.clipboard,
            ),
            emitter: Arc::new(NoOpEmitter),
            last_error: None,
        })
    }

    /// Sets the event emitter.
    pub fn with_emitter(mut self, emitter: Arc<dyn FlowEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn phase(&self) -> FlowPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn draft(&self) -> &HarvestDraft {
        &self.draft
    }

    pub fn location(&self) -> &LocationCapture {
        &self.location
    }

    /// The confirmed result, only while `Confirmed`.
    pub fn result(&self) -> Option<&SubmissionResult> {
        match &self.state {
            FlowState::Confirmed { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn links(&self) -> Option<&VerificationLinks> {
        match &self.state {
            FlowState::Confirmed { links, .. } => Some(links),
            _ => None,
        }
    }

    /// Reason the last operation failed, cleared by the next attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Serializable snapshot for the presentation layer.
    pub fn view(&self) -> FlowView {
        FlowView::capture(self)
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Stores one form field. Quantity text is coerced to a number; nothing
    /// else is validated until submit.
    pub fn update_field(&mut self, field: HarvestField, value: &str) -> FlowResult<()> {
        self.require(FlowPhase::Editing, "update a field")?;
        debug!(?field, value, "Field updated");
        self.draft.set_field(field, value);
        Ok(())
    }

    /// Acquires a fix and copies it into the draft.
    ///
    /// A failed capture clears the draft's location so no stale fix can be
    /// submitted. Errors are reported and never leave the flow stuck.
    pub async fn capture_location(&mut self) -> FlowResult<LocationFix> {
        self.require(FlowPhase::Editing, "capture location")?;
        self.last_error = None;
        if self.location.has_provider() {
            self.emitter.emit_location(LocationStatus::Acquiring, None);
        }

        match self.location.request_fix().await {
            Ok(fix) => {
                self.draft.set_location(fix);
                self.emitter.emit_location(LocationStatus::Acquired, Some(&fix));
                Ok(fix)
            }
            Err(e) => {
                self.draft.clear_location();
                self.emitter.emit_location(self.location.status(), None);
                self.report(&e);
                Err(e)
            }
        }
    }

    /// True when `submit()` would reach the ledger.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, FlowState::Editing)
            && self.location.is_acquired()
            && self.draft.is_complete()
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Freezes the draft and records it on the ledger.
    ///
    /// Validation failures return before any ledger call and leave the flow
    /// in `Editing`. A rejection returns to `Editing` with the draft intact.
    pub async fn submit(&mut self) -> FlowResult<SubmissionResult> {
        self.require(FlowPhase::Editing, "submit")?;
        self.last_error = None;

        let record = match self.freeze_draft() {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "Submit blocked by validation");
                self.report(&e);
                return Err(e);
            }
        };

        info!(
            crop = %record.crop_type(),
            quantity_kg = %record.quantity_kg(),
            operator = record.operator_id(),
            "Submitting harvest record"
        );

        let pending = Settle::enter(
            &mut self.state,
            FlowState::Submitting {
                record: record.clone(),
            },
            FlowState::Editing,
        );
        self.emitter.emit_phase(FlowPhase::Submitting);

        match self.ledger.submit_record(&record).await {
            Ok(ack) => {
                let batch_id = self.batch_ids.next(ack.acknowledged_at);
                let links = self.links.links(&batch_id);
                let result = SubmissionResult::confirmed(batch_id, ack.acknowledged_at, record);

                pending.settle(FlowState::Confirmed {
                    result: result.clone(),
                    links: links.clone(),
                });

                info!(batch_id = %result.batch_id, "Harvest confirmed");
                self.emitter.emit_phase(FlowPhase::Confirmed);
                self.emitter.emit_confirmed(&result, &links);
                Ok(result)
            }
            Err(e) => {
                pending.settle(FlowState::Editing);

                warn!(reason = %e, "Ledger did not record harvest");
                let err = FlowError::SubmissionRejected(e.to_string());
                self.emitter.emit_phase(FlowPhase::Editing);
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Starts a new entry after a confirmation.
    ///
    /// The next entry needs a fresh location capture.
    pub fn reset(&mut self) -> FlowResult<()> {
        self.require(FlowPhase::Confirmed, "reset")?;

        self.state = FlowState::Editing;
        self.draft = HarvestDraft::new(Utc::now());
        self.location.reset();
        self.last_error = None;

        debug!("Flow reset for next entry");
        self.emitter.emit_phase(FlowPhase::Editing);
        self.emitter.emit_location(LocationStatus::Idle, None);
        Ok(())
    }

    /// Shares the confirmed batch's verification link. Never changes state.
    pub async fn share(&self) -> FlowResult<ShareOutcome> {
        let FlowState::Confirmed { result, .. } = &self.state else {
            return Err(self.invalid("share"));
        };

        let outcome = self.links.share(&result.batch_id).await;
        if let Err(e) = &outcome {
            self.emitter.emit_error(&e.to_string(), e.is_retryable());
        }
        outcome
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn freeze_draft(&self) -> FlowResult<HarvestRecord> {
        if !self.location.is_acquired() {
            return Err(ValidationError::Required {
                field: "location".to_string(),
            }
            .into());
        }
        Ok(self.draft.freeze()?)
    }

    fn require(&self, phase: FlowPhase, operation: &'static str) -> FlowResult<()> {
        if self.phase() == phase {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> FlowError {
        FlowError::InvalidState {
            operation,
            phase: self.phase().as_str(),
        }
    }

    fn report(&mut self, err: &FlowError) {
        let message = err.to_string();
        self.emitter.emit_error(&message, err.is_retryable());
        self.last_error = Some(message);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
