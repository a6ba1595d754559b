//! # harvest-flow: Submission Lifecycle for Harvest Tracker
//!
//! This crate sequences one harvest entry from GPS capture, through the
//! ledger, to a shareable verification link.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Submission Architecture                           │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │              HarvestSubmissionFlow (Main Orchestrator)           │  │
//! │  │                                                                  │  │
//! │  │  Owns the draft, the location capture, and the batch ids        │  │
//! │  │  Editing → Submitting → Confirmed → (reset) → Editing           │  │
//! │  └───────┬───────────────────────┬──────────────────────┬───────────┘  │
//! │          ▼                       ▼                      ▼               │
//! │  ┌────────────────┐  ┌────────────────────┐  ┌────────────────────────┐│
//! │  │LocationCapture │  │  LedgerClient      │  │VerificationLink        ││
//! │  │                │  │                    │  │Generator               ││
//! │  │ One fix per    │  │ One call per       │  │ Share sheet first,     ││
//! │  │ request, no    │  │ submit, arbitrary  │  │ clipboard fallback     ││
//! │  │ auto retry     │  │ latency, may reject│  │                        ││
//! │  └────────────────┘  └────────────────────┘  └────────────────────────┘│
//! │                                                                         │
//! │  STATUS EVENTS (to the presentation layer via FlowEventEmitter):       │
//! │  • phase changes     (editing / submitting / confirmed)                │
//! │  • location changes  (idle / acquiring / acquired / failed)            │
//! │  • confirmation      (batch id + verification links)                   │
//! │  • errors            (message + retryable flag)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`submission`] - Main `HarvestSubmissionFlow` state machine
//! - [`location`] - `LocationCapture` state machine
//! - [`share`] - Link sharing with clipboard fallback
//! - [`capability`] - Traits for every host facility
//! - [`batch`] - Batch identifier generation
//! - [`config`] - Harvest configuration (device, verify host, batch prefix)
//! - [`events`] - Event emitter trait for the UI
//! - [`ledger`] - In-process simulated ledger
//! - [`view`] - Serializable snapshot for rendering
//! - [`error`] - Flow error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use harvest_flow::{Capabilities, HarvestConfig, HarvestSubmissionFlow, SimulatedLedger};
//! use harvest_core::HarvestField;
//!
//! let config = HarvestConfig::load_or_default(None);
//! let caps = Capabilities::ledger_only(Arc::new(SimulatedLedger::from_config(&config)))
//!     .with_location(gps);
//!
//! let mut flow = HarvestSubmissionFlow::new(&config, caps)?;
//! flow.update_field(HarvestField::CropType, "Tulsi")?;
//! flow.update_field(HarvestField::QuantityKg, "2.5")?;
//! flow.update_field(HarvestField::OperatorId, "F-100")?;
//! flow.capture_location().await?;
//!
//! let result = flow.submit().await?;
//! println!("Recorded as {}", result.batch_id);
//! flow.share().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

// State machines
pub mod location;
pub mod share;
pub mod submission;

// Host seams
pub mod capability;
pub mod events;
pub mod ledger;

// Support
pub mod batch;
pub mod config;
pub mod error;
pub mod view;

mod settle;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use capability::{
    Capabilities, CapabilityError, Clipboard, LedgerAck, LedgerClient, LedgerError,
    LocationProvider, Position, SharePayload, ShareProvider,
};
pub use config::{BatchSettings, DeviceConfig, HarvestConfig, LedgerSettings, VerifySettings};
pub use error::{FlowError, FlowResult};
pub use events::{FlowEventEmitter, NoOpEmitter};
pub use ledger::{LedgerEntry, SimulatedLedger};
pub use location::{CaptureFailure, LocationCapture, LocationState, LocationStatus};
pub use share::{ShareOutcome, VerificationLinkGenerator};
pub use submission::{FlowPhase, FlowState, HarvestSubmissionFlow};
pub use view::FlowView;
