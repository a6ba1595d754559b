//! # harvest-core: Pure Domain Logic for Harvest Tracker
//!
//! Domain types, validation, and the verification URL scheme as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Harvest Tracker Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (external)                   │   │
//! │  │     Entry form ──► Capture button ──► Confirmation screen       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ FlowView / events                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 harvest-flow (state machines)                   │   │
//! │  │    LocationCapture → HarvestSubmissionFlow → LinkGenerator      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ harvest-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐                 │   │
//! │  │   │   types   │  │ validation │  │  verify   │                 │   │
//! │  │   │  Draft    │  │  crop, kg  │  │  URLs     │                 │   │
//! │  │   │  Record   │  │  operator  │  │  scan img │                 │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO SENSORS • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (HarvestDraft, HarvestRecord, LocationFix, etc.)
//! - [`validation`] - Field validation rules
//! - [`verify`] - Verification and scan-image URL builders
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use harvest_core::{HarvestDraft, HarvestField, LocationFix};
//!
//! let mut draft = HarvestDraft::new(Utc::now());
//! draft.set_field(HarvestField::CropType, "Tulsi");
//! draft.set_field(HarvestField::QuantityKg, "2.5");
//! draft.set_field(HarvestField::OperatorId, "F-100");
//! assert!(!draft.is_complete()); // no location yet
//!
//! draft.set_location(LocationFix::new(12.97, 77.59, Utc::now()).unwrap());
//! let record = draft.freeze().unwrap();
//! assert_eq!(record.operator_id(), "F-100");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;
pub mod verify;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;
pub use verify::{VerificationLinks, VerifyLinkBuilder};
