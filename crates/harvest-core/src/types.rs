//! # Domain Types
//!
//! Core domain types used throughout Harvest Tracker.
//!
//! ## Type Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Record Lifecycle                                │
//! │                                                                         │
//! │  ┌─────────────────┐  freeze()  ┌─────────────────┐  ack  ┌──────────┐ │
//! │  │  HarvestDraft   │ ─────────► │  HarvestRecord  │ ────► │Submission│ │
//! │  │  ─────────────  │            │  ─────────────  │       │  Result  │ │
//! │  │  raw strings    │            │  CropType       │       │ batch_id │ │
//! │  │  Option<Fix>    │            │  Decimal kg     │       │ record   │ │
//! │  │  mutable        │            │  LocationFix    │       └──────────┘ │
//! │  └─────────────────┘            │  immutable      │                    │
//! │         ▲                       └─────────────────┘                    │
//! │         │ copy                                                          │
//! │  ┌──────┴──────────┐                                                    │
//! │  │   LocationFix   │  Copy, validated on construction                  │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LocationFix` is copied into the draft, and the draft is copied into the
//! `HarvestRecord`. Nothing downstream holds a reference back upstream, so a
//! later re-capture or edit cannot reach a record that is already in flight.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::{self, ValidationResult};

// =============================================================================
// Crop Type
// =============================================================================

/// The medicinal plants a field operator can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CropType {
    Tulsi,
    Patharchitta,
    /// Licorice root.
    Mulethi,
    Ashwagandha,
    Brahmi,
    Neem,
    #[serde(rename = "Aloe Vera")]
    AloeVera,
}

impl CropType {
    /// Every selectable crop, in form order.
    pub const ALL: [CropType; 7] = [
        CropType::Tulsi,
        CropType::Patharchitta,
        CropType::Mulethi,
        CropType::Ashwagandha,
        CropType::Brahmi,
        CropType::Neem,
        CropType::AloeVera,
    ];

    /// Display label, also the wire value.
    pub const fn label(&self) -> &'static str {
        match self {
            CropType::Tulsi => "Tulsi",
            CropType::Patharchitta => "Patharchitta",
            CropType::Mulethi => "Mulethi",
            CropType::Ashwagandha => "Ashwagandha",
            CropType::Brahmi => "Brahmi",
            CropType::Neem => "Neem",
            CropType::AloeVera => "Aloe Vera",
        }
    }

    /// All labels, for error messages and dropdowns.
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|c| c.label().to_string()).collect()
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CropType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::validate_crop_type(s)
    }
}

// =============================================================================
// Location Fix
// =============================================================================

/// A single GPS reading.
///
/// Coordinates are checked on construction; a `LocationFix` in hand is
/// always within WGS84 bounds.
///
/// Deserialization goes through [`LocationFix::new`] so the bounds hold for
/// fixes read back from JSON too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "RawLocationFix")]
pub struct LocationFix {
    latitude: f64,
    longitude: f64,
    #[ts(as = "String")]
    captured_at: DateTime<Utc>,
}

/// Unchecked wire form of a [`LocationFix`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocationFix {
    latitude: f64,
    longitude: f64,
    captured_at: DateTime<Utc>,
}

impl TryFrom<RawLocationFix> for LocationFix {
    type Error = CoreError;

    fn try_from(raw: RawLocationFix) -> CoreResult<Self> {
        LocationFix::new(raw.latitude, raw.longitude, raw.captured_at)
    }
}

impl LocationFix {
    /// Creates a fix, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64, captured_at: DateTime<Utc>) -> CoreResult<Self> {
        validation::validate_coordinates(latitude, longitude).map_err(|_| {
            CoreError::InvalidCoordinates {
                latitude,
                longitude,
            }
        })?;
        Ok(LocationFix {
            latitude,
            longitude,
            captured_at,
        })
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

impl fmt::Display for LocationFix {
    /// Six decimal places, as shown under the capture button.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat: {:.6}, Lng: {:.6}", self.latitude, self.longitude)
    }
}

// =============================================================================
// Harvest Draft
// =============================================================================

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum HarvestField {
    CropType,
    QuantityKg,
    OperatorId,
}

/// The record while the user is still editing it.
///
/// Fields hold what the user typed. The only eager processing is numeric
/// coercion of `quantity_input` into `quantity_kg`; everything else is checked
/// by [`HarvestDraft::freeze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HarvestDraft {
    /// Crop label as selected.
    pub crop_type: String,

    /// Quantity text exactly as typed.
    pub quantity_input: String,

    /// `quantity_input` coerced to a number, `None` if it does not parse.
    #[ts(as = "Option<String>")]
    pub quantity_kg: Option<Decimal>,

    pub operator_id: String,

    /// Copy of the last acquired fix.
    pub location: Option<LocationFix>,

    /// When this entry was started. Becomes the record timestamp.
    #[ts(as = "String")]
    pub captured_at: DateTime<Utc>,
}

impl HarvestDraft {
    /// Creates an empty draft stamped with its capture time.
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        HarvestDraft {
            crop_type: String::new(),
            quantity_input: String::new(),
            quantity_kg: None,
            operator_id: String::new(),
            location: None,
            captured_at,
        }
    }

    /// Stores a field value.
    pub fn set_field(&mut self, field: HarvestField, value: &str) {
        match field {
            HarvestField::CropType => self.crop_type = value.to_string(),
            HarvestField::QuantityKg => {
                self.quantity_input = value.to_string();
                self.quantity_kg = validation::parse_quantity_kg(value).ok();
            }
            HarvestField::OperatorId => self.operator_id = value.to_string(),
        }
    }

    /// Last write wins: a re-capture replaces the previous fix.
    pub fn set_location(&mut self, fix: LocationFix) {
        self.location = Some(fix);
    }

    pub fn clear_location(&mut self) {
        self.location = None;
    }

    /// Every reason this draft cannot be frozen yet, in form order.
    pub fn problems(&self) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        if let Err(e) = validation::validate_crop_type(&self.crop_type) {
            problems.push(e);
        }
        if let Err(e) = validation::validate_quantity_kg(&self.quantity_input) {
            problems.push(e);
        }
        if let Err(e) = validation::validate_operator_id(&self.operator_id) {
            problems.push(e);
        }
        if self.location.is_none() {
            problems.push(ValidationError::Required {
                field: "location".to_string(),
            });
        }
        problems
    }

    /// True when [`HarvestDraft::freeze`] would succeed.
    pub fn is_complete(&self) -> bool {
        self.problems().is_empty()
    }

    /// Validates the draft and produces an immutable record.
    ///
    /// The record keeps the draft's `captured_at`, not the freeze time.
    pub fn freeze(&self) -> ValidationResult<HarvestRecord> {
        let crop_type = validation::validate_crop_type(&self.crop_type)?;
        let quantity_kg = validation::validate_quantity_kg(&self.quantity_input)?;
        let operator_id = validation::validate_operator_id(&self.operator_id)?;
        let location = self.location.ok_or_else(|| ValidationError::Required {
            field: "location".to_string(),
        })?;

        Ok(HarvestRecord {
            crop_type,
            quantity_kg,
            operator_id,
            location,
            captured_at: self.captured_at,
        })
    }
}

// =============================================================================
// Harvest Record
// =============================================================================

/// A frozen harvest event, as handed to the ledger.
///
/// Only [`HarvestDraft::freeze`] builds one, so every record has passed
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HarvestRecord {
    crop_type: CropType,
    #[ts(as = "String")]
    quantity_kg: Decimal,
    operator_id: String,
    location: LocationFix,
    #[ts(as = "String")]
    captured_at: DateTime<Utc>,
}

impl HarvestRecord {
    #[inline]
    pub fn crop_type(&self) -> CropType {
        self.crop_type
    }

    #[inline]
    pub fn quantity_kg(&self) -> Decimal {
        self.quantity_kg
    }

    #[inline]
    pub fn operator_id(&self) -> &str {
        &self.operator_id
    }

    #[inline]
    pub fn location(&self) -> LocationFix {
        self.location
    }

    #[inline]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// JSON payload for ledger transports.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Batch Identifier
// =============================================================================

/// Opaque correlation token assigned once the ledger acknowledges a record.
///
/// Not a content hash: two identical records get two different identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct BatchIdentifier(String);

impl BatchIdentifier {
    /// Wraps an already-issued token. Fails on blank input.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "batch_id".to_string(),
            });
        }
        Ok(BatchIdentifier(value))
    }

    /// Assembles `{prefix}-{millis}-{suffix}`. Never blank, so infallible.
    pub fn compose(prefix: &str, millis: i64, suffix: &str) -> Self {
        BatchIdentifier(format!("{prefix}-{millis}-{suffix}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BatchIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Submission Result
// =============================================================================

/// Outcome of an acknowledged submission. Exactly one per confirmed record.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub batch_id: BatchIdentifier,
    #[ts(as = "String")]
    pub confirmed_at: DateTime<Utc>,
    pub success: bool,
    /// The record the ledger acknowledged.
    pub record: HarvestRecord,
}

impl SubmissionResult {
    pub fn confirmed(
        batch_id: BatchIdentifier,
        confirmed_at: DateTime<Utc>,
        record: HarvestRecord,
    ) -> Self {
        SubmissionResult {
            batch_id,
            confirmed_at,
            success: true,
            record,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    fn complete_draft() -> HarvestDraft {
        let mut draft = HarvestDraft::new(at(1_700_000_000));
        draft.set_field(HarvestField::CropType, "Tulsi");
        draft.set_field(HarvestField::QuantityKg, "2.5");
        draft.set_field(HarvestField::OperatorId, "F-100");
        draft.set_location(LocationFix::new(12.97, 77.59, at(1_700_000_100)).unwrap());
        draft
    }

    #[test]
    fn test_crop_type_labels() {
        assert_eq!(CropType::AloeVera.label(), "Aloe Vera");
        assert_eq!("aloe vera".parse::<CropType>().unwrap(), CropType::AloeVera);
        assert_eq!(" Tulsi ".parse::<CropType>().unwrap(), CropType::Tulsi);
        assert!("Basil".parse::<CropType>().is_err());
        assert_eq!(CropType::labels().len(), 7);
    }

    #[test]
    fn test_crop_type_serializes_as_label() {
        let json = serde_json::to_string(&CropType::AloeVera).unwrap();
        assert_eq!(json, "\"Aloe Vera\"");
    }

    #[test]
    fn test_location_fix_rejects_out_of_range() {
        assert!(LocationFix::new(90.0, 180.0, at(0)).is_ok());
        assert!(LocationFix::new(-90.0, -180.0, at(0)).is_ok());
        assert!(LocationFix::new(90.1, 0.0, at(0)).is_err());
        assert!(LocationFix::new(0.0, -180.5, at(0)).is_err());
        assert!(LocationFix::new(f64::NAN, 0.0, at(0)).is_err());
    }

    #[test]
    fn test_location_fix_deserialize_checks_bounds() {
        let fix = LocationFix::new(12.97, 77.59, at(0)).unwrap();
        let json = serde_json::to_string(&fix).unwrap();
        assert_eq!(serde_json::from_str::<LocationFix>(&json).unwrap(), fix);

        let bad = r#"{"latitude":95.0,"longitude":10.0,"capturedAt":"2025-10-14T09:30:00Z"}"#;
        let err = serde_json::from_str::<LocationFix>(bad).unwrap_err();
        assert!(err.to_string().contains("Invalid coordinates"));

        let mut draft = serde_json::to_value(complete_draft()).unwrap();
        draft["location"]["longitude"] = serde_json::json!(200.0);
        assert!(serde_json::from_value::<HarvestDraft>(draft).is_err());
    }

    #[test]
    fn test_location_fix_display() {
        let fix = LocationFix::new(12.97, 77.59, at(0)).unwrap();
        assert_eq!(fix.to_string(), "Lat: 12.970000, Lng: 77.590000");
    }

    #[test]
    fn test_quantity_coercion() {
        let mut draft = HarvestDraft::new(at(0));
        draft.set_field(HarvestField::QuantityKg, "2.5");
        assert_eq!(draft.quantity_kg, Some(Decimal::from_str("2.5").unwrap()));

        draft.set_field(HarvestField::QuantityKg, "two");
        assert_eq!(draft.quantity_kg, None);
        assert_eq!(draft.quantity_input, "two");
    }

    #[test]
    fn test_freeze_complete_draft() {
        let draft = complete_draft();
        let record = draft.freeze().unwrap();
        assert_eq!(record.crop_type(), CropType::Tulsi);
        assert_eq!(record.quantity_kg(), Decimal::from_str("2.5").unwrap());
        assert_eq!(record.operator_id(), "F-100");
        assert_eq!(record.location().latitude(), 12.97);
        assert_eq!(record.captured_at(), draft.captured_at);
    }

    #[test]
    fn test_freeze_reports_each_missing_field() {
        let cases: [(&str, fn(&mut HarvestDraft)); 4] = [
            ("crop_type", |d| d.set_field(HarvestField::CropType, "")),
            ("quantity_kg", |d| d.set_field(HarvestField::QuantityKg, "")),
            ("operator_id", |d| d.set_field(HarvestField::OperatorId, "  ")),
            ("location", |d| d.clear_location()),
        ];

        for (field, remove) in cases {
            let mut draft = complete_draft();
            remove(&mut draft);
            let err = draft.freeze().unwrap_err();
            assert_eq!(err.field(), field);
            assert!(!draft.is_complete());
            assert_eq!(draft.problems().len(), 1);
        }
    }

    #[test]
    fn test_frozen_record_is_a_copy() {
        let mut draft = complete_draft();
        let record = draft.freeze().unwrap();

        draft.set_location(LocationFix::new(-33.0, 151.0, at(5)).unwrap());
        draft.set_field(HarvestField::OperatorId, "F-200");

        assert_eq!(record.location().latitude(), 12.97);
        assert_eq!(record.operator_id(), "F-100");
    }

    #[test]
    fn test_record_payload() {
        let record = complete_draft().freeze().unwrap();
        let payload = record.to_payload().unwrap();
        assert!(payload.contains("\"cropType\":\"Tulsi\""));
        assert!(payload.contains("\"quantityKg\":\"2.5\""));
        assert!(payload.contains("\"operatorId\":\"F-100\""));
    }

    #[test]
    fn test_batch_identifier_rejects_blank() {
        assert!(BatchIdentifier::new("").is_err());
        assert!(BatchIdentifier::new("   ").is_err());
        assert_eq!(BatchIdentifier::new("BATCH-1").unwrap().as_str(), "BATCH-1");
    }
}
