//! # Validation Module
//!
//! Field validation for harvest entries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      When Validation Runs                               │
//! │                                                                         │
//! │  Typing (update_field)                                                 │
//! │  └── parse_quantity_kg only: numeric coercion, never rejects input     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Gating (can_submit)                                                   │
//! │  └── HarvestDraft::is_complete → every validator below                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Freezing (submit)                                                     │
//! │  └── HarvestDraft::freeze → same validators, first failure wins        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use harvest_core::validation::{validate_crop_type, validate_quantity_kg};
//! use harvest_core::CropType;
//!
//! assert_eq!(validate_crop_type("Tulsi").unwrap(), CropType::Tulsi);
//! assert!(validate_quantity_kg("2.5").is_ok());
//! assert!(validate_quantity_kg("0").is_err());
//! ```

use std::ops::RangeInclusive;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::CropType;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Valid latitudes in degrees.
pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitudes in degrees.
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Smallest positive quantity a `Decimal` holds without rounding to zero.
pub const QUANTITY_MIN_KG: f64 = 1e-28;

/// `Decimal::MAX` as a float.
pub const QUANTITY_MAX_KG: f64 = 7.922_816_251_426_434e28;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a crop label and resolves it to a [`CropType`].
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// ## Example
/// ```rust
/// use harvest_core::validation::validate_crop_type;
///
/// assert!(validate_crop_type("Aloe Vera").is_ok());
/// assert!(validate_crop_type("").is_err());
/// assert!(validate_crop_type("Basil").is_err());
/// ```
pub fn validate_crop_type(label: &str) -> ValidationResult<CropType> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "crop_type".to_string(),
        });
    }

    CropType::ALL
        .iter()
        .copied()
        .find(|crop| crop.label().eq_ignore_ascii_case(label))
        .ok_or_else(|| ValidationError::NotAllowed {
            field: "crop_type".to_string(),
            allowed: CropType::labels(),
        })
}

/// Validates an operator ID.
///
/// ## Returns
/// The trimmed ID.
pub fn validate_operator_id(operator_id: &str) -> ValidationResult<String> {
    let operator_id = operator_id.trim();

    if operator_id.is_empty() {
        return Err(ValidationError::Required {
            field: "operator_id".to_string(),
        });
    }

    Ok(operator_id.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Coerces quantity text into a decimal.
///
/// Accepts plain (`2.5`) and scientific (`2.5e1`) notation. Does not check
/// the sign of representable values; see [`validate_quantity_kg`].
///
/// Finite values beyond `Decimal` precision (below [`QUANTITY_MIN_KG`] or
/// above [`QUANTITY_MAX_KG`]) are reported as `OutOfRange`, never rounded.
pub fn parse_quantity_kg(input: &str) -> ValidationResult<Decimal> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "quantity_kg".to_string(),
        });
    }

    let parsed = Decimal::from_str(input).or_else(|_| Decimal::from_scientific(input));
    match parsed {
        Ok(quantity) if !quantity.is_zero() => Ok(quantity),
        // Zero or not a Decimal. A finite non-zero float is beyond Decimal precision.
        parsed => match input.parse::<f64>() {
            Ok(value) if value.is_finite() && value < 0.0 => {
                Err(ValidationError::MustBePositive {
                    field: "quantity_kg".to_string(),
                })
            }
            Ok(value) if value.is_finite() && value != 0.0 => {
                Err(ValidationError::OutOfRange {
                    field: "quantity_kg".to_string(),
                    min: QUANTITY_MIN_KG,
                    max: QUANTITY_MAX_KG,
                })
            }
            _ => parsed.map_err(|e| ValidationError::InvalidFormat {
                field: "quantity_kg".to_string(),
                reason: e.to_string(),
            }),
        },
    }
}

/// Validates a harvest quantity in kilograms.
///
/// ## Rules
/// - Must parse as a number
/// - Must be greater than zero
/// - Fractions and large values are accepted within
///   `QUANTITY_MIN_KG..=QUANTITY_MAX_KG`; values outside it are `OutOfRange`
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  User enters quantity: "2.5"                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity_kg("2.5") ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── empty?        → "quantity_kg is required"                     │
/// │       ├── not a number? → "quantity_kg has invalid format"              │
/// │       ├── <= 0?         → "quantity_kg must be positive"                │
/// │       │                                                                 │
/// │       └── OK → 2.5                                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity_kg(input: &str) -> ValidationResult<Decimal> {
    let quantity = parse_quantity_kg(input)?;

    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity_kg".to_string(),
        });
    }

    Ok(quantity)
}

/// Validates a coordinate pair. NaN fails both range checks.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> ValidationResult<()> {
    if !LATITUDE_RANGE.contains(&latitude) {
        return Err(ValidationError::OutOfRange {
            field: "latitude".to_string(),
            min: *LATITUDE_RANGE.start(),
            max: *LATITUDE_RANGE.end(),
        });
    }

    if !LONGITUDE_RANGE.contains(&longitude) {
        return Err(ValidationError::OutOfRange {
            field: "longitude".to_string(),
            min: *LONGITUDE_RANGE.start(),
            max: *LONGITUDE_RANGE.end(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_crop_type() {
        assert_eq!(validate_crop_type("Tulsi").unwrap(), CropType::Tulsi);
        assert_eq!(validate_crop_type("NEEM").unwrap(), CropType::Neem);
        assert_eq!(validate_crop_type("Aloe Vera").unwrap(), CropType::AloeVera);

        assert!(matches!(
            validate_crop_type("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_crop_type("Basil"),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_validate_operator_id() {
        assert_eq!(validate_operator_id(" F-100 ").unwrap(), "F-100");
        assert!(validate_operator_id("").is_err());
        assert!(validate_operator_id("\t").is_err());
    }

    #[test]
    fn test_parse_quantity_kg() {
        assert_eq!(parse_quantity_kg("2.5").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_quantity_kg("2.5e1").unwrap(), Decimal::new(25, 0));
        assert_eq!(parse_quantity_kg("-1").unwrap(), Decimal::new(-1, 0));
        assert!(matches!(
            parse_quantity_kg("abc"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_quantity_kg(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_quantity_beyond_decimal_precision_is_out_of_range() {
        let tiny = "0.00000000000000000000000000000001";
        assert!(matches!(
            parse_quantity_kg(tiny),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_quantity_kg(tiny),
            Err(ValidationError::OutOfRange { .. })
        ));

        for huge in ["1e29", "99999999999999999999999999999999"] {
            assert!(
                matches!(
                    validate_quantity_kg(huge),
                    Err(ValidationError::OutOfRange { .. })
                ),
                "{huge}"
            );
        }

        assert!(matches!(
            validate_quantity_kg("-1e40"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity_kg("1e4294967295"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_quantity_edges_of_decimal_range_are_kept() {
        assert_eq!(
            validate_quantity_kg("0.0000000000000000000000000001").unwrap(),
            Decimal::new(1, 28)
        );
        assert_eq!(
            validate_quantity_kg("79228162514264337593543950335").unwrap(),
            Decimal::MAX
        );
        assert_eq!(validate_quantity_kg("0.000").unwrap_err(), ValidationError::MustBePositive {
            field: "quantity_kg".to_string(),
        });
    }

    #[test]
    fn test_validate_quantity_kg() {
        assert!(validate_quantity_kg("0.1").is_ok());
        assert!(validate_quantity_kg("2.5").is_ok());
        assert!(validate_quantity_kg("1000000").is_ok());

        assert!(matches!(
            validate_quantity_kg("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity_kg("-3").is_err());
        assert!(validate_quantity_kg("NaN").is_err());
        assert!(validate_quantity_kg("inf").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(12.97, 77.59).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());

        let err = validate_coordinates(-90.5, 0.0).unwrap_err();
        assert_eq!(err.field(), "latitude");
        let err = validate_coordinates(0.0, 181.0).unwrap_err();
        assert_eq!(err.field(), "longitude");
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
        assert!(validate_coordinates(f64::NAN, f64::NAN).is_err());
    }
}
