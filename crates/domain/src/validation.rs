// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Flag, FlagSet, OcrReading, Vehicle};

/// Largest odometer value accepted, in kilometres.
pub const MAX_ODOMETER: u32 = 1_000_000;

/// A delta strictly above this value raises `odo_delta_high`.
pub const HIGH_DELTA_THRESHOLD: i64 = 300;

/// A confidence strictly below this value raises `low_ocr_confidence`.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Maximum length of driver notes, in characters.
pub const MAX_NOTES_CHARS: usize = 140;

/// Why a reading was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The value is not a finite integer.
    InvalidNumber,
    /// The value is outside `0..=1_000_000`.
    OutOfRange,
    /// The value is lower than the vehicle's last accepted reading.
    BelowLastReading,
    /// No vehicle is bound to the session.
    NoVehicleSession,
}

impl RejectionReason {
    /// Returns the stable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidNumber => "invalid_number",
            Self::OutOfRange => "out_of_range",
            Self::BelowLastReading => "below_last_reading",
            Self::NoVehicleSession => "no_vehicle_session",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message: &str = match self {
            Self::InvalidNumber => "Odometer reading is not a valid number",
            Self::OutOfRange => "Odometer reading is out of the reasonable range (0 - 1,000,000)",
            Self::BelowLastReading => {
                "Odometer reading cannot be less than the last verified reading"
            }
            Self::NoVehicleSession => "No vehicle is linked to this session",
        };
        f.write_str(message)
    }
}

/// Outcome of validating a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The reading may be submitted.
    Accepted {
        /// The reading as a whole number of kilometres.
        odometer: u32,
        /// `odometer - last_odometer`.
        delta: i64,
        /// Advisory flags in detection order.
        flags: FlagSet,
    },
    /// The reading must be corrected before it can be submitted.
    Rejected(RejectionReason),
}

impl ValidationResult {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<RejectionReason> {
        match self {
            Self::Accepted { .. } => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Validates a reading against the vehicle bound to the session.
///
/// Hard rules are checked in order and the first failure is reported:
/// invalid number, out of range, below the last reading, no vehicle session.
/// A reading that passes every hard rule is accepted with every soft flag
/// that applies.
///
/// This function is pure and deterministic.
///
/// # Arguments
///
/// * `reading` - The OCR (or corrected) reading
/// * `vehicle` - The vehicle bound to the session, if any
#[must_use]
pub fn validate(reading: &OcrReading, vehicle: Option<&Vehicle>) -> ValidationResult {
    let value: f64 = reading.value;

    // Rule: must be a finite whole number
    if !value.is_finite() || value.fract().abs() > 0.0 {
        return ValidationResult::Rejected(RejectionReason::InvalidNumber);
    }

    // Rule: must be within the plausible odometer range
    if value < 0.0 || value > f64::from(MAX_ODOMETER) {
        return ValidationResult::Rejected(RejectionReason::OutOfRange);
    }

    // In range and integral, so the cast is exact
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let odometer: u32 = value as u32;

    // Without a vehicle the baseline rule cannot apply, so the session rule is the first to fail
    let Some(vehicle) = vehicle else {
        return ValidationResult::Rejected(RejectionReason::NoVehicleSession);
    };

    if odometer < vehicle.last_odometer {
        return ValidationResult::Rejected(RejectionReason::BelowLastReading);
    }

    let delta: i64 = i64::from(odometer) - i64::from(vehicle.last_odometer);

    let mut flags: FlagSet = FlagSet::new();
    if delta > HIGH_DELTA_THRESHOLD {
        flags.insert(Flag::OdoDeltaHigh);
    }
    if reading.normalized_confidence() < LOW_CONFIDENCE_THRESHOLD {
        flags.insert(Flag::LowOcrConfidence);
    }

    ValidationResult::Accepted {
        odometer,
        delta,
        flags,
    }
}

/// Validates the length of driver notes.
///
/// # Errors
///
/// Returns `DomainError::NotesTooLong` if the notes exceed [`MAX_NOTES_CHARS`].
pub fn validate_notes(notes: Option<&str>) -> Result<(), DomainError> {
    let length: usize = notes.map_or(0, |n| n.chars().count());
    if length > MAX_NOTES_CHARS {
        return Err(DomainError::NotesTooLong {
            length,
            max: MAX_NOTES_CHARS,
        });
    }
    Ok(())
}
