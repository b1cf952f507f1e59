// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised by domain lookups and record construction.
///
/// Reading validation failures are not errors; they are reported through
/// [`crate::ValidationResult::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// No vehicle with this plate exists in the fleet.
    #[error("Vehicle with plate '{plate}' not found")]
    VehicleNotFound {
        /// The plate as entered by the caller.
        plate: String,
    },
    /// The fleet configuration lists the same plate twice.
    #[error("Vehicle with plate '{plate}' is configured more than once")]
    DuplicateVehicle {
        /// The canonical plate.
        plate: String,
    },
    /// A plate is empty after trimming.
    #[error("Invalid plate: {0}")]
    InvalidPlate(String),
    /// Driver notes exceed the maximum length.
    #[error("Notes are {length} characters long; the maximum is {max}")]
    NotesTooLong {
        /// The character count of the rejected notes.
        length: usize,
        /// The maximum permitted character count.
        max: usize,
    },
    /// A stored or requested status name is not recognised.
    #[error("Invalid submission status: {status}")]
    InvalidStatus {
        /// The unrecognised status.
        status: String,
    },
    /// A stored flag code is not recognised.
    #[error("Invalid flag code: {flag}")]
    InvalidFlag {
        /// The unrecognised flag code.
        flag: String,
    },
    /// A status change is not permitted.
    #[error("Cannot move submission from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// Failed to parse a calendar date.
    #[error("Failed to parse date '{date_string}': {error}")]
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl DomainError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::VehicleNotFound { .. } => "vehicle_not_found",
            Self::DuplicateVehicle { .. } => "duplicate_vehicle",
            Self::InvalidPlate(_) => "invalid_plate",
            Self::NotesTooLong { .. } => "notes_too_long",
            Self::InvalidStatus { .. } => "invalid_status",
            Self::InvalidFlag { .. } => "invalid_flag",
            Self::InvalidStatusTransition { .. } => "invalid_status_transition",
            Self::DateParseError { .. } => "invalid_date",
        }
    }
}
