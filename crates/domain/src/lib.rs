// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod filter;
mod registry;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use filter::SubmissionFilter;
pub use registry::{FleetRegistry, VehicleRegistry};
pub use types::{Flag, FlagSet, OcrReading, Plate, SubmissionStatus, Vehicle};
pub use validation::{
    HIGH_DELTA_THRESHOLD, LOW_CONFIDENCE_THRESHOLD, MAX_NOTES_CHARS, MAX_ODOMETER,
    RejectionReason, ValidationResult, validate, validate_notes,
};
