// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::duplicate::{DuplicateDecision, find_active_duplicate};
use crate::error::CoreError;
use crate::session::SessionContext;
use crate::submission::{
    Connectivity, LOCATION_UNAVAILABLE, Partition, Submission, initial_status,
};
use odotrack_audit::{History, StatusChange};
use odotrack_domain::{
    FlagSet, OcrReading, RejectionReason, SubmissionStatus, ValidationResult, validate,
    validate_notes,
};
use time::OffsetDateTime;

/// What the driver submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub reading: OcrReading,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub decision: DuplicateDecision,
}

/// A validated submission and the partition it must be appended to.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub submission: Submission,
    pub partition: Partition,
}

/// Builds a new submission from a request, without touching any store.
///
/// The session's vehicle must already carry the effective odometer baseline.
/// `same_day` holds the submissions already stored for the session's plate
/// today, from both partitions. `id` must carry the prefix of
/// `Partition::for_connectivity(connectivity)`.
///
/// # Arguments
///
/// * `session` - The driver and bound vehicle
/// * `request` - The reading and its annotations
/// * `same_day` - Existing submissions for the plate on the current day
/// * `connectivity` - Connectivity at submission time
/// * `now` - The current time in the driver's offset
/// * `id` - The id for the new submission
///
/// # Errors
///
/// Returns an error if:
/// - The notes are too long
/// - The reading fails a hard validation rule
/// - An active same-day submission exists and the decision is not `Confirmed`
pub fn prepare_submission(
    session: &SessionContext,
    request: SubmissionRequest,
    same_day: &[Submission],
    connectivity: Connectivity,
    now: OffsetDateTime,
    id: String,
) -> Result<PreparedSubmission, CoreError> {
    validate_notes(request.notes.as_deref())?;

    let (odometer, flags): (u32, FlagSet) =
        match validate(&request.reading, session.vehicle.as_ref()) {
            ValidationResult::Accepted {
                odometer, flags, ..
            } => (odometer, flags),
            ValidationResult::Rejected(reason) => return Err(CoreError::Rejected(reason)),
        };

    // Validation only accepts when a vehicle is bound
    let Some(vehicle) = session.vehicle.as_ref() else {
        return Err(CoreError::Rejected(RejectionReason::NoVehicleSession));
    };

    let unconfirmed: bool = request.decision != DuplicateDecision::Confirmed;
    if let Some(existing) = find_active_duplicate(same_day).filter(|_| unconfirmed) {
        return Err(CoreError::DuplicateRequiresConfirmation(Box::new(
            existing.clone(),
        )));
    }

    let status: SubmissionStatus = initial_status(&flags, connectivity);
    let history: History = History::new(StatusChange::new(status, session.actor(), now));
    let location: String = request
        .location
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| String::from(LOCATION_UNAVAILABLE));

    let submission: Submission = Submission {
        id,
        date: now.date(),
        date_time: now,
        vehicle_plate: vehicle.plate.clone(),
        odometer,
        last_odometer: vehicle.last_odometer,
        ocr_confidence_percent: request.reading.confidence_percent(),
        flags,
        notes: request.notes,
        location,
        status,
        history,
        edited: request.reading.edited,
        edit_reason: request.reading.edit_reason,
        driver_id: session.driver_id.clone(),
    };

    Ok(PreparedSubmission {
        submission,
        partition: Partition::for_connectivity(connectivity),
    })
}
