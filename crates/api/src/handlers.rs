// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for submissions and vehicle lookup.
//!
//! Handlers are synchronous and take the store by mutable reference. The
//! caller owns locking.

use odotrack::{
    Clock, Connectivity, DuplicateDecision, IdGenerator, Partition, PreparedSubmission,
    SessionContext, Submission, SubmissionRequest, SubmissionStore, allocate_id,
    prepare_submission, resolve_vehicle,
};
use odotrack_domain::{
    DomainError, OcrReading, SubmissionFilter, SubmissionStatus, Vehicle, VehicleRegistry,
};
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    ListSubmissionsRequest, ListSubmissionsResponse, LookupVehicleRequest, StatusChangeInfo,
    SubmissionDetailResponse, SubmissionInfo, SubmitReadingRequest, SubmitReadingResponse,
    VehicleInfo,
};

/// Warning returned when an edited reading carries no reason.
pub const EDIT_REASON_MISSING: &str = "edit_reason_missing";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Looks up a vehicle and its effective odometer baseline.
///
/// # Errors
///
/// Returns an error if:
/// - The plate is missing or blank
/// - No vehicle has this plate
/// - The store cannot be queried
pub fn lookup_vehicle<S>(
    store: &mut S,
    registry: &dyn VehicleRegistry,
    request: &LookupVehicleRequest,
) -> Result<VehicleInfo, ApiError>
where
    S: SubmissionStore + ?Sized,
{
    let Some(plate) = non_blank(request.plate.as_deref()) else {
        return Err(ApiError::InvalidInput {
            field: String::from("plate"),
            message: String::from("A plate is required"),
        });
    };

    let vehicle: Vehicle = resolve_vehicle(registry, store, plate).map_err(translate_core_error)?;
    debug!(plate = %vehicle.plate, last_odometer = vehicle.last_odometer, "Resolved vehicle");
    Ok(VehicleInfo::from(&vehicle))
}

/// Validates a reading and appends it to the store.
///
/// The submission goes to the committed partition when `connectivity` is
/// online and to the pending partition otherwise. A submission is only
/// reported as created once the store has accepted it.
///
/// # Arguments
///
/// * `store` - The submission store
/// * `registry` - The vehicle registry
/// * `clock` - The clock in the driver's local offset
/// * `ids` - The id generator
/// * `connectivity` - Connectivity at submission time
/// * `request` - The submission request
///
/// # Errors
///
/// Returns an error if:
/// - The plate is not in the registry
/// - The notes are too long
/// - The reading fails a hard validation rule
/// - An unconfirmed active submission already exists today
/// - The store fails
pub fn submit_reading<S>(
    store: &mut S,
    registry: &dyn VehicleRegistry,
    clock: &dyn Clock,
    ids: &dyn IdGenerator,
    connectivity: Connectivity,
    request: SubmitReadingRequest,
) -> Result<SubmitReadingResponse, ApiError>
where
    S: SubmissionStore + ?Sized,
{
    let vehicle: Option<Vehicle> = match non_blank(request.plate.as_deref()) {
        Some(plate) => Some(resolve_vehicle(registry, store, plate).map_err(translate_core_error)?),
        None => None,
    };

    let mut warnings: Vec<String> = Vec::new();
    let reading: OcrReading = request.reading();
    if reading.missing_edit_reason() {
        warn!(driver_id = %request.driver_id, "Reading was edited without a reason");
        warnings.push(String::from(EDIT_REASON_MISSING));
    }

    let session: SessionContext = SessionContext::new(request.driver_id, vehicle);
    let now: OffsetDateTime = clock.now();

    let same_day: Vec<Submission> = match session.vehicle.as_ref() {
        Some(vehicle) => store
            .query_by_plate_and_date(&vehicle.plate, now.date())
            .inspect_err(|e| error!(error = %e, "Failed to query same-day submissions"))?,
        None => Vec::new(),
    };

    let partition: Partition = Partition::for_connectivity(connectivity);
    let id: String = allocate_id(store, ids, partition, &[]).map_err(translate_core_error)?;

    let submission_request: SubmissionRequest = SubmissionRequest {
        reading,
        notes: request.notes,
        location: request.location,
        decision: DuplicateDecision::from_confirmed(request.confirm_duplicate),
    };
    let prepared: PreparedSubmission = prepare_submission(
        &session,
        submission_request,
        &same_day,
        connectivity,
        now,
        id,
    )
    .map_err(translate_core_error)?;

    store
        .append(&prepared.submission, prepared.partition)
        .inspect_err(|e| {
            error!(
                error = %e,
                submission_id = %prepared.submission.id,
                "Failed to store submission"
            );
        })?;

    info!(
        submission_id = %prepared.submission.id,
        plate = %prepared.submission.vehicle_plate,
        status = %prepared.submission.status,
        partition = prepared.partition.as_str(),
        "Stored odometer submission"
    );

    Ok(SubmitReadingResponse {
        submission: SubmissionInfo::try_from(&prepared.submission)?,
        partition: prepared.partition.as_str().to_string(),
        warnings,
    })
}

/// Builds a submission filter from query parameters.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the date or a status cannot be parsed.
pub fn parse_filter(request: &ListSubmissionsRequest) -> Result<SubmissionFilter, ApiError> {
    let mut filter: SubmissionFilter = SubmissionFilter::new();

    if let Some(search) = non_blank(request.search.as_deref()) {
        filter = filter.with_search(search);
    }

    if let Some(date) = non_blank(request.date.as_deref()) {
        let parsed: Date = Date::parse(date, format_description!("[year]-[month]-[day]"))
            .map_err(|e| {
                translate_domain_error(DomainError::DateParseError {
                    date_string: date.to_string(),
                    error: e.to_string(),
                })
            })?;
        filter = filter.with_date(parsed);
    }

    if let Some(statuses) = non_blank(request.status.as_deref()) {
        for name in statuses.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let status: SubmissionStatus = name.parse().map_err(translate_domain_error)?;
            filter = filter.with_status(status);
        }
    }

    Ok(filter)
}

/// Lists submissions from both partitions.
///
/// # Errors
///
/// Returns an error if the filter is invalid or the store fails.
pub fn list_submissions<S>(
    store: &mut S,
    request: &ListSubmissionsRequest,
) -> Result<ListSubmissionsResponse, ApiError>
where
    S: SubmissionStore + ?Sized,
{
    let filter: SubmissionFilter = parse_filter(request)?;
    let submissions: Vec<Submission> = store.list_all(&filter)?;

    Ok(ListSubmissionsResponse {
        submissions: submissions
            .iter()
            .map(SubmissionInfo::try_from)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Returns one submission with its history.
///
/// # Errors
///
/// Returns `ApiError::SubmissionNotFound` if no submission has this id, or
/// a store error.
pub fn get_submission<S>(store: &mut S, id: &str) -> Result<SubmissionDetailResponse, ApiError>
where
    S: SubmissionStore + ?Sized,
{
    let Some((submission, partition)) = store.find_by_id(id)? else {
        return Err(ApiError::SubmissionNotFound { id: id.to_string() });
    };

    Ok(SubmissionDetailResponse {
        submission: SubmissionInfo::try_from(&submission)?,
        partition: partition.as_str().to_string(),
        history: submission
            .history
            .entries()
            .iter()
            .map(StatusChangeInfo::try_from)
            .collect::<Result<Vec<_>, _>>()?,
    })
}
