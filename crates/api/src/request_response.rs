// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use crate::error::ApiError;
use odotrack::Submission;
use odotrack_audit::StatusChange;
use odotrack_domain::{OcrReading, Vehicle};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

fn format_date(date: Date) -> Result<String, ApiError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format date: {e}"),
        })
}

fn format_timestamp(at: OffsetDateTime) -> Result<String, ApiError> {
    at.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

/// An odometer value as sent by a client.
///
/// Clients may send the OCR output as a number or the driver's corrected
/// text as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OdometerInput {
    Number(f64),
    Text(String),
}

/// API request to look up a vehicle by plate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LookupVehicleRequest {
    /// The plate as entered by the driver.
    pub plate: Option<String>,
}

/// API response describing a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleInfo {
    /// The canonical plate.
    pub plate: String,
    /// The fleet the vehicle belongs to.
    pub fleet: String,
    /// The vehicle type.
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// The assigned driver, if any.
    pub driver: Option<String>,
    /// The effective last odometer reading.
    pub last_odometer: u32,
}

impl From<&Vehicle> for VehicleInfo {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            plate: vehicle.plate.to_string(),
            fleet: vehicle.fleet.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            driver: vehicle.driver.clone(),
            last_odometer: vehicle.last_odometer,
        }
    }
}

/// API request to submit an odometer reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReadingRequest {
    /// The submitting driver's identity.
    pub driver_id: String,
    /// The plate of the vehicle bound to the driver's session.
    ///
    /// Omitted when no vehicle has been identified yet.
    #[serde(default)]
    pub plate: Option<String>,
    /// The odometer value.
    pub odo_value: OdometerInput,
    /// OCR confidence in `[0, 1]`.
    pub ocr_confidence: f64,
    /// True if the driver corrected the OCR output.
    #[serde(default)]
    pub edited: bool,
    /// Why the driver corrected the OCR output.
    #[serde(default)]
    pub edit_reason: Option<String>,
    /// Free-text driver notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Human-readable location, if available.
    #[serde(default)]
    pub location: Option<String>,
    /// True once the driver has confirmed a same-day duplicate.
    #[serde(default)]
    pub confirm_duplicate: bool,
}

impl SubmitReadingRequest {
    /// Builds the domain reading described by this request.
    #[must_use]
    pub fn reading(&self) -> OcrReading {
        let reading: OcrReading = match &self.odo_value {
            OdometerInput::Number(value) => OcrReading::new(*value, self.ocr_confidence),
            OdometerInput::Text(text) => OcrReading::from_text(text, self.ocr_confidence),
        };
        if self.edited {
            reading.with_edit(self.edit_reason.clone())
        } else {
            reading
        }
    }
}

/// A submission as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionInfo {
    pub id: String,
    /// The local calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// RFC 3339 timestamp with the driver's offset.
    pub date_time: String,
    pub vehicle_plate: String,
    pub odometer: u32,
    pub last_odometer: u32,
    /// `odometer - last_odometer`.
    pub delta: i64,
    /// OCR confidence as a percentage with one decimal.
    pub ocr_confidence: f64,
    pub flags: Vec<String>,
    pub notes: Option<String>,
    pub location: String,
    pub status: String,
    pub edited: bool,
    pub edit_reason: Option<String>,
    pub driver_id: String,
}

impl TryFrom<&Submission> for SubmissionInfo {
    type Error = ApiError;

    fn try_from(submission: &Submission) -> Result<Self, Self::Error> {
        Ok(Self {
            id: submission.id.clone(),
            date: format_date(submission.date)?,
            date_time: format_timestamp(submission.date_time)?,
            vehicle_plate: submission.vehicle_plate.to_string(),
            odometer: submission.odometer,
            last_odometer: submission.last_odometer,
            delta: submission.delta(),
            ocr_confidence: submission.ocr_confidence_percent,
            flags: submission
                .flags
                .codes()
                .into_iter()
                .map(String::from)
                .collect(),
            notes: submission.notes.clone(),
            location: submission.location.clone(),
            status: submission.status.to_string(),
            edited: submission.edited,
            edit_reason: submission.edit_reason.clone(),
            driver_id: submission.driver_id.clone(),
        })
    }
}

/// One entry of a submission's status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeInfo {
    pub status: String,
    pub actor_id: String,
    pub actor_type: String,
    /// RFC 3339 timestamp.
    pub at: String,
}

impl TryFrom<&StatusChange> for StatusChangeInfo {
    type Error = ApiError;

    fn try_from(change: &StatusChange) -> Result<Self, Self::Error> {
        Ok(Self {
            status: change.status.to_string(),
            actor_id: change.actor.id.clone(),
            actor_type: change.actor.actor_type.clone(),
            at: format_timestamp(change.at)?,
        })
    }
}

/// API response for a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReadingResponse {
    /// The stored submission.
    pub submission: SubmissionInfo,
    /// `committed` or `pending`.
    pub partition: String,
    /// Non-blocking policy warnings, e.g. `edit_reason_missing`.
    pub warnings: Vec<String>,
}

/// API request to list submissions.
///
/// Every field is optional. `status` is a comma separated list of status
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListSubmissionsRequest {
    #[serde(default)]
    pub search: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// API response for listing submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSubmissionsResponse {
    /// Matching submissions, most recent date first.
    pub submissions: Vec<SubmissionInfo>,
}

/// API response with a single submission and its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDetailResponse {
    pub submission: SubmissionInfo,
    /// `committed` or `pending`.
    pub partition: String,
    /// Status changes, most recent first.
    pub history: Vec<StatusChangeInfo>,
}

/// The current connectivity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    pub online: bool,
}
