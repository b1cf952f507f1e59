// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use odotrack::{Partition, Submission};
use odotrack_audit::{Actor, History, StatusChange};
use odotrack_domain::{FlagSet, Plate, SubmissionStatus};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::submissions;
use crate::error::PersistenceError;

/// Serializable representation of a `StatusChange`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeData {
    pub status: SubmissionStatus,
    pub actor_id: String,
    pub actor_type: String,
    /// RFC 3339 timestamp.
    pub at: String,
}

/// Full row as read from the `submissions` table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = submissions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubmissionRow {
    #[allow(dead_code)]
    pub seq: i64,
    pub submission_id: String,
    pub partition_name: String,
    pub submission_date: String,
    pub submitted_at: String,
    pub vehicle_plate: String,
    pub odometer: i64,
    pub last_odometer: i64,
    pub ocr_confidence_percent: f64,
    pub flags_json: String,
    pub notes: Option<String>,
    pub location: String,
    pub status: String,
    pub history_json: String,
    pub edited: i32,
    pub edit_reason: Option<String>,
    pub driver_id: String,
}

/// Row written to the `submissions` table. `seq` is assigned by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = submissions)]
pub struct NewSubmissionRow<'a> {
    pub submission_id: &'a str,
    pub partition_name: &'static str,
    pub submission_date: String,
    pub submitted_at: String,
    pub vehicle_plate: &'a str,
    pub odometer: i64,
    pub last_odometer: i64,
    pub ocr_confidence_percent: f64,
    pub flags_json: String,
    pub notes: Option<&'a str>,
    pub location: &'a str,
    pub status: &'static str,
    pub history_json: String,
    pub edited: i32,
    pub edit_reason: Option<&'a str>,
    pub driver_id: &'a str,
}

/// Formats a calendar date as stored (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn parse_date(id: &str, value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| {
        PersistenceError::CorruptRow {
            id: id.to_string(),
            reason: format!("invalid date '{value}': {e}"),
        }
    })
}

fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn parse_timestamp(id: &str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| PersistenceError::CorruptRow {
        id: id.to_string(),
        reason: format!("invalid timestamp '{value}': {e}"),
    })
}

fn corrupt(id: &str, reason: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::CorruptRow {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

/// Builds the row for `submission` in `partition`.
///
/// # Errors
///
/// Returns an error if flags, history or timestamps cannot be serialized.
pub fn to_new_row(
    submission: &Submission,
    partition: Partition,
) -> Result<NewSubmissionRow<'_>, PersistenceError> {
    let history: Vec<StatusChangeData> = submission
        .history
        .entries()
        .iter()
        .map(|change| {
            Ok(StatusChangeData {
                status: change.status,
                actor_id: change.actor.id.clone(),
                actor_type: change.actor.actor_type.clone(),
                at: format_timestamp(change.at)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    Ok(NewSubmissionRow {
        submission_id: &submission.id,
        partition_name: partition.as_str(),
        submission_date: format_date(submission.date)?,
        submitted_at: format_timestamp(submission.date_time)?,
        vehicle_plate: submission.vehicle_plate.as_str(),
        odometer: i64::from(submission.odometer),
        last_odometer: i64::from(submission.last_odometer),
        ocr_confidence_percent: submission.ocr_confidence_percent,
        flags_json: serde_json::to_string(&submission.flags)?,
        notes: submission.notes.as_deref(),
        location: &submission.location,
        status: submission.status.as_str(),
        history_json: serde_json::to_string(&history)?,
        edited: i32::from(submission.edited),
        edit_reason: submission.edit_reason.as_deref(),
        driver_id: &submission.driver_id,
    })
}

impl SubmissionRow {
    /// Returns the partition this row belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored partition name is unknown.
    pub fn partition(&self) -> Result<Partition, PersistenceError> {
        self.partition_name
            .parse::<Partition>()
            .map_err(|e| corrupt(&self.submission_id, e))
    }

    /// Rebuilds the domain submission from this row.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::CorruptRow` if any column holds data that
    /// does not describe a valid submission.
    pub fn into_submission(self) -> Result<Submission, PersistenceError> {
        let id: &str = &self.submission_id;

        let flags: FlagSet = serde_json::from_str(&self.flags_json).map_err(|e| corrupt(id, e))?;
        let history_data: Vec<StatusChangeData> =
            serde_json::from_str(&self.history_json).map_err(|e| corrupt(id, e))?;
        let entries: Vec<StatusChange> = history_data
            .into_iter()
            .map(|data| {
                Ok(StatusChange::new(
                    data.status,
                    Actor::new(data.actor_id, data.actor_type),
                    parse_timestamp(id, &data.at)?,
                ))
            })
            .collect::<Result<_, PersistenceError>>()?;
        let history: History =
            History::from_entries(entries).ok_or_else(|| corrupt(id, "empty history"))?;

        let submission: Submission = Submission {
            date: parse_date(id, &self.submission_date)?,
            date_time: parse_timestamp(id, &self.submitted_at)?,
            vehicle_plate: Plate::new(&self.vehicle_plate).map_err(|e| corrupt(id, e))?,
            odometer: u32::try_from(self.odometer).map_err(|e| corrupt(id, e))?,
            last_odometer: u32::try_from(self.last_odometer).map_err(|e| corrupt(id, e))?,
            ocr_confidence_percent: self.ocr_confidence_percent,
            flags,
            notes: self.notes,
            location: self.location,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .map_err(|e| corrupt(id, e))?,
            history,
            edited: self.edited != 0,
            edit_reason: self.edit_reason,
            driver_id: self.driver_id,
            id: self.submission_id,
        };
        Ok(submission)
    }
}
