// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use odotrack::{Partition, Submission};
use odotrack_domain::{FlagSet, Plate, SubmissionFilter, SubmissionStatus};
use time::Date;
use tracing::debug;

use crate::data_models::{SubmissionRow, format_date};
use crate::diesel_schema::submissions;
use crate::error::PersistenceError;

fn into_submissions(rows: Vec<SubmissionRow>) -> Result<Vec<Submission>, PersistenceError> {
    rows.into_iter().map(SubmissionRow::into_submission).collect()
}

/// Retrieves every submission for a plate on a date, from both partitions.
///
/// Rows are returned in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn query_by_plate_and_date(
    conn: &mut SqliteConnection,
    plate: &Plate,
    date: Date,
) -> Result<Vec<Submission>, PersistenceError> {
    let rows: Vec<SubmissionRow> = submissions::table
        .filter(submissions::vehicle_plate.eq(plate.as_str()))
        .filter(submissions::submission_date.eq(format_date(date)?))
        .order(submissions::seq.asc())
        .select(SubmissionRow::as_select())
        .load(conn)?;
    debug!(plate = %plate, %date, count = rows.len(), "Queried submissions by plate and date");
    into_submissions(rows)
}

/// Lists submissions from both partitions that pass `filter`.
///
/// The date criterion is applied in SQL; plate search and status membership
/// are applied to the decoded rows. Ordered by date descending, then most
/// recently stored first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_all(
    conn: &mut SqliteConnection,
    filter: &SubmissionFilter,
) -> Result<Vec<Submission>, PersistenceError> {
    let mut query = submissions::table
        .order((submissions::submission_date.desc(), submissions::seq.desc()))
        .select(SubmissionRow::as_select())
        .into_boxed();
    if let Some(date) = filter.date {
        query = query.filter(submissions::submission_date.eq(format_date(date)?));
    }
    let rows: Vec<SubmissionRow> = query.load(conn)?;

    let mut matching: Vec<Submission> = Vec::with_capacity(rows.len());
    for row in rows {
        let submission: Submission = row.into_submission()?;
        if filter.matches(
            &submission.vehicle_plate,
            submission.date,
            submission.status,
        ) {
            matching.push(submission);
        }
    }
    debug!(count = matching.len(), "Listed submissions");
    Ok(matching)
}

/// Lists one partition.
///
/// Pending rows come back in insertion order; committed rows most recent
/// first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_partition(
    conn: &mut SqliteConnection,
    partition: Partition,
) -> Result<Vec<Submission>, PersistenceError> {
    let query = submissions::table
        .filter(submissions::partition_name.eq(partition.as_str()))
        .select(SubmissionRow::as_select());
    let rows: Vec<SubmissionRow> = match partition {
        Partition::Pending => query.order(submissions::seq.asc()).load(conn)?,
        Partition::Committed => query.order(submissions::seq.desc()).load(conn)?,
    };
    into_submissions(rows)
}

/// Looks up a submission by id in either partition.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
pub fn find_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<(Submission, Partition)>, PersistenceError> {
    let row: Option<SubmissionRow> = submissions::table
        .filter(submissions::submission_id.eq(id))
        .select(SubmissionRow::as_select())
        .first(conn)
        .optional()?;
    row.map(|row| {
        let partition: Partition = row.partition()?;
        Ok((row.into_submission()?, partition))
    })
    .transpose()
}

/// Returns true if any row has this submission id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn contains_id(conn: &mut SqliteConnection, id: &str) -> Result<bool, PersistenceError> {
    let count: i64 = submissions::table
        .filter(submissions::submission_id.eq(id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Returns the highest committed odometer reading for a plate.
///
/// Only `Submitted` or `Verified` rows without flags count, matching
/// `Submission::counts_toward_baseline`.
///
/// # Errors
///
/// Returns an error if the query fails or the stored value is out of range.
pub fn latest_committed_odometer(
    conn: &mut SqliteConnection,
    plate: &Plate,
) -> Result<Option<u32>, PersistenceError> {
    let no_flags: String = serde_json::to_string(&FlagSet::new())?;
    let max: Option<i64> = submissions::table
        .filter(submissions::vehicle_plate.eq(plate.as_str()))
        .filter(submissions::partition_name.eq(Partition::Committed.as_str()))
        .filter(submissions::status.eq_any([
            SubmissionStatus::Submitted.as_str(),
            SubmissionStatus::Verified.as_str(),
        ]))
        .filter(submissions::flags_json.eq(no_flags))
        .select(diesel::dsl::max(submissions::odometer))
        .first(conn)?;
    max.map(|value| {
        u32::try_from(value).map_err(|e| PersistenceError::CorruptRow {
            id: plate.to_string(),
            reason: format!("odometer {value} out of range: {e}"),
        })
    })
    .transpose()
}
