// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use odotrack::{Partition, Promotion, Submission};
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewSubmissionRow, to_new_row};
use crate::diesel_schema::submissions;
use crate::error::PersistenceError;

/// Inserts a row, mapping a unique-constraint failure to a duplicate id.
fn insert_row(
    conn: &mut SqliteConnection,
    submission: &Submission,
    partition: Partition,
) -> Result<i64, PersistenceError> {
    let row: NewSubmissionRow<'_> = to_new_row(submission, partition)?;
    match diesel::insert_into(submissions::table)
        .values(&row)
        .execute(conn)
    {
        Ok(_) => get_last_insert_rowid(conn),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Err(
            PersistenceError::DuplicateSubmissionId(submission.id.clone()),
        ),
        Err(err) => Err(err.into()),
    }
}

/// Removes the pending row `pending_id` and stores `promoted` as committed.
///
/// Must run inside a transaction.
fn promote_in_tx(
    conn: &mut SqliteConnection,
    pending_id: &str,
    promoted: &Submission,
) -> Result<String, PersistenceError> {
    let deleted: usize = diesel::delete(
        submissions::table
            .filter(submissions::submission_id.eq(pending_id))
            .filter(submissions::partition_name.eq(Partition::Pending.as_str())),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::PendingNotFound(pending_id.to_string()));
    }

    let seq: i64 = insert_row(conn, promoted, Partition::Committed)?;
    debug!(pending_id, committed_id = %promoted.id, seq, "Promoted submission");
    Ok(promoted.id.clone())
}

/// Appends a submission to a partition.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateSubmissionId` if the id is already
/// stored in either partition, or an error if the insert fails.
pub fn append(
    conn: &mut SqliteConnection,
    submission: &Submission,
    partition: Partition,
) -> Result<(), PersistenceError> {
    let seq: i64 = insert_row(conn, submission, partition)?;
    info!(
        id = %submission.id,
        partition = partition.as_str(),
        status = submission.status.as_str(),
        seq,
        "Stored submission"
    );
    Ok(())
}

/// Promotes a single pending submission.
///
/// # Errors
///
/// Returns an error if the pending row does not exist, the new id is taken,
/// or the transaction fails. Nothing is changed on error.
pub fn promote(
    conn: &mut SqliteConnection,
    pending_id: &str,
    promoted: &Submission,
) -> Result<String, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|tx| promote_in_tx(tx, pending_id, promoted))
}

/// Promotes every listed submission in one transaction.
///
/// # Errors
///
/// Returns the first failure. The transaction is rolled back, so the pending
/// and committed partitions are exactly as they were.
pub fn promote_all(
    conn: &mut SqliteConnection,
    promotions: &[Promotion],
) -> Result<Vec<String>, PersistenceError> {
    let ids: Vec<String> = conn.transaction::<_, PersistenceError, _>(|tx| {
        promotions
            .iter()
            .map(|p| promote_in_tx(tx, &p.pending_id, &p.promoted))
            .collect()
    })?;
    info!(count = ids.len(), "Promoted pending submissions");
    Ok(ids)
}
