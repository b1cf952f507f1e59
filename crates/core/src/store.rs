// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The submission store contract.

use crate::submission::{Partition, Submission};
use crate::sync::Promotion;
use odotrack_domain::{Plate, SubmissionFilter};
use time::Date;

/// Failures reported by a submission store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A submission with this id already exists in either partition.
    #[error("Submission id '{0}' already exists")]
    DuplicateId(String),
    /// No pending submission has this id.
    #[error("Pending submission '{0}' not found")]
    PendingNotFound(String),
    /// Stored data could not be turned back into a submission.
    #[error("Corrupt submission record '{id}': {reason}")]
    Corrupt { id: String, reason: String },
    /// The backing store is unavailable or failed.
    #[error("Store backend failure: {0}")]
    Backend(String),
}

/// Durable, partitioned log of submissions.
///
/// The committed and pending partitions are disjoint. Ids are unique across
/// both. An operation that returns `Err` has not changed the store.
pub trait SubmissionStore {
    /// Appends a submission to a partition.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the id is already stored, or a
    /// backend error if the write cannot be confirmed.
    fn append(&mut self, submission: &Submission, partition: Partition) -> Result<(), StoreError>;

    /// Returns every submission in either partition for `plate` on `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn query_by_plate_and_date(
        &mut self,
        plate: &Plate,
        date: Date,
    ) -> Result<Vec<Submission>, StoreError>;

    /// Lists submissions from both partitions matching `filter`.
    ///
    /// Results are sorted by date descending; within a date, the most
    /// recently stored submission comes first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_all(&mut self, filter: &SubmissionFilter) -> Result<Vec<Submission>, StoreError>;

    /// Lists one partition.
    ///
    /// The pending partition is returned in insertion order; the committed
    /// partition is returned most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_partition(&mut self, partition: Partition) -> Result<Vec<Submission>, StoreError>;

    /// Looks up a single submission in either partition.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_id(&mut self, id: &str) -> Result<Option<(Submission, Partition)>, StoreError>;

    /// Moves one pending submission into the committed log.
    ///
    /// The pending record `pending_id` is removed and `promoted` is stored as
    /// a committed record. Returns the committed id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::PendingNotFound` if `pending_id` is not pending,
    /// `StoreError::DuplicateId` if the new id is taken, or a backend error.
    fn promote(&mut self, pending_id: &str, promoted: &Submission) -> Result<String, StoreError>;

    /// Applies every promotion or none of them.
    ///
    /// Returns the committed ids in the order of `promotions`.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the store is left unchanged.
    fn promote_all(&mut self, promotions: &[Promotion]) -> Result<Vec<String>, StoreError>;

    /// Returns true if either partition holds a submission with this id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn contains_id(&mut self, id: &str) -> Result<bool, StoreError>;

    /// Returns the highest committed odometer reading for `plate`, counting
    /// only submissions for which `Submission::counts_toward_baseline` holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn latest_committed_odometer(&mut self, plate: &Plate) -> Result<Option<u32>, StoreError>;
}
