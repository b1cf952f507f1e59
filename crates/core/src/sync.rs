// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Planning the promotion of pending submissions.

use crate::clock::{IdGenerator, allocate_id};
use crate::error::CoreError;
use crate::store::SubmissionStore;
use crate::submission::{Partition, Submission};
use odotrack_audit::Actor;
use odotrack_domain::SubmissionStatus;
use time::OffsetDateTime;

/// One pending submission and the committed record that replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    /// The id of the pending record being removed.
    pub pending_id: String,
    /// The committed record, carrying its new id.
    pub promoted: Submission,
}

/// Turns a pending submission into its committed form.
///
/// The submission gets `committed_id`, moves to `Submitted` and records a
/// history entry by the sync actor. Flags are kept.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the submission cannot move to
/// `Submitted` from its current status.
pub fn promote_submission(
    pending: Submission,
    committed_id: String,
    now: OffsetDateTime,
) -> Result<Promotion, CoreError> {
    let pending_id: String = pending.id.clone();
    let mut promoted: Submission = pending;
    promoted.record_status(SubmissionStatus::Submitted, Actor::sync(), now)?;
    promoted.id = committed_id;
    Ok(Promotion {
        pending_id,
        promoted,
    })
}

/// Plans the promotion of every pending submission, in insertion order.
///
/// Each promotion gets a committed id that collides neither with the store
/// nor with any other id in the plan. Nothing is written.
///
/// # Errors
///
/// Returns an error if the store cannot be read, no unique id can be
/// allocated, or a pending submission cannot move to `Submitted`.
pub fn plan_promotions<S, G>(
    store: &mut S,
    ids: &G,
    now: OffsetDateTime,
) -> Result<Vec<Promotion>, CoreError>
where
    S: SubmissionStore + ?Sized,
    G: IdGenerator + ?Sized,
{
    let pending: Vec<Submission> = store.list_partition(Partition::Pending)?;
    let mut reserved: Vec<String> = Vec::with_capacity(pending.len());
    let mut plan: Vec<Promotion> = Vec::with_capacity(pending.len());

    for submission in pending {
        let committed_id: String = allocate_id(store, ids, Partition::Committed, &reserved)?;
        reserved.push(committed_id.clone());
        plan.push(promote_submission(submission, committed_id, now)?);
    }

    Ok(plan)
}
