// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Same-day duplicate detection.

use crate::store::{StoreError, SubmissionStore};
use crate::submission::Submission;
use odotrack_domain::Plate;
use time::Date;

/// The driver's answer to a duplicate warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateDecision {
    /// The driver has not been asked, or declined.
    #[default]
    Unconfirmed,
    /// The driver chose to continue anyway.
    Confirmed,
}

impl DuplicateDecision {
    #[must_use]
    pub const fn from_confirmed(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Unconfirmed
        }
    }
}

/// Selects the most recent active submission from `candidates`.
///
/// Candidates are expected to share a plate and date already.
#[must_use]
pub fn find_active_duplicate(candidates: &[Submission]) -> Option<&Submission> {
    candidates
        .iter()
        .filter(|s| s.is_active())
        .max_by_key(|s| s.date_time)
}

/// Looks for an active submission for `plate` on `today` in either partition.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn check_duplicate<S>(
    plate: &Plate,
    today: Date,
    store: &mut S,
) -> Result<Option<Submission>, StoreError>
where
    S: SubmissionStore + ?Sized,
{
    let candidates: Vec<Submission> = store.query_by_plate_and_date(plate, today)?;
    Ok(find_active_duplicate(&candidates).cloned())
}
