// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::StoreError;
use crate::submission::Submission;
use odotrack_domain::{DomainError, RejectionReason};

/// Errors that can occur while creating or promoting submissions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// The reading failed a hard validation rule. No record was created.
    #[error("Reading rejected: {0}")]
    Rejected(RejectionReason),
    /// An active submission already exists for this plate today.
    ///
    /// The caller must confirm before a second submission is created.
    #[error("A submission for {} already exists today ({})", .0.vehicle_plate, .0.id)]
    DuplicateRequiresConfirmation(Box<Submission>),
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The submission store failed.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
    /// No unused identifier could be generated.
    #[error("Could not allocate a unique submission id after {attempts} attempts")]
    IdExhausted { attempts: usize },
}

impl CoreError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Rejected(reason) => reason.code(),
            Self::DuplicateRequiresConfirmation(_) => "duplicate_requires_confirmation",
            Self::DomainViolation(err) => err.code(),
            Self::Store(_) => "store_failure",
            Self::IdExhausted { .. } => "id_exhausted",
        }
    }
}
