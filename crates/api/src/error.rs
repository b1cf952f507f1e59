// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::request_response::SubmissionInfo;
use odotrack::{CoreError, StoreError};
use odotrack_domain::{DomainError, RejectionReason};

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// No vehicle has the requested plate.
    #[error("Vehicle with plate '{plate}' not found")]
    VehicleNotFound {
        /// The plate as requested.
        plate: String,
    },
    /// No submission has the requested id.
    #[error("Submission '{id}' not found")]
    SubmissionNotFound {
        /// The requested id.
        id: String,
    },
    /// The reading failed a hard validation rule.
    #[error("Reading rejected ({}): {reason}", reason.code())]
    Rejected {
        /// Why the reading was rejected.
        reason: RejectionReason,
    },
    /// An active submission already exists today and was not confirmed.
    #[error("A submission for {} already exists today", existing.vehicle_plate)]
    DuplicateRequiresConfirmation {
        /// The most recent active submission for the plate today.
        existing: Box<SubmissionInfo>,
    },
    /// A domain rule was violated.
    #[error("Domain rule violation ({rule}): {message}")]
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The submission store failed. Nothing was written.
    #[error("Store failure: {message}")]
    Store {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns a stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::VehicleNotFound { .. } => "vehicle_not_found",
            Self::SubmissionNotFound { .. } => "submission_not_found",
            Self::Rejected { reason } => reason.code(),
            Self::DuplicateRequiresConfirmation { .. } => "duplicate_requires_confirmation",
            Self::DomainRuleViolation { rule, .. } => rule,
            Self::Store { .. } => "store_failure",
            Self::Internal { .. } => "internal_error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This function explicitly maps domain errors to API errors,
/// ensuring domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::VehicleNotFound { plate } => ApiError::VehicleNotFound { plate },
        DomainError::InvalidPlate(message) => ApiError::InvalidInput {
            field: String::from("plate"),
            message,
        },
        DomainError::InvalidStatus { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::DateParseError { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message: err.to_string(),
        },
        DomainError::NotesTooLong { .. }
        | DomainError::DuplicateVehicle { .. }
        | DomainError::InvalidFlag { .. }
        | DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: err.code().to_string(),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Rejected(reason) => ApiError::Rejected { reason },
        CoreError::DuplicateRequiresConfirmation(submission) => {
            match SubmissionInfo::try_from(submission.as_ref()) {
                Ok(info) => ApiError::DuplicateRequiresConfirmation {
                    existing: Box::new(info),
                },
                Err(render_err) => render_err,
            }
        }
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(store_err) => ApiError::from(store_err),
        CoreError::IdExhausted { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
