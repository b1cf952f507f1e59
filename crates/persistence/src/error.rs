// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use odotrack::StoreError;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// A submission with this id is already stored.
    #[error("Submission id '{0}' already exists")]
    DuplicateSubmissionId(String),
    /// The pending submission to promote does not exist.
    #[error("Pending submission not found: {0}")]
    PendingNotFound(String),
    /// A stored row could not be turned back into a submission.
    #[error("Corrupt submission row '{id}': {reason}")]
    CorruptRow { id: String, reason: String },
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::DuplicateSubmissionId(id) => Self::DuplicateId(id),
            PersistenceError::PendingNotFound(id) => Self::PendingNotFound(id),
            PersistenceError::CorruptRow { id, reason } => Self::Corrupt { id, reason },
            other => Self::Backend(other.to_string()),
        }
    }
}
