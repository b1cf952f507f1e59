// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Odotrack.
//!
//! This crate stores odometer submissions in `SQLite` through Diesel and
//! implements the [`odotrack::SubmissionStore`] contract.
//!
//! ## Partitions
//!
//! Committed and pending submissions live in one `submissions` table,
//! distinguished by a `partition_name` column (`committed` / `pending`).
//! An autoincrement `seq` column records insertion order. Submission ids are
//! unique across the whole table, so the two partitions can never share an
//! id.
//!
//! Promotion deletes the pending row and inserts a committed row inside a
//! single transaction. The promoted row gets a fresh `seq`, which places it at
//! the head of the committed log.
//!
//! ## Storage
//!
//! - In-memory databases (`new_in_memory`) are used by tests; each call gets
//!   its own isolated database.
//! - File databases (`new_with_file`) survive restarts and run in WAL mode.
//!
//! Migrations are embedded in the binary and applied on open.
//!
//! ## Testing Philosophy
//!
//! - Tests run against in-memory `SQLite` only
//! - No external infrastructure is required

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use odotrack::{Partition, Promotion, StoreError, Submission, SubmissionStore};
use odotrack_domain::{Plate, SubmissionFilter};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite`-backed submission store.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so instances never
    /// see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::sqlite::enable_wal_mode(&mut conn)?;

        Ok(Self { conn })
    }
}

impl SubmissionStore for Persistence {
    fn append(&mut self, submission: &Submission, partition: Partition) -> Result<(), StoreError> {
        mutations::append(&mut self.conn, submission, partition).map_err(StoreError::from)
    }

    fn query_by_plate_and_date(
        &mut self,
        plate: &Plate,
        date: Date,
    ) -> Result<Vec<Submission>, StoreError> {
        queries::query_by_plate_and_date(&mut self.conn, plate, date).map_err(StoreError::from)
    }

    fn list_all(&mut self, filter: &SubmissionFilter) -> Result<Vec<Submission>, StoreError> {
        queries::list_all(&mut self.conn, filter).map_err(StoreError::from)
    }

    fn list_partition(&mut self, partition: Partition) -> Result<Vec<Submission>, StoreError> {
        queries::list_partition(&mut self.conn, partition).map_err(StoreError::from)
    }

    fn find_by_id(&mut self, id: &str) -> Result<Option<(Submission, Partition)>, StoreError> {
        queries::find_by_id(&mut self.conn, id).map_err(StoreError::from)
    }

    fn promote(&mut self, pending_id: &str, promoted: &Submission) -> Result<String, StoreError> {
        mutations::promote(&mut self.conn, pending_id, promoted).map_err(StoreError::from)
    }

    fn promote_all(&mut self, promotions: &[Promotion]) -> Result<Vec<String>, StoreError> {
        mutations::promote_all(&mut self.conn, promotions).map_err(StoreError::from)
    }

    fn contains_id(&mut self, id: &str) -> Result<bool, StoreError> {
        queries::contains_id(&mut self.conn, id).map_err(StoreError::from)
    }

    fn latest_committed_odometer(&mut self, plate: &Plate) -> Result<Option<u32>, StoreError> {
        queries::latest_committed_odometer(&mut self.conn, plate).map_err(StoreError::from)
    }
}
