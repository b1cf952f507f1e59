// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time and identifier sources.

use crate::error::CoreError;
use crate::store::SubmissionStore;
use crate::submission::Partition;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{OffsetDateTime, UtcOffset};
use uuid::Uuid;

/// How many generated ids are tried before giving up.
pub const MAX_ID_ATTEMPTS: usize = 8;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time in the driver's local offset.
    fn now(&self) -> OffsetDateTime;
}

/// The system clock, reported in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    #[must_use]
    pub const fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Source of new submission ids.
pub trait IdGenerator: Send + Sync {
    /// Returns a candidate id for a submission stored in `partition`.
    ///
    /// Candidates carry the partition's prefix so pending and committed ids
    /// never collide. Uniqueness within a partition is checked by
    /// [`allocate_id`].
    fn generate(&self, partition: Partition) -> String;
}

/// Random v4 UUID ids, e.g. `sub-6f1c...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self, partition: Partition) -> String {
        format!("{}-{}", partition.id_prefix(), Uuid::new_v4())
    }
}

/// Deterministic ids `sub-1`, `pending-2`, ... sharing one counter.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self, partition: Partition) -> String {
        let n: u64 = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}-{n}", partition.id_prefix())
    }
}

/// Generates an id for `partition` that the store does not already hold.
///
/// `reserved` holds ids handed out but not yet stored; they are skipped too.
///
/// # Errors
///
/// Returns `CoreError::Store` if the store cannot be queried, or
/// `CoreError::IdExhausted` after [`MAX_ID_ATTEMPTS`] collisions.
pub fn allocate_id<S, G>(
    store: &mut S,
    ids: &G,
    partition: Partition,
    reserved: &[String],
) -> Result<String, CoreError>
where
    S: SubmissionStore + ?Sized,
    G: IdGenerator + ?Sized,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate: String = ids.generate(partition);
        if !reserved.contains(&candidate) && !store.contains_id(&candidate)? {
            return Ok(candidate);
        }
    }
    Err(CoreError::IdExhausted {
        attempts: MAX_ID_ATTEMPTS,
    })
}
