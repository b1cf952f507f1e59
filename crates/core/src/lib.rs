// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod clock;
mod duplicate;
mod error;
mod prepare;
mod session;
mod store;
mod submission;
mod sync;

#[cfg(test)]
mod tests;

use odotrack_domain::{Vehicle, VehicleRegistry};

// Re-export public types and functions
pub use clock::{
    Clock, FixedClock, IdGenerator, MAX_ID_ATTEMPTS, SequentialIdGenerator, SystemClock,
    UuidIdGenerator, allocate_id,
};
pub use duplicate::{DuplicateDecision, check_duplicate, find_active_duplicate};
pub use error::CoreError;
pub use prepare::{PreparedSubmission, SubmissionRequest, prepare_submission};
pub use session::SessionContext;
pub use store::{StoreError, SubmissionStore};
pub use submission::{Connectivity, LOCATION_UNAVAILABLE, Partition, Submission, initial_status};
pub use sync::{Promotion, plan_promotions, promote_submission};

/// Resolves a plate and applies the effective odometer baseline.
///
/// The baseline is the larger of the registry's `last_odometer` and the
/// highest clean committed reading for the plate. Pending and flagged
/// submissions do not move it. The registry itself is never changed.
///
/// # Arguments
///
/// * `registry` - The vehicle registry
/// * `store` - The submission store
/// * `plate` - The plate as entered by the driver
///
/// # Errors
///
/// Returns an error if:
/// - No vehicle has this plate
/// - The store cannot be queried
pub fn resolve_vehicle<R, S>(
    registry: &R,
    store: &mut S,
    plate: &str,
) -> Result<Vehicle, CoreError>
where
    R: VehicleRegistry + ?Sized,
    S: SubmissionStore + ?Sized,
{
    let vehicle: Vehicle = registry.lookup(plate).map_err(CoreError::from)?;
    let committed: Option<u32> = store.latest_committed_odometer(&vehicle.plate)?;
    Ok(vehicle.with_committed_reading(committed))
}
