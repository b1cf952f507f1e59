// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Odotrack.
//!
//! Translates requests into core operations against a [`odotrack::SubmissionStore`],
//! maps core and domain errors into [`ApiError`], and runs the pending
//! queue reconciliation.

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

mod connectivity;
mod error;
mod handlers;
mod request_response;
mod sync;

#[cfg(test)]
mod tests;

pub use connectivity::ConnectivityMonitor;
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    EDIT_REASON_MISSING, get_submission, list_submissions, lookup_vehicle, parse_filter,
    submit_reading,
};
pub use request_response::{
    ConnectivityStatus, ListSubmissionsRequest, ListSubmissionsResponse, LookupVehicleRequest,
    OdometerInput, StatusChangeInfo, SubmissionDetailResponse, SubmissionInfo,
    SubmitReadingRequest, SubmitReadingResponse, VehicleInfo,
};
pub use sync::{SkipReason, SyncReconciler, SyncReport};
