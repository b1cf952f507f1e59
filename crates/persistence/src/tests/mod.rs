// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod promotion_tests;

use odotrack::{
    Connectivity, DuplicateDecision, SessionContext, Submission, SubmissionRequest,
    prepare_submission,
};
use odotrack_domain::{OcrReading, Plate, Vehicle};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_now() -> OffsetDateTime {
    datetime!(2026-10-19 08:30 +04:00)
}

pub fn create_test_vehicle(plate: &str) -> Vehicle {
    Vehicle::new(
        Plate::new(plate).unwrap(),
        String::from("North Fleet"),
        String::from("Van"),
        Some(String::from("Ali Hassan")),
        25650,
    )
}

/// Builds a submission through the real preparation path.
pub fn create_test_submission(
    id: &str,
    plate: &str,
    value: f64,
    at: OffsetDateTime,
    connectivity: Connectivity,
) -> Submission {
    let session: SessionContext =
        SessionContext::new(String::from("driver-1"), Some(create_test_vehicle(plate)));
    let request: SubmissionRequest = SubmissionRequest {
        reading: OcrReading::new(value, 0.987),
        notes: Some(String::from("Tyre pressure low")),
        location: Some(String::from("Muscat, Oman")),
        decision: DuplicateDecision::Confirmed,
    };
    prepare_submission(&session, request, &[], connectivity, at, id.to_string())
        .unwrap()
        .submission
}
