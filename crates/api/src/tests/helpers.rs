// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use odotrack::{
    Connectivity, FixedClock, Partition, Promotion, SequentialIdGenerator, StoreError,
    Submission, SubmissionStore,
};
use odotrack_domain::{FleetRegistry, Plate, SubmissionFilter, Vehicle};
use odotrack_persistence::Persistence;
use std::sync::Arc;
use time::macros::datetime;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;

use crate::{
    ApiError, OdometerInput, SubmitReadingRequest, SubmitReadingResponse, SyncReconciler,
    submit_reading,
};

pub fn create_test_now() -> OffsetDateTime {
    datetime!(2026-10-19 08:30 +04:00)
}

pub fn create_test_registry() -> FleetRegistry {
    let vehicle = |plate: &str, fleet: &str, kind: &str, driver: Option<&str>, last: u32| {
        Vehicle::new(
            Plate::new(plate).unwrap(),
            fleet.to_string(),
            kind.to_string(),
            driver.map(String::from),
            last,
        )
    };
    FleetRegistry::new(vec![
        vehicle("A 12345", "North Fleet", "Van", Some("Ali Hassan"), 25432),
        vehicle("B 67890", "North", "Truck", None, 55500),
        vehicle("C 24680", "South", "Truck", Some("John Doe"), 88650),
    ])
    .unwrap()
}

pub fn create_test_request(plate: &str, value: f64, confidence: f64) -> SubmitReadingRequest {
    SubmitReadingRequest {
        driver_id: String::from("driver-1"),
        plate: Some(plate.to_string()),
        odo_value: OdometerInput::Number(value),
        ocr_confidence: confidence,
        edited: false,
        edit_reason: None,
        notes: None,
        location: Some(String::from("Muscat, Oman")),
        confirm_duplicate: false,
    }
}

/// A store, registry, clock and id sequence for handler tests.
pub struct TestContext<S = Persistence> {
    pub store: S,
    pub registry: FleetRegistry,
    pub clock: FixedClock,
    pub ids: SequentialIdGenerator,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Persistence::new_in_memory().unwrap())
    }
}

impl<S: SubmissionStore> TestContext<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            registry: create_test_registry(),
            clock: FixedClock(create_test_now()),
            ids: SequentialIdGenerator::new(),
        }
    }

    pub fn submit(
        &mut self,
        request: SubmitReadingRequest,
        connectivity: Connectivity,
    ) -> Result<SubmitReadingResponse, ApiError> {
        submit_reading(
            &mut self.store,
            &self.registry,
            &self.clock,
            &self.ids,
            connectivity,
            request,
        )
    }
}

/// Shared store and reconciler, as wired by the server.
pub fn create_test_reconciler<S>(store: S) -> (Arc<Mutex<S>>, Arc<SyncReconciler<S>>)
where
    S: SubmissionStore + Send,
{
    let store: Arc<Mutex<S>> = Arc::new(Mutex::new(store));
    let reconciler: SyncReconciler<S> = SyncReconciler::new(
        Arc::clone(&store),
        Arc::new(FixedClock(create_test_now())),
        Arc::new(SequentialIdGenerator::new()),
    );
    (store, Arc::new(reconciler))
}

/// Returns a store holding `count` offline submissions for `A 12345`.
pub fn create_store_with_pending(count: u32) -> Persistence {
    let mut context: TestContext = TestContext::new();
    for i in 0..count {
        let mut request: SubmitReadingRequest =
            create_test_request("A 12345", 25500.0 + f64::from(i) * 10.0, 0.95);
        request.confirm_duplicate = true;
        context.submit(request, Connectivity::Offline).unwrap();
    }
    context.store
}

/// A store that can be told to fail writes.
pub struct FailingStore {
    pub inner: Persistence,
    pub fail_writes: bool,
}

impl FailingStore {
    fn write_failure() -> StoreError {
        StoreError::Backend(String::from("disk I/O error"))
    }
}

impl SubmissionStore for FailingStore {
    fn append(&mut self, submission: &Submission, partition: Partition) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(Self::write_failure());
        }
        self.inner.append(submission, partition)
    }

    fn query_by_plate_and_date(
        &mut self,
        plate: &Plate,
        date: Date,
    ) -> Result<Vec<Submission>, StoreError> {
        self.inner.query_by_plate_and_date(plate, date)
    }

    fn list_all(&mut self, filter: &SubmissionFilter) -> Result<Vec<Submission>, StoreError> {
        self.inner.list_all(filter)
    }

    fn list_partition(&mut self, partition: Partition) -> Result<Vec<Submission>, StoreError> {
        self.inner.list_partition(partition)
    }

    fn find_by_id(&mut self, id: &str) -> Result<Option<(Submission, Partition)>, StoreError> {
        self.inner.find_by_id(id)
    }

    fn promote(&mut self, pending_id: &str, promoted: &Submission) -> Result<String, StoreError> {
        if self.fail_writes {
            return Err(Self::write_failure());
        }
        self.inner.promote(pending_id, promoted)
    }

    fn promote_all(&mut self, promotions: &[Promotion]) -> Result<Vec<String>, StoreError> {
        if self.fail_writes {
            return Err(Self::write_failure());
        }
        self.inner.promote_all(promotions)
    }

    fn contains_id(&mut self, id: &str) -> Result<bool, StoreError> {
        self.inner.contains_id(id)
    }

    fn latest_committed_odometer(&mut self, plate: &Plate) -> Result<Option<u32>, StoreError> {
        self.inner.latest_committed_odometer(plate)
    }
}
