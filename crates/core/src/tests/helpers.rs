// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Connectivity, DuplicateDecision, Partition, Promotion, SessionContext, StoreError, Submission,
    SubmissionRequest, SubmissionStore, initial_status,
};
use odotrack_audit::{Actor, History, StatusChange};
use odotrack_domain::{FlagSet, OcrReading, Plate, SubmissionFilter, Vehicle};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

pub fn create_test_now() -> OffsetDateTime {
    datetime!(2026-10-19 08:30 +04:00)
}

pub fn create_test_vehicle() -> Vehicle {
    Vehicle::new(
        Plate::new("A 12345").unwrap(),
        String::from("North Fleet"),
        String::from("Van"),
        Some(String::from("Ali Hassan")),
        25650,
    )
}

pub fn create_test_session() -> SessionContext {
    SessionContext::new(String::from("driver-1"), Some(create_test_vehicle()))
}

pub fn create_test_request(value: f64, confidence: f64) -> SubmissionRequest {
    SubmissionRequest {
        reading: OcrReading::new(value, confidence),
        notes: None,
        location: Some(String::from("Muscat, Oman")),
        decision: DuplicateDecision::Unconfirmed,
    }
}

/// Builds a stored-looking submission without going through validation.
pub fn create_test_submission(
    id: &str,
    plate: &str,
    at: OffsetDateTime,
    flags: FlagSet,
    connectivity: Connectivity,
) -> Submission {
    let status = initial_status(&flags, connectivity);
    Submission {
        id: id.to_string(),
        date: at.date(),
        date_time: at,
        vehicle_plate: Plate::new(plate).unwrap(),
        odometer: 25900,
        last_odometer: 25650,
        ocr_confidence_percent: 99.0,
        flags,
        notes: None,
        location: String::from("Muscat, Oman"),
        status,
        history: History::new(StatusChange::new(status, Actor::driver("driver-1"), at)),
        edited: false,
        edit_reason: None,
        driver_id: String::from("driver-1"),
    }
}

/// A `Vec`-backed store for exercising the core against the store contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Most recent first.
    pub committed: Vec<Submission>,
    /// Insertion order.
    pub pending: Vec<Submission>,
    pub fail_reads: bool,
}

impl MemoryStore {
    fn check(&self) -> Result<(), StoreError> {
        if self.fail_reads {
            Err(StoreError::Backend(String::from("disk unavailable")))
        } else {
            Ok(())
        }
    }

    fn all(&self) -> impl Iterator<Item = &Submission> {
        self.committed.iter().chain(self.pending.iter())
    }
}

impl SubmissionStore for MemoryStore {
    fn append(&mut self, submission: &Submission, partition: Partition) -> Result<(), StoreError> {
        if self.contains_id(&submission.id)? {
            return Err(StoreError::DuplicateId(submission.id.clone()));
        }
        match partition {
            Partition::Committed => self.committed.insert(0, submission.clone()),
            Partition::Pending => self.pending.push(submission.clone()),
        }
        Ok(())
    }

    fn query_by_plate_and_date(
        &mut self,
        plate: &Plate,
        date: Date,
    ) -> Result<Vec<Submission>, StoreError> {
        self.check()?;
        Ok(self
            .all()
            .filter(|s| &s.vehicle_plate == plate && s.date == date)
            .cloned()
            .collect())
    }

    fn list_all(&mut self, filter: &SubmissionFilter) -> Result<Vec<Submission>, StoreError> {
        self.check()?;
        let mut all: Vec<Submission> = self
            .all()
            .filter(|s| filter.matches(&s.vehicle_plate, s.date, s.status))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    fn list_partition(&mut self, partition: Partition) -> Result<Vec<Submission>, StoreError> {
        self.check()?;
        Ok(match partition {
            Partition::Committed => self.committed.clone(),
            Partition::Pending => self.pending.clone(),
        })
    }

    fn find_by_id(&mut self, id: &str) -> Result<Option<(Submission, Partition)>, StoreError> {
        self.check()?;
        if let Some(s) = self.committed.iter().find(|s| s.id == id) {
            return Ok(Some((s.clone(), Partition::Committed)));
        }
        Ok(self
            .pending
            .iter()
            .find(|s| s.id == id)
            .map(|s| (s.clone(), Partition::Pending)))
    }

    fn promote(&mut self, pending_id: &str, promoted: &Submission) -> Result<String, StoreError> {
        let index: usize = self
            .pending
            .iter()
            .position(|s| s.id == pending_id)
            .ok_or_else(|| StoreError::PendingNotFound(pending_id.to_string()))?;
        if self.contains_id(&promoted.id)? {
            return Err(StoreError::DuplicateId(promoted.id.clone()));
        }
        self.pending.remove(index);
        self.committed.insert(0, promoted.clone());
        Ok(promoted.id.clone())
    }

    fn promote_all(&mut self, promotions: &[Promotion]) -> Result<Vec<String>, StoreError> {
        let snapshot: (Vec<Submission>, Vec<Submission>) =
            (self.committed.clone(), self.pending.clone());
        let mut ids: Vec<String> = Vec::with_capacity(promotions.len());
        for promotion in promotions {
            match self.promote(&promotion.pending_id, &promotion.promoted) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    (self.committed, self.pending) = snapshot;
                    return Err(err);
                }
            }
        }
        Ok(ids)
    }

    fn contains_id(&mut self, id: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.all().any(|s| s.id == id))
    }

    fn latest_committed_odometer(&mut self, plate: &Plate) -> Result<Option<u32>, StoreError> {
        self.check()?;
        Ok(self
            .committed
            .iter()
            .filter(|s| &s.vehicle_plate == plate && s.counts_toward_baseline())
            .map(|s| s.odometer)
            .max())
    }
}
