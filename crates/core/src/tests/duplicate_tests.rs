// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Connectivity, Submission, check_duplicate, find_active_duplicate};
use odotrack_domain::{Flag, FlagSet, Plate};
use time::Duration;

use super::helpers::{MemoryStore, create_test_now, create_test_submission};

fn create_flagged(id: &str, plate: &str, hours_later: i64) -> Submission {
    create_test_submission(
        id,
        plate,
        create_test_now() + Duration::hours(hours_later),
        FlagSet::from_iter([Flag::OdoDeltaHigh]),
        Connectivity::Online,
    )
}

#[test]
fn test_flagged_submission_today_is_found() {
    let mut store: MemoryStore = MemoryStore::default();
    store.committed.push(create_flagged("sub-1", "A 12345", 0));

    let found: Option<Submission> = check_duplicate(
        &Plate::new("A 12345").unwrap(),
        create_test_now().date(),
        &mut store,
    )
    .unwrap();
    assert_eq!(found.map(|s| s.id), Some(String::from("sub-1")));
}

#[test]
fn test_other_plate_or_date_is_not_a_duplicate() {
    let mut store: MemoryStore = MemoryStore::default();
    store.committed.push(create_flagged("sub-1", "A 12345", 0));

    let other_plate = check_duplicate(
        &Plate::new("B 67890").unwrap(),
        create_test_now().date(),
        &mut store,
    )
    .unwrap();
    assert!(other_plate.is_none());

    let yesterday = check_duplicate(
        &Plate::new("A 12345").unwrap(),
        create_test_now().date().previous_day().unwrap(),
        &mut store,
    )
    .unwrap();
    assert!(yesterday.is_none());
}

#[test]
fn test_most_recent_active_match_wins() {
    let candidates: Vec<Submission> = vec![
        create_flagged("sub-1", "A 12345", 0),
        create_flagged("sub-3", "A 12345", 2),
        create_flagged("sub-2", "A 12345", 1),
    ];

    let found: &Submission = find_active_duplicate(&candidates).unwrap();
    assert_eq!(found.id, "sub-3");
}

#[test]
fn test_pending_partition_is_searched() {
    let mut store: MemoryStore = MemoryStore::default();
    // Flagged while offline: pending but active
    store.pending.push(create_flagged("pending-1", "A 12345", 0));

    let found = check_duplicate(
        &Plate::new("A 12345").unwrap(),
        create_test_now().date(),
        &mut store,
    )
    .unwrap();
    assert_eq!(found.map(|s| s.id), Some(String::from("pending-1")));
}

#[test]
fn test_offline_status_is_ignored() {
    let offline: Submission = create_test_submission(
        "pending-1",
        "A 12345",
        create_test_now(),
        FlagSet::new(),
        Connectivity::Offline,
    );

    assert!(find_active_duplicate(&[offline]).is_none());
}

#[test]
fn test_store_failure_is_reported() {
    let mut store: MemoryStore = MemoryStore {
        fail_reads: true,
        ..MemoryStore::default()
    };

    assert!(
        check_duplicate(
            &Plate::new("A 12345").unwrap(),
            create_test_now().date(),
            &mut store
        )
        .is_err()
    );
}
