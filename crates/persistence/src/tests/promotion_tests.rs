// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use crate::tests::{create_test_now, create_test_submission};
use odotrack::{
    Connectivity, Partition, Promotion, SequentialIdGenerator, StoreError, Submission,
    SubmissionStore, plan_promotions, promote_submission,
};
use odotrack_domain::{Plate, SubmissionFilter, SubmissionStatus};
use time::Duration;

fn create_persistence_with_pending(count: usize) -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .append(
            &create_test_submission(
                "sub-0",
                "B 67890",
                25900.0,
                create_test_now() - Duration::days(1),
                Connectivity::Online,
            ),
            Partition::Committed,
        )
        .unwrap();
    for i in 1..=count {
        let minutes: i64 = i64::try_from(i).unwrap();
        persistence
            .append(
                &create_test_submission(
                    &format!("pending-{i}"),
                    "A 12345",
                    25700.0 + 100.0 * f64::from(u32::try_from(i).unwrap()),
                    create_test_now() + Duration::minutes(minutes),
                    Connectivity::Offline,
                ),
                Partition::Pending,
            )
            .unwrap();
    }
    persistence
}

fn snapshot(persistence: &mut Persistence) -> (Vec<Submission>, Vec<Submission>) {
    (
        persistence.list_partition(Partition::Committed).unwrap(),
        persistence.list_partition(Partition::Pending).unwrap(),
    )
}

#[test]
fn test_promote_moves_one_submission() {
    let mut persistence: Persistence = create_persistence_with_pending(2);
    let pending: Submission = persistence.list_partition(Partition::Pending).unwrap()[0].clone();
    let promotion: Promotion =
        promote_submission(pending, String::from("sub-9"), create_test_now()).unwrap();

    let id: String = persistence
        .promote(&promotion.pending_id, &promotion.promoted)
        .unwrap();

    assert_eq!(id, "sub-9");
    let (committed, pending) = snapshot(&mut persistence);
    assert_eq!(committed[0].id, "sub-9");
    assert_eq!(committed[0].status, SubmissionStatus::Submitted);
    assert_eq!(pending.len(), 1);
    assert!(!persistence.contains_id("pending-1").unwrap());
}

#[test]
fn test_promote_unknown_pending_id_fails() {
    let mut persistence: Persistence = create_persistence_with_pending(1);
    let pending: Submission = persistence.list_partition(Partition::Pending).unwrap()[0].clone();
    let promotion: Promotion =
        promote_submission(pending, String::from("sub-9"), create_test_now()).unwrap();

    let result = persistence.promote("pending-404", &promotion.promoted);

    assert_eq!(
        result,
        Err(StoreError::PendingNotFound(String::from("pending-404")))
    );
}

#[test]
fn test_promote_all_commits_in_insertion_order() {
    let mut persistence: Persistence = create_persistence_with_pending(3);
    let ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let plan: Vec<Promotion> =
        plan_promotions(&mut persistence, &ids, create_test_now() + Duration::hours(2)).unwrap();

    let committed_ids: Vec<String> = persistence.promote_all(&plan).unwrap();

    assert_eq!(committed_ids, vec!["sub-1", "sub-2", "sub-3"]);
    let (committed, pending) = snapshot(&mut persistence);
    assert!(pending.is_empty());
    assert_eq!(committed.len(), 4);
    // Promoted rows are prepended; the last promoted is the head of the log
    let head: Vec<&str> = committed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(head, vec!["sub-3", "sub-2", "sub-1", "sub-0"]);
    for submission in &committed[..3] {
        assert_eq!(submission.history.len(), 2);
        assert_eq!(submission.history.latest().actor.id, "sync");
    }
}

#[test]
fn test_promote_all_rolls_back_on_failure() {
    let mut persistence: Persistence = create_persistence_with_pending(3);
    let before = snapshot(&mut persistence);
    let ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let mut plan: Vec<Promotion> =
        plan_promotions(&mut persistence, &ids, create_test_now()).unwrap();
    // The last promotion collides with an existing committed id
    plan[2].promoted.id = String::from("sub-0");

    let result = persistence.promote_all(&plan);

    assert_eq!(result, Err(StoreError::DuplicateId(String::from("sub-0"))));
    assert_eq!(snapshot(&mut persistence), before);
}

#[test]
fn test_promotion_advances_committed_baseline() {
    let mut persistence: Persistence = create_persistence_with_pending(2);
    let plate: Plate = Plate::new("A 12345").unwrap();
    assert_eq!(persistence.latest_committed_odometer(&plate).unwrap(), None);

    let ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let plan: Vec<Promotion> =
        plan_promotions(&mut persistence, &ids, create_test_now()).unwrap();
    persistence.promote_all(&plan).unwrap();

    assert_eq!(
        persistence.latest_committed_odometer(&plate).unwrap(),
        Some(25900)
    );
    assert_eq!(
        persistence
            .list_all(&SubmissionFilter::new().with_search("A 12345"))
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_promoted_flagged_reading_does_not_advance_baseline() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let plate: Plate = Plate::new("A 12345").unwrap();
    let misread: Submission = create_test_submission(
        "pending-1",
        "A 12345",
        95000.0,
        create_test_now(),
        Connectivity::Offline,
    );
    persistence.append(&misread, Partition::Pending).unwrap();

    let ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let plan: Vec<Promotion> =
        plan_promotions(&mut persistence, &ids, create_test_now()).unwrap();
    persistence.promote_all(&plan).unwrap();

    let committed: Vec<Submission> = persistence.list_partition(Partition::Committed).unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].status, SubmissionStatus::Submitted);
    assert!(!committed[0].flags.is_empty());
    assert_eq!(persistence.latest_committed_odometer(&plate).unwrap(), None);
}
