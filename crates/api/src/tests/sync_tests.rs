// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use odotrack::{Connectivity, Partition, Submission, SubmissionStore};
use odotrack_domain::{Flag, Plate, SubmissionStatus};
use odotrack_persistence::Persistence;
use std::sync::Arc;

use crate::{ApiError, SkipReason, SyncReport};

use super::helpers::{
    FailingStore, TestContext, create_store_with_pending, create_test_reconciler,
    create_test_request,
};

#[tokio::test]
async fn test_sync_with_empty_queue_reports_nothing_pending() {
    let (_store, reconciler) = create_test_reconciler(Persistence::new_in_memory().unwrap());

    let report: SyncReport = reconciler.reconcile(|| true).await.unwrap();

    assert_eq!(report, SyncReport::skipped(SkipReason::NothingPending));
}

#[tokio::test]
async fn test_sync_while_offline_touches_nothing() {
    let (store, reconciler) = create_test_reconciler(create_store_with_pending(2));

    let report: SyncReport = reconciler.reconcile(|| false).await.unwrap();

    assert_eq!(report, SyncReport::skipped(SkipReason::Offline));
    let pending: Vec<Submission> = store
        .lock()
        .await
        .list_partition(Partition::Pending)
        .unwrap();
    assert_eq!(pending.len(), 2);
}

#[tokio::test]
async fn test_sync_promotes_all_pending_in_order() {
    let (store, reconciler) = create_test_reconciler(create_store_with_pending(3));

    let report: SyncReport = reconciler.reconcile(|| true).await.unwrap();

    assert_eq!(report, SyncReport::synced(3));
    let mut store = store.lock().await;
    assert!(store.list_partition(Partition::Pending).unwrap().is_empty());
    let committed: Vec<Submission> = store.list_partition(Partition::Committed).unwrap();
    let odometers: Vec<u32> = committed.iter().map(|s| s.odometer).collect();
    // Most recent first: the last pending item is promoted last
    assert_eq!(odometers, vec![25520, 25510, 25500]);
    for submission in &committed {
        assert!(submission.id.starts_with("sub-"));
        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.history.len(), 2);
        assert_eq!(submission.history.latest().actor.id, "sync");
        assert_eq!(
            submission.history.created().status,
            SubmissionStatus::Offline
        );
    }
}

#[tokio::test]
async fn test_sync_keeps_flags_of_flagged_pending_items() {
    let mut context: TestContext = TestContext::new();
    context
        .submit(
            create_test_request("A 12345", 26000.0, 0.4),
            Connectivity::Offline,
        )
        .unwrap();
    let (store, reconciler) = create_test_reconciler(context.store);

    reconciler.reconcile(|| true).await.unwrap();

    let committed: Vec<Submission> = store
        .lock()
        .await
        .list_partition(Partition::Committed)
        .unwrap();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].status, SubmissionStatus::Submitted);
    assert!(committed[0].flags.contains(Flag::OdoDeltaHigh));
    assert!(committed[0].flags.contains(Flag::LowOcrConfidence));
}

#[tokio::test]
async fn test_sync_is_idempotent() {
    let (_store, reconciler) = create_test_reconciler(create_store_with_pending(2));

    let first: SyncReport = reconciler.reconcile(|| true).await.unwrap();
    let second: SyncReport = reconciler.reconcile(|| true).await.unwrap();

    assert_eq!(first, SyncReport::synced(2));
    assert_eq!(second, SyncReport::skipped(SkipReason::NothingPending));
}

#[tokio::test]
async fn test_concurrent_sync_runs_once() {
    let (store, reconciler) = create_test_reconciler(create_store_with_pending(2));

    // Hold the store so the first run blocks after claiming the flag
    let guard = store.lock().await;
    let first = tokio::spawn({
        let reconciler = Arc::clone(&reconciler);
        async move { reconciler.reconcile(|| true).await }
    });
    while !reconciler.is_running() {
        tokio::task::yield_now().await;
    }

    let second: SyncReport = reconciler.reconcile(|| true).await.unwrap();
    assert_eq!(second, SyncReport::skipped(SkipReason::InProgress));

    drop(guard);
    let first: SyncReport = first.await.unwrap().unwrap();
    assert_eq!(first, SyncReport::synced(2));
    assert!(!reconciler.is_running());
    assert_eq!(
        store
            .lock()
            .await
            .list_partition(Partition::Committed)
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn test_failed_sync_leaves_queue_untouched() {
    let (store, reconciler) = create_test_reconciler(FailingStore {
        inner: create_store_with_pending(2),
        fail_writes: true,
    });

    let err: ApiError = reconciler.reconcile(|| true).await.unwrap_err();

    assert_eq!(err.code(), "store_failure");
    assert!(!reconciler.is_running());
    {
        let mut store = store.lock().await;
        assert_eq!(store.list_partition(Partition::Pending).unwrap().len(), 2);
        assert!(
            store
                .list_partition(Partition::Committed)
                .unwrap()
                .is_empty()
        );
        store.fail_writes = false;
    }

    let report: SyncReport = reconciler.reconcile(|| true).await.unwrap();
    assert_eq!(report, SyncReport::synced(2));
}

#[tokio::test]
async fn test_promotion_advances_baseline() {
    let mut context: TestContext = TestContext::new();
    context
        .submit(
            create_test_request("A 12345", 25700.0, 0.95),
            Connectivity::Offline,
        )
        .unwrap();

    // The pending reading does not move the baseline
    let online = context
        .submit(
            create_test_request("A 12345", 25600.0, 0.95),
            Connectivity::Online,
        )
        .unwrap();
    assert_eq!(online.submission.last_odometer, 25432);

    let (store, reconciler) = create_test_reconciler(context.store);
    reconciler.reconcile(|| true).await.unwrap();

    let plate: Plate = Plate::new("A 12345").unwrap();
    assert_eq!(
        store
            .lock()
            .await
            .latest_committed_odometer(&plate)
            .unwrap(),
        Some(25700)
    );
}

#[tokio::test]
async fn test_promoted_flagged_reading_leaves_baseline() {
    let mut context: TestContext = TestContext::new();
    context
        .submit(
            create_test_request("A 12345", 95000.0, 0.3),
            Connectivity::Offline,
        )
        .unwrap();
    let (store, reconciler) = create_test_reconciler(context.store);

    reconciler.reconcile(|| true).await.unwrap();

    let plate: Plate = Plate::new("A 12345").unwrap();
    assert_eq!(
        store
            .lock()
            .await
            .latest_committed_odometer(&plate)
            .unwrap(),
        None
    );
}
