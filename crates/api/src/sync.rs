// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Promotion of pending submissions into the committed log.

use odotrack::{Clock, IdGenerator, Promotion, SubmissionStore, plan_promotions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::{ApiError, translate_core_error};

/// Why a sync run did no work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Another run was already in progress.
    InProgress,
    /// Connectivity was offline.
    Offline,
    /// The pending queue was empty.
    NothingPending,
}

/// The outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// How many pending submissions were promoted.
    pub synced: usize,
    /// Set when the run did nothing.
    pub skipped: Option<SkipReason>,
}

impl SyncReport {
    #[must_use]
    pub const fn skipped(reason: SkipReason) -> Self {
        Self {
            synced: 0,
            skipped: Some(reason),
        }
    }

    #[must_use]
    pub const fn synced(count: usize) -> Self {
        Self {
            synced: count,
            skipped: None,
        }
    }
}

/// Clears the in-progress flag when a run ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Moves pending submissions to the committed partition.
///
/// At most one run is active at a time. A call made while another run is
/// active returns immediately with [`SkipReason::InProgress`].
pub struct SyncReconciler<S> {
    store: Arc<Mutex<S>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    running: AtomicBool,
}

impl<S> SyncReconciler<S>
where
    S: SubmissionStore + Send,
{
    #[must_use]
    pub fn new(store: Arc<Mutex<S>>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            clock,
            ids,
            running: AtomicBool::new(false),
        }
    }

    /// Returns true while a run is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Promotes every pending submission, in insertion order.
    ///
    /// `is_online` is checked once, after the run has claimed the
    /// in-progress flag. The store lock is held for the whole promotion and
    /// all promotions commit in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or no committed id can be
    /// allocated. The pending queue is unchanged in that case.
    pub async fn reconcile<F>(&self, is_online: F) -> Result<SyncReport, ApiError>
    where
        F: Fn() -> bool + Send,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync already in progress");
            return Ok(SyncReport::skipped(SkipReason::InProgress));
        }
        let _guard: RunGuard<'_> = RunGuard(&self.running);

        if !is_online() {
            debug!("Sync skipped while offline");
            return Ok(SyncReport::skipped(SkipReason::Offline));
        }

        let mut store = self.store.lock().await;
        let plan: Vec<Promotion> = plan_promotions(&mut *store, self.ids.as_ref(), self.clock.now())
            .map_err(translate_core_error)?;
        if plan.is_empty() {
            return Ok(SyncReport::skipped(SkipReason::NothingPending));
        }

        let committed: Vec<String> = store
            .promote_all(&plan)
            .inspect_err(|e| error!(error = %e, pending = plan.len(), "Sync failed"))?;
        drop(store);

        info!(synced = committed.len(), "Promoted pending submissions");
        Ok(SyncReport::synced(committed.len()))
    }
}
