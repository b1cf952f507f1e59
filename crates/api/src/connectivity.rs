// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Connectivity signal and automatic sync on reconnect.

use odotrack::{Connectivity, SubmissionStore};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::sync::SyncReconciler;

/// Holds the current online/offline signal and notifies subscribers of
/// changes.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    sender: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    #[must_use]
    pub fn new(online: bool) -> Self {
        let (sender, _) = watch::channel(online);
        Self { sender }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::from_online(self.is_online())
    }

    /// Updates the signal. Returns true if the value changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed: bool = self.sender.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "Connectivity changed");
        }
        changed
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Spawns a task that runs `reconciler` on every offline to online
    /// transition.
    ///
    /// The channel keeps only the latest value, so a quick offline/online
    /// flap can arrive as a single wake-up that reads online. Every wake-up
    /// that reads online therefore reconciles.
    ///
    /// The task ends when the monitor is dropped.
    pub fn spawn_auto_sync<S>(&self, reconciler: Arc<SyncReconciler<S>>) -> JoinHandle<()>
    where
        S: SubmissionStore + Send + 'static,
    {
        let mut receiver: watch::Receiver<bool> = self.subscribe();
        tokio::spawn(async move {
            while receiver.changed().await.is_ok() {
                if !*receiver.borrow_and_update() {
                    continue;
                }
                match reconciler.reconcile(|| *receiver.borrow()).await {
                    Ok(report) => info!(
                        synced = report.synced,
                        skipped = ?report.skipped,
                        "Automatic sync finished"
                    ),
                    Err(e) => error!(error = %e, "Automatic sync failed"),
                }
            }
        })
    }
}
