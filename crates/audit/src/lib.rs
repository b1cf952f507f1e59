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
    clippy::all
)]

use odotrack_domain::SubmissionStatus;
use time::OffsetDateTime;

/// Actor type for drivers.
pub const ACTOR_TYPE_DRIVER: &str = "driver";
/// Actor type for the sync reconciler.
pub const ACTOR_TYPE_SYNC: &str = "sync";
/// Actor type for server-initiated changes.
pub const ACTOR_TYPE_SYSTEM: &str = "system";

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that changes a submission's status:
/// the driver who created it, the sync reconciler, or the server itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "driver", "sync", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates a driver actor.
    #[must_use]
    pub fn driver(id: &str) -> Self {
        Self::new(id.to_string(), String::from(ACTOR_TYPE_DRIVER))
    }

    /// The actor recorded for status changes made by the sync reconciler.
    #[must_use]
    pub fn sync() -> Self {
        Self::new(String::from("sync"), String::from(ACTOR_TYPE_SYNC))
    }

    /// The actor recorded for changes the server makes on its own behalf.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from(ACTOR_TYPE_SYSTEM))
    }
}

/// One immutable entry in a submission's status history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The status the submission entered.
    pub status: SubmissionStatus,
    /// Who caused the change.
    pub actor: Actor,
    /// When the change happened.
    pub at: OffsetDateTime,
}

impl StatusChange {
    /// Creates a new `StatusChange`.
    #[must_use]
    pub const fn new(status: SubmissionStatus, actor: Actor, at: OffsetDateTime) -> Self {
        Self { status, actor, at }
    }
}

/// Append-only status history, most recent entry first.
///
/// A history always holds at least its creation entry. Entries are never
/// modified or removed once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<StatusChange>,
}

impl History {
    /// Starts a history with its creation entry.
    #[must_use]
    pub fn new(created: StatusChange) -> Self {
        Self {
            entries: vec![created],
        }
    }

    /// Rebuilds a history from stored entries, most recent first.
    ///
    /// Returns `None` if `entries` is empty.
    #[must_use]
    pub fn from_entries(entries: Vec<StatusChange>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// Records a new status change as the most recent entry.
    pub fn record(&mut self, change: StatusChange) {
        self.entries.insert(0, change);
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn latest(&self) -> &StatusChange {
        // Never empty: both constructors guarantee one entry
        &self.entries[0]
    }

    /// Returns the creation entry.
    #[must_use]
    pub fn created(&self) -> &StatusChange {
        &self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn entries(&self) -> &[StatusChange] {
        &self.entries
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
