// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use odotrack_audit::{Actor, History, StatusChange};
use odotrack_domain::{DomainError, FlagSet, Plate, SubmissionStatus};
use time::{Date, OffsetDateTime};

/// Location recorded when the caller supplies none.
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

/// The two disjoint logs a submission can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// The canonical, synced log.
    Committed,
    /// Created while offline and awaiting sync.
    Pending,
}

impl Partition {
    /// Returns the stored partition name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Pending => "pending",
        }
    }

    /// Returns the id prefix for submissions created in this partition.
    #[must_use]
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Self::Committed => "sub",
            Self::Pending => "pending",
        }
    }

    /// Returns the partition new submissions go to under `connectivity`.
    #[must_use]
    pub const fn for_connectivity(connectivity: Connectivity) -> Self {
        match connectivity {
            Connectivity::Online => Self::Committed,
            Connectivity::Offline => Self::Pending,
        }
    }
}

impl std::str::FromStr for Partition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "committed" => Ok(Self::Committed),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown partition '{other}'")),
        }
    }
}

/// The connectivity signal as seen at a single point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    #[must_use]
    pub const fn from_online(online: bool) -> Self {
        if online { Self::Online } else { Self::Offline }
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

/// A stored odometer submission.
///
/// `status` always equals the status of the most recent history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: String,
    /// The driver's local calendar day.
    pub date: Date,
    pub date_time: OffsetDateTime,
    pub vehicle_plate: Plate,
    pub odometer: u32,
    /// The vehicle's baseline when the reading was taken.
    pub last_odometer: u32,
    pub ocr_confidence_percent: f64,
    pub flags: FlagSet,
    pub notes: Option<String>,
    pub location: String,
    pub status: SubmissionStatus,
    pub history: History,
    pub edited: bool,
    pub edit_reason: Option<String>,
    /// The driver who created the submission.
    pub driver_id: String,
}

impl Submission {
    /// Distance travelled since the baseline. Never stored.
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.odometer) - i64::from(self.last_odometer)
    }

    /// Returns true if this submission counts for duplicate detection.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if this reading may advance the vehicle's odometer
    /// baseline once committed.
    ///
    /// Only clean accepted readings count. A reading that was flagged keeps
    /// its flags after sync and stays out of the baseline until reviewed.
    #[must_use]
    pub fn counts_toward_baseline(&self) -> bool {
        matches!(
            self.status,
            SubmissionStatus::Submitted | SubmissionStatus::Verified
        ) && self.flags.is_empty()
    }

    /// Moves the submission to `status`, recording who did it and when.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the change is not
    /// permitted; the submission is left unchanged.
    pub fn record_status(
        &mut self,
        status: SubmissionStatus,
        actor: Actor,
        at: OffsetDateTime,
    ) -> Result<(), DomainError> {
        self.status.validate_transition(status)?;
        self.history.record(StatusChange::new(status, actor, at));
        self.status = status;
        Ok(())
    }
}

/// Computes the initial status of a new submission.
///
/// Flags take priority over connectivity.
#[must_use]
pub fn initial_status(flags: &FlagSet, connectivity: Connectivity) -> SubmissionStatus {
    if !flags.is_empty() {
        SubmissionStatus::Flagged
    } else if connectivity.is_online() {
        SubmissionStatus::Submitted
    } else {
        SubmissionStatus::Offline
    }
}
