// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Plate, SubmissionStatus};
use std::collections::HashSet;
use time::Date;

/// Criteria for listing submissions.
///
/// Every criterion is optional; the default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    /// Case-insensitive substring of the plate.
    pub search: Option<String>,
    /// Exact submission date.
    pub date: Option<Date>,
    /// Accepted statuses. An empty set accepts every status.
    pub statuses: HashSet<SubmissionStatus>,
}

impl SubmissionFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    #[must_use]
    pub const fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    /// Returns true if a submission with these attributes passes the filter.
    #[must_use]
    pub fn matches(&self, plate: &Plate, date: Date, status: SubmissionStatus) -> bool {
        let matches_search: bool = self
            .search
            .as_deref()
            .is_none_or(|needle| plate.contains_ignore_case(needle));
        let matches_date: bool = self.date.is_none_or(|d| d == date);
        let matches_status: bool = self.statuses.is_empty() || self.statuses.contains(&status);
        matches_search && matches_date && matches_status
    }
}
