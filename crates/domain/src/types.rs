// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use std::str::FromStr;

/// A vehicle registration plate in canonical form.
///
/// The canonical form is trimmed and uppercased, so two plates compare equal
/// when they differ only by case or surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plate(String);

impl Plate {
    /// Creates a plate from user input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPlate` if the plate is empty after trimming.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let canonical: String = raw.trim().to_uppercase();
        if canonical.is_empty() {
            return Err(DomainError::InvalidPlate(String::from(
                "Plate cannot be empty",
            )));
        }
        Ok(Self(canonical))
    }

    /// Returns the canonical plate string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `needle` occurs anywhere in the plate, ignoring case.
    #[must_use]
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        self.0.contains(&needle.trim().to_uppercase())
    }
}

impl TryFrom<String> for Plate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Plate> for String {
    fn from(plate: Plate) -> Self {
        plate.0
    }
}

impl std::fmt::Display for Plate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fleet vehicle as known to the vehicle registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    /// The canonical plate.
    pub plate: Plate,
    /// The fleet this vehicle belongs to.
    pub fleet: String,
    /// Free-text vehicle type (e.g. "Van").
    pub vehicle_type: String,
    /// The assigned driver's name, if any.
    pub driver: Option<String>,
    /// The last accepted odometer reading.
    pub last_odometer: u32,
}

impl Vehicle {
    /// Creates a new vehicle.
    #[must_use]
    pub const fn new(
        plate: Plate,
        fleet: String,
        vehicle_type: String,
        driver: Option<String>,
        last_odometer: u32,
    ) -> Self {
        Self {
            plate,
            fleet,
            vehicle_type,
            driver,
            last_odometer,
        }
    }

    /// Returns a copy of this vehicle whose baseline accounts for a committed reading.
    ///
    /// The baseline only moves forward: a committed reading lower than the
    /// configured `last_odometer` is ignored.
    #[must_use]
    pub fn with_committed_reading(mut self, committed: Option<u32>) -> Self {
        if let Some(reading) = committed {
            self.last_odometer = self.last_odometer.max(reading);
        }
        self
    }
}

/// An odometer reading produced by OCR, possibly corrected by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrReading {
    /// The attempted odometer value. Not guaranteed to be integral or finite.
    pub value: f64,
    /// OCR confidence in `[0, 1]`.
    pub confidence: f64,
    /// True if the driver changed the OCR output by hand.
    pub edited: bool,
    /// Why the driver changed the OCR output.
    pub edit_reason: Option<String>,
}

impl OcrReading {
    /// Creates an unedited reading.
    #[must_use]
    pub const fn new(value: f64, confidence: f64) -> Self {
        Self {
            value,
            confidence,
            edited: false,
            edit_reason: None,
        }
    }

    /// Creates a reading from driver-entered text.
    ///
    /// The text must be a whole number in decimal digits with an optional
    /// sign. Anything else (`"1e5"`, `"inf"`, `"12.5"`, `"25a00"`) yields a
    /// NaN value, which the validation engine rejects as `invalid_number`.
    /// Integers too large to represent become `f64::MAX` or `f64::MIN` so
    /// they are rejected as `out_of_range`.
    #[must_use]
    pub fn from_text(text: &str, confidence: f64) -> Self {
        let value: f64 = match text.trim().parse::<i32>() {
            Ok(value) => f64::from(value),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => f64::MAX,
                IntErrorKind::NegOverflow => f64::MIN,
                _ => f64::NAN,
            },
        };
        Self::new(value, confidence)
    }

    /// Marks this reading as manually edited.
    #[must_use]
    pub fn with_edit(mut self, reason: Option<String>) -> Self {
        self.edited = true;
        self.edit_reason = reason;
        self
    }

    /// Returns true if the reading was edited without a non-blank reason.
    #[must_use]
    pub fn missing_edit_reason(&self) -> bool {
        self.edited
            && self
                .edit_reason
                .as_deref()
                .is_none_or(|reason| reason.trim().is_empty())
    }

    /// Returns the confidence clamped to `[0, 1]`, with NaN treated as 0.
    #[must_use]
    pub fn normalized_confidence(&self) -> f64 {
        if self.confidence.is_nan() {
            0.0
        } else {
            self.confidence.clamp(0.0, 1.0)
        }
    }

    /// Returns the confidence as a percentage rounded to one decimal place.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        (self.normalized_confidence() * 1000.0).round() / 10.0
    }
}

/// An advisory flag attached to an accepted reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// The distance since the last reading is unusually high.
    OdoDeltaHigh,
    /// OCR was not confident in the reading.
    LowOcrConfidence,
}

impl Flag {
    /// Returns the stable flag code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OdoDeltaHigh => "odo_delta_high",
            Self::LowOcrConfidence => "low_ocr_confidence",
        }
    }
}

impl FromStr for Flag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "odo_delta_high" => Ok(Self::OdoDeltaHigh),
            "low_ocr_confidence" => Ok(Self::LowOcrConfidence),
            _ => Err(DomainError::InvalidFlag {
                flag: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, duplicate-free set of flags.
///
/// Iteration order is insertion order, which is detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(Vec<Flag>);

impl FlagSet {
    /// Creates an empty flag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a flag. Returns false if it was already present.
    pub fn insert(&mut self, flag: Flag) -> bool {
        if self.0.contains(&flag) {
            return false;
        }
        self.0.push(flag);
        true
    }

    #[must_use]
    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }

    /// Returns the flag codes in order.
    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.0.iter().map(Flag::as_str).collect()
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set: Self = Self::new();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Accepted and committed without flags.
    Submitted,
    /// Confirmed by a reviewer.
    Verified,
    /// Accepted with at least one flag.
    Flagged,
    /// Saved while offline, awaiting sync.
    Offline,
}

impl SubmissionStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Verified => "Verified",
            Self::Flagged => "Flagged",
            Self::Offline => "Offline",
        }
    }

    /// Returns true for statuses counted by duplicate detection.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Submitted | Self::Verified | Self::Flagged)
    }

    /// Checks if a change from this status to `target` is permitted.
    ///
    /// Sync moves `Offline` and `Flagged` submissions to `Submitted`;
    /// review moves `Submitted` and `Flagged` submissions to `Verified`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Offline | Self::Flagged, Self::Submitted)
                | (Self::Submitted | Self::Flagged, Self::Verified)
        )
    }

    /// Validates a status change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the change is not permitted.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl FromStr for SubmissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" => Ok(Self::Submitted),
            "verified" => Ok(Self::Verified),
            "flagged" => Ok(Self::Flagged),
            "offline" => Ok(Self::Offline),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
