//! # Demerit Ledger
//!
//! Demerit entries, the rolling-window point sum, and the licence status
//! derived from it.
//!
//! ## Window
//!
//! An entry counts towards the recent total when its date is strictly after
//! `today - window_years`. An entry dated exactly `window_years` ago no
//! longer counts; one dated a day later does.
//!
//! ## Status
//!
//! ```text
//! Active ──(recent points cross the age-dependent limit)──▶ Suspended
//! ```
//!
//! There is no way back from `Suspended`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dlr_core::{years_before, CalendarDate, PolicyConfig, ValidationError};

// ─── Entries ─────────────────────────────────────────────────────────

/// One recorded offence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemeritEntry {
    date: CalendarDate,
    points: u32,
}

impl DemeritEntry {
    /// Build an entry, checking the points against the policy range.
    pub fn new(
        date: CalendarDate,
        points: i64,
        policy: &PolicyConfig,
    ) -> Result<Self, ValidationError> {
        let in_range = u32::try_from(points)
            .ok()
            .filter(|p| (policy.min_points..=policy.max_points).contains(p));
        match in_range {
            Some(points) => Ok(Self { date, points }),
            None => Err(ValidationError::PointsOutOfRange {
                points,
                min: policy.min_points,
                max: policy.max_points,
            }),
        }
    }

    /// Offence date.
    pub fn date(&self) -> &CalendarDate {
        &self.date
    }

    /// Points carried by the offence.
    pub fn points(&self) -> u32 {
        self.points
    }
}

/// Sum of points from entries inside the trailing window ending `today`.
pub fn recent_points(entries: &[DemeritEntry], today: NaiveDate, window_years: u32) -> u32 {
    let cutoff = years_before(today, window_years);
    entries
        .iter()
        .filter(|e| e.date.as_naive() > cutoff)
        .map(|e| e.points)
        .sum()
}

// ─── Status ──────────────────────────────────────────────────────────

/// Licence status as written to the demerit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LicenceStatus {
    /// Licence in force.
    #[default]
    Active,
    /// Licence suspended (terminal).
    Suspended,
}

impl LicenceStatus {
    /// Whether the licence is suspended.
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended)
    }
}

impl std::fmt::Display for LicenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Suspended => f.write_str("Suspended"),
        }
    }
}

/// What a successful demerit addition computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemeritOutcome {
    /// Points inside the window, including the new entry.
    pub recent_points: u32,
    /// Age used for the threshold.
    pub age: i32,
    /// Status after evaluation.
    pub status: LicenceStatus,
    /// Whether this addition caused the suspension.
    pub newly_suspended: bool,
}
