//! # Temporal Types — Calendar Dates and Age
//!
//! Defines [`CalendarDate`], a day-precision date that only parses from the
//! `dd-MM-yyyy` pattern used on licence forms, and the date arithmetic the
//! rule engine needs: age in whole years and the lower bound of the
//! trailing demerit window.
//!
//! ## Parsing
//!
//! The shape is exact: two-digit zero-padded day, two-digit month,
//! four-digit year, `-` separators. `"5-11-2000"` and `"2000-11-15"` are
//! rejected, as are day `00` or `32`+, month `00` or `13`+, and year
//! `0000`. A day from 29 to 31 past the end of its month resolves to the
//! month's last day, so `"31-02-2024"` is 29 February 2024.
//!
//! Because of that resolution the text does not always render back from
//! the date. A `CalendarDate` keeps the text it was parsed from; `Display`
//! and serialization use that text.
//!
//! ## Clock
//!
//! "Today" comes from a [`Clock`]. Production code uses [`SystemClock`]
//! (the local calendar date); tests pin a date with [`FixedClock`].

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The textual date format accepted everywhere in the record engine.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

const DATE_LEN: usize = 10;

/// A calendar date parsed from `dd-MM-yyyy`, with its source text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    date: NaiveDate,
    text: String,
}

impl CalendarDate {
    /// Parse a date in the `dd-MM-yyyy` form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] if the text deviates from the
    /// pattern or a field is out of range.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match parse_form_date(s) {
            Some(date) => Ok(Self {
                date,
                text: s.to_string(),
            }),
            None => Err(ValidationError::InvalidDate(s.to_string())),
        }
    }

    /// Wrap an existing `NaiveDate`, rendering its text as `dd-MM-yyyy`.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            date,
            text: date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Access the resolved `NaiveDate`.
    pub fn as_naive(&self) -> NaiveDate {
        self.date
    }

    /// The text this date was parsed from.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The resolved date rendered as `dd-MM-yyyy`.
    pub fn to_form_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.text
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Whether `candidate` is a valid `dd-MM-yyyy` date.
pub fn is_valid_date(candidate: &str) -> bool {
    parse_form_date(candidate).is_some()
}

fn parse_form_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != DATE_LEN || bytes[2] != b'-' || bytes[5] != b'-' {
        return None;
    }
    let all_digits = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2 && *i != 5)
        .all(|(_, b)| b.is_ascii_digit());
    if !all_digits {
        return None;
    }

    let day: u32 = s[0..2].parse().ok()?;
    let month: u32 = s[3..5].parse().ok()?;
    let year: i32 = s[6..10].parse().ok()?;
    // Year-of-era: there is no year 0000.
    if year == 0 || !(1..=31).contains(&day) {
        return None;
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| last_day_of_month(first))
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first.checked_add_months(Months::new(1))?.pred_opt()
}

// ---------------------------------------------------------------------------
// Date arithmetic
// ---------------------------------------------------------------------------

/// Age in whole years on `today` for someone born on `birth`.
///
/// Compares day-of-year rather than month and day, so across a leap year
/// the result can differ by one from the calendar age around the
/// birthday. That behaviour is relied on by existing records and kept.
pub fn age_on(birth: &CalendarDate, today: NaiveDate) -> i32 {
    let birth = birth.as_naive();
    let years = today.year() - birth.year();
    if today.ordinal() < birth.ordinal() {
        years - 1
    } else {
        years
    }
}

/// The date `years` years before `today`.
///
/// 29 February maps to 28 February when the target year is not a leap
/// year.
pub fn years_before(today: NaiveDate, years: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current calendar date.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Today's date.
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
