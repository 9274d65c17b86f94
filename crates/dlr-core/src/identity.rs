//! # Identity Newtypes
//!
//! Validated wrappers for the identity fields of a driver record. A
//! [`PersonId`] or [`Address`] can only be obtained through its validating
//! constructor, so code holding one never re-checks the format.
//!
//! The bare predicates [`is_valid_person_id`] and [`is_valid_address`] are
//! exposed for callers that only need a yes/no answer.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of characters in a person identifier.
pub const PERSON_ID_LEN: usize = 10;

/// Minimum count of symbols (non letter, non digit) in the identifier body.
pub const MIN_ID_SYMBOLS: usize = 2;

/// Number of `|`-separated parts in an address.
pub const ADDRESS_PARTS: usize = 5;

/// State every registered address must name.
pub const ADDRESS_STATE: &str = "Victoria";

const ADDRESS_STATE_INDEX: usize = 3;

// ---------------------------------------------------------------------------
// Person identifier
// ---------------------------------------------------------------------------

/// Driver licence person identifier.
///
/// # Validation
///
/// - Exactly 10 characters
/// - Characters 0-1 are digits in `'2'..='9'`
/// - Characters 8-9 are ASCII uppercase letters
/// - At least 2 of characters 2-7 are neither letters nor digits
///
/// Example: `"56s_d%&fAB"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonId(String);

impl PersonId {
    /// Create a person identifier, validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPersonId`] if the string breaks any
    /// of the format rules.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_valid_person_id(&s) {
            return Err(ValidationError::InvalidPersonId(s));
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier begins with an even digit.
    ///
    /// Holders of such identifiers may not change them.
    pub fn starts_with_even_digit(&self) -> bool {
        self.0
            .chars()
            .next()
            .and_then(|c| c.to_digit(10))
            .map_or(false, |d| d % 2 == 0)
    }
}

impl TryFrom<String> for PersonId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a candidate identifier against the licence ID format.
pub fn is_valid_person_id(candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    if chars.len() != PERSON_ID_LEN {
        return false;
    }

    if !chars[..2].iter().all(|c| ('2'..='9').contains(c)) {
        return false;
    }

    if !chars[8..].iter().all(|c| c.is_ascii_uppercase()) {
        return false;
    }

    let symbols = chars[2..8]
        .iter()
        .filter(|c| !is_letter_or_digit(**c))
        .count();
    symbols >= MIN_ID_SYMBOLS
}

/// Whether `c` is a Unicode letter (`L*`) or decimal digit (`Nd`).
///
/// Narrower than `char::is_alphanumeric`, which also admits other numbers
/// such as `½`, `²` and `Ⅻ`.
fn is_letter_or_digit(c: char) -> bool {
    static LETTER_OR_DIGIT: OnceLock<Regex> = OnceLock::new();
    let re = LETTER_OR_DIGIT.get_or_init(|| {
        Regex::new(r"^[\p{L}\p{Nd}]$").expect("letter-or-digit pattern is valid")
    });
    let mut buf = [0u8; 4];
    re.is_match(c.encode_utf8(&mut buf))
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Residential address in `number|street|city|state|country` form.
///
/// The state part must be `Victoria` (any letter case). Trailing empty
/// parts do not count towards the five, so `"1|St|City|Victoria|"` is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create an address, validating its structure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] on a wrong part count or
    /// a state other than Victoria.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_valid_address(&s) {
            return Err(ValidationError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Access the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The state part (always some casing of `Victoria`).
    pub fn state(&self) -> &str {
        address_parts(&self.0)
            .get(ADDRESS_STATE_INDEX)
            .copied()
            .unwrap_or_default()
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a candidate address against the 5-part Victorian format.
pub fn is_valid_address(candidate: &str) -> bool {
    let parts = address_parts(candidate);
    parts.len() == ADDRESS_PARTS && eq_ignore_case(parts[ADDRESS_STATE_INDEX], ADDRESS_STATE)
}

/// Character-wise case-insensitive equality: a pair matches when the
/// characters, their upper-case forms or their lower-case forms agree.
/// Unlike `eq_ignore_ascii_case` this folds non-ASCII letters, so the
/// dotless `ı` matches `i`.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            x == y
                || x.to_uppercase().eq(y.to_uppercase())
                || x.to_lowercase().eq(y.to_lowercase())
        })
}

/// Split on `|`, dropping trailing empty parts.
fn address_parts(s: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = s.split('|').collect();
    while parts.len() > 1 && parts.last().map_or(false, |p| p.is_empty()) {
        parts.pop();
    }
    parts
}
