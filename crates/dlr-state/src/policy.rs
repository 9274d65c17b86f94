//! # Update Authorization Policy
//!
//! Decides whether a driver may replace their personal details. The checks
//! run in a fixed order and stop at the first failure:
//!
//! 1. A birth-date change must be the only change.
//! 2. Drivers under the minimum age may not change address.
//! 3. Identifiers beginning with an even digit may not change.
//!
//! Format validation of the new values comes after these checks and lives
//! with the record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dlr_core::{PersonId, PolicyConfig};

/// Reasons an update is refused regardless of the new values' format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The birth date changed together with another field.
    #[error("birth date may only be changed on its own")]
    BirthDateChangedWithOtherFields,

    /// An underage driver tried to move address.
    #[error("address change requires age {min_age}, driver is {age}")]
    AddressChangeUnderage {
        /// Driver's current age.
        age: i32,
        /// Minimum age for an address change.
        min_age: i32,
    },

    /// The identifier begins with an even digit and is locked.
    #[error("person ID {person_id} starts with an even digit and cannot be changed")]
    PersonIdLocked {
        /// The locked identifier.
        person_id: String,
    },
}

/// Which fields a proposed update touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Birth date differs.
    pub birth_date: bool,
    /// Identifier differs.
    pub person_id: bool,
    /// First or last name differs.
    pub name: bool,
    /// Address differs.
    pub address: bool,
}

impl ChangeSet {
    /// Whether anything other than the birth date changed.
    pub fn touches_identity(&self) -> bool {
        self.person_id || self.name || self.address
    }

    /// Whether nothing changed at all.
    pub fn is_empty(&self) -> bool {
        !self.birth_date && !self.touches_identity()
    }
}

/// Apply the ordered policy checks.
///
/// `age` is computed from the birth date currently on record, not the
/// proposed one.
pub fn authorize_update(
    changes: &ChangeSet,
    current_id: &PersonId,
    age: i32,
    policy: &PolicyConfig,
) -> Result<(), PolicyViolation> {
    if changes.birth_date && changes.touches_identity() {
        return Err(PolicyViolation::BirthDateChangedWithOtherFields);
    }

    if age < policy.min_address_change_age && changes.address {
        return Err(PolicyViolation::AddressChangeUnderage {
            age,
            min_age: policy.min_address_change_age,
        });
    }

    if current_id.starts_with_even_digit() && changes.person_id {
        return Err(PolicyViolation::PersonIdLocked {
            person_id: current_id.to_string(),
        });
    }

    Ok(())
}
