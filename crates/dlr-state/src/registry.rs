//! # Record Registry
//!
//! A thin keyed store over [`DriverRecord`]s. The registry owns the
//! records, hands every new record the same sinks, clock and policy, and
//! keeps its index in step when an update changes a person ID. All rule
//! evaluation stays in the record.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use dlr_core::{Clock, DlrConfig, PolicyConfig, SystemClock};

use crate::demerit::DemeritOutcome;
use crate::policy::ChangeSet;
use crate::record::{DetailsForm, DriverRecord, RecordError};
use crate::sink::RecordSinks;

/// Errors from registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A record with this person ID already exists.
    #[error("person ID {0} is already registered")]
    Duplicate(String),

    /// No record with this person ID.
    #[error("person ID {0} not found")]
    NotFound(String),

    /// The record refused the operation.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Driver records keyed by person ID.
#[derive(Debug)]
pub struct RecordRegistry {
    records: BTreeMap<String, DriverRecord>,
    sinks: RecordSinks,
    clock: Arc<dyn Clock>,
    policy: PolicyConfig,
}

impl RecordRegistry {
    /// An empty registry with the system clock and default policy.
    pub fn new(sinks: RecordSinks) -> Self {
        Self {
            records: BTreeMap::new(),
            sinks,
            clock: Arc::new(SystemClock),
            policy: PolicyConfig::default(),
        }
    }

    /// An empty registry with file sinks and policy from `config`.
    pub fn from_config(config: &DlrConfig) -> Self {
        Self::new(RecordSinks::from_paths(&config.sinks)).with_policy(config.policy.clone())
    }

    /// Replace the clock handed to new records.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the policy handed to new records.
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Register a new driver.
    ///
    /// Nothing is stored if validation fails. If only the registration log
    /// write fails, the record is kept (its details are already set) and
    /// the sink error is returned.
    pub fn register(&mut self, form: &DetailsForm) -> Result<(), RegistryError> {
        if self.records.contains_key(&form.person_id) {
            warn!(person_id = %form.person_id, "duplicate registration");
            return Err(RegistryError::Duplicate(form.person_id.clone()));
        }

        let mut record = DriverRecord::new(self.sinks.clone())
            .with_clock(Arc::clone(&self.clock))
            .with_policy(self.policy.clone());
        let result = record.register(form);
        if record.is_registered() {
            self.records.insert(form.person_id.clone(), record);
        }
        result.map_err(RegistryError::from)
    }

    /// Add a demerit to a registered driver.
    pub fn add_demerit(
        &mut self,
        person_id: &str,
        date: &str,
        points: i64,
    ) -> Result<DemeritOutcome, RegistryError> {
        let record = self
            .records
            .get_mut(person_id)
            .ok_or_else(|| RegistryError::NotFound(person_id.to_string()))?;
        Ok(record.add_demerit(date, points)?)
    }

    /// Update a driver's details, re-keying the record if its ID changes.
    pub fn update_details(
        &mut self,
        person_id: &str,
        form: &DetailsForm,
    ) -> Result<ChangeSet, RegistryError> {
        if form.person_id != person_id && self.records.contains_key(&form.person_id) {
            warn!(person_id, new_person_id = %form.person_id, "update onto existing person ID");
            return Err(RegistryError::Duplicate(form.person_id.clone()));
        }

        let record = self
            .records
            .get_mut(person_id)
            .ok_or_else(|| RegistryError::NotFound(person_id.to_string()))?;
        let changes = record.update_details(form)?;

        if changes.person_id {
            if let Some(record) = self.records.remove(person_id) {
                self.records.insert(form.person_id.clone(), record);
            }
        }
        Ok(changes)
    }

    /// Look up a record.
    pub fn get(&self, person_id: &str) -> Option<&DriverRecord> {
        self.records.get(person_id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Person IDs of suspended drivers, in key order.
    pub fn suspended(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(_, r)| r.is_suspended())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
