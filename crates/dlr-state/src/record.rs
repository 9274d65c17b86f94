//! # Driver Record
//!
//! The driver record entity: identity fields, the demerit ledger and the
//! licence status derived from it.
//!
//! ## Lifecycle
//!
//! ```text
//! Unregistered ──register──▶ Registered ──add_demerit*──▶ … ──update_details*──▶ …
//!                                 │
//!                                 └── status: Active ──▶ Suspended (one-way)
//! ```
//!
//! ## Operations
//!
//! - [`DriverRecord::register`] validates all fields, stores them and logs a
//!   registration line.
//! - [`DriverRecord::add_demerit`] appends an offence, re-evaluates the
//!   rolling-window total against the age-dependent limit and logs a
//!   demerit line with the resulting status.
//! - [`DriverRecord::update_details`] runs the update policy and then
//!   replaces all five fields at once, or none of them.
//!
//! In-memory state is authoritative. Registration and demerit changes are
//! applied before the sink write, so a sink failure is reported to the
//! caller while the change stays in memory.
//!
//! The `add_person`, `add_demerit_points` and `update_personal_details`
//! methods keep the plain pass/fail surface (`bool` and `"Success"` /
//! `"Failed"`) for callers that do not care why an operation failed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use dlr_core::{
    age_on, Address, CalendarDate, Clock, DlrConfig, PersonId, PolicyConfig, SystemClock,
    ValidationError,
};

use crate::demerit::{recent_points, DemeritEntry, DemeritOutcome, LicenceStatus};
use crate::policy::{authorize_update, ChangeSet, PolicyViolation};
use crate::sink::{RecordSinks, SinkError};

// ─── Errors ──────────────────────────────────────────────────────────

/// Why a record operation failed.
#[derive(Error, Debug)]
pub enum RecordError {
    /// A submitted value has the wrong format.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The update policy refused the change.
    #[error("update refused: {0}")]
    Policy(#[from] PolicyViolation),

    /// The change was applied in memory but could not be logged.
    #[error("persistence failed: {0}")]
    Sink(#[from] SinkError),

    /// The operation needs registered details.
    #[error("record has not been registered")]
    NotRegistered,
}

/// Two-valued result used by the pass/fail surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    /// The operation completed.
    Success,
    /// The operation failed for any reason.
    Failed,
}

impl OperationStatus {
    /// `"Success"` or `"Failed"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
        }
    }
}

impl<T, E> From<&Result<T, E>> for OperationStatus {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Success
        } else {
            Self::Failed
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Details ─────────────────────────────────────────────────────────

/// Raw, unvalidated personal details as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsForm {
    /// Person identifier.
    pub person_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// `number|street|city|state|country`.
    pub address: String,
    /// `dd-MM-yyyy`.
    pub birth_date: String,
}

impl DetailsForm {
    /// Collect the five raw values.
    pub fn new(
        person_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            birth_date: birth_date.into(),
        }
    }

    /// Validate the identifier, address and birth date.
    ///
    /// Names are free text and accepted as given.
    pub fn validate(&self) -> Result<PersonalDetails, ValidationError> {
        Ok(PersonalDetails {
            person_id: PersonId::new(self.person_id.as_str())?,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: Address::new(self.address.as_str())?,
            birth_date: CalendarDate::parse(&self.birth_date)?,
        })
    }
}

/// Validated personal details held by a registered record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    /// Person identifier.
    pub person_id: PersonId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Residential address.
    pub address: Address,
    /// Date of birth.
    pub birth_date: CalendarDate,
}

impl PersonalDetails {
    /// Which fields differ from a submitted form.
    pub fn changes_to(&self, form: &DetailsForm) -> ChangeSet {
        ChangeSet {
            birth_date: self.birth_date.as_str() != form.birth_date,
            person_id: self.person_id.as_str() != form.person_id,
            name: self.first_name != form.first_name || self.last_name != form.last_name,
            address: self.address.as_str() != form.address,
        }
    }

    /// The registration log line.
    pub fn log_line(&self) -> String {
        [
            self.person_id.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.address.as_str(),
            self.birth_date.as_str(),
        ]
        .join(",")
    }
}

impl From<&PersonalDetails> for DetailsForm {
    fn from(details: &PersonalDetails) -> Self {
        Self::new(
            details.person_id.as_str(),
            details.first_name.as_str(),
            details.last_name.as_str(),
            details.address.as_str(),
            details.birth_date.as_str(),
        )
    }
}

/// Serializable view of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Registered details, if any.
    pub details: Option<PersonalDetails>,
    /// Current licence status.
    pub status: LicenceStatus,
    /// Points inside the window as of the snapshot.
    pub recent_points: u32,
    /// All entries in the order they were added.
    pub demerits: Vec<DemeritEntry>,
}

// ─── Entity ──────────────────────────────────────────────────────────

/// A single driver's licence record.
#[derive(Debug, Clone)]
pub struct DriverRecord {
    details: Option<PersonalDetails>,
    status: LicenceStatus,
    demerits: Vec<DemeritEntry>,
    policy: PolicyConfig,
    clock: Arc<dyn Clock>,
    sinks: RecordSinks,
}

impl DriverRecord {
    /// An unregistered record using the system clock and default policy.
    pub fn new(sinks: RecordSinks) -> Self {
        Self {
            details: None,
            status: LicenceStatus::Active,
            demerits: Vec::new(),
            policy: PolicyConfig::default(),
            clock: Arc::new(SystemClock),
            sinks,
        }
    }

    /// An unregistered record with file sinks and policy from `config`.
    pub fn from_config(config: &DlrConfig) -> Self {
        Self::new(RecordSinks::from_paths(&config.sinks)).with_policy(config.policy.clone())
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the policy.
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Validate and store personal details, then log the registration.
    ///
    /// Registering an already registered record overwrites its details;
    /// demerits and status are kept.
    pub fn register(&mut self, form: &DetailsForm) -> Result<(), RecordError> {
        let details = form.validate().map_err(|e| {
            warn!(person_id = %form.person_id, error = %e, "registration rejected");
            e
        })?;

        let line = details.log_line();
        let person_id = details.person_id.clone();
        self.details = Some(details);

        self.sinks.registrations.append(&line).map_err(|e| {
            error!(
                person_id = %person_id,
                sink = %self.sinks.registrations.name(),
                error = %e,
                "registration not persisted"
            );
            e
        })?;

        info!(person_id = %person_id, "driver registered");
        Ok(())
    }

    /// Record an offence and re-evaluate the licence status.
    pub fn add_demerit(&mut self, date: &str, points: i64) -> Result<DemeritOutcome, RecordError> {
        let entry = CalendarDate::parse(date)
            .and_then(|d| DemeritEntry::new(d, points, &self.policy))
            .map_err(|e| {
                warn!(date, points, error = %e, "demerit rejected");
                e
            })?;
        let (person_id, birth_date) = match &self.details {
            Some(d) => (d.person_id.clone(), d.birth_date.clone()),
            None => return Err(RecordError::NotRegistered),
        };

        let entry_date = entry.date().to_string();
        let entry_points = entry.points();
        self.demerits.push(entry);

        let today = self.clock.today();
        let recent = recent_points(&self.demerits, today, self.policy.window_years);
        let age = age_on(&birth_date, today);
        let was_suspended = self.status.is_suspended();
        if self.policy.suspends(age, recent) {
            self.status = LicenceStatus::Suspended;
        }
        let newly_suspended = !was_suspended && self.status.is_suspended();

        debug!(
            person_id = %person_id,
            recent_points = recent,
            age,
            status = %self.status,
            "demerit evaluated"
        );
        if newly_suspended {
            info!(person_id = %person_id, recent_points = recent, age, "licence suspended");
        }

        let line = format!(
            "{},{},{},{}",
            person_id,
            entry_date,
            entry_points,
            self.status
        );
        self.sinks.demerits.append(&line).map_err(|e| {
            error!(
                person_id = %person_id,
                sink = %self.sinks.demerits.name(),
                error = %e,
                "demerit not persisted"
            );
            e
        })?;

        Ok(DemeritOutcome {
            recent_points: recent,
            age,
            status: self.status,
            newly_suspended,
        })
    }

    /// Replace all personal details if the update policy allows it.
    ///
    /// Returns the set of fields that changed. On any failure no field is
    /// modified. Demerits and status are never touched.
    pub fn update_details(&mut self, form: &DetailsForm) -> Result<ChangeSet, RecordError> {
        let current = self.details.as_ref().ok_or(RecordError::NotRegistered)?;
        let changes = current.changes_to(form);
        let age = age_on(&current.birth_date, self.clock.today());

        authorize_update(&changes, &current.person_id, age, &self.policy).map_err(|v| {
            warn!(person_id = %current.person_id, violation = %v, "update refused");
            v
        })?;

        let updated = form.validate().map_err(|e| {
            warn!(person_id = %current.person_id, error = %e, "update rejected");
            e
        })?;

        info!(
            person_id = %current.person_id,
            new_person_id = %updated.person_id,
            ?changes,
            "details updated"
        );
        self.details = Some(updated);
        Ok(changes)
    }

    // ── Pass/fail surface ────────────────────────────────────────────

    /// [`register`](Self::register) reporting only success.
    pub fn add_person(
        &mut self,
        person_id: &str,
        first_name: &str,
        last_name: &str,
        address: &str,
        birth_date: &str,
    ) -> bool {
        let form = DetailsForm::new(person_id, first_name, last_name, address, birth_date);
        self.register(&form).is_ok()
    }

    /// [`add_demerit`](Self::add_demerit) reporting `Success` or `Failed`.
    pub fn add_demerit_points(&mut self, date: &str, points: i64) -> OperationStatus {
        OperationStatus::from(&self.add_demerit(date, points))
    }

    /// [`update_details`](Self::update_details) reporting only success.
    pub fn update_personal_details(
        &mut self,
        person_id: &str,
        first_name: &str,
        last_name: &str,
        address: &str,
        birth_date: &str,
    ) -> bool {
        let form = DetailsForm::new(person_id, first_name, last_name, address, birth_date);
        self.update_details(&form).is_ok()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Registered details, if any.
    pub fn details(&self) -> Option<&PersonalDetails> {
        self.details.as_ref()
    }

    /// Registered identifier, if any.
    pub fn person_id(&self) -> Option<&PersonId> {
        self.details.as_ref().map(|d| &d.person_id)
    }

    /// Whether details have been registered.
    pub fn is_registered(&self) -> bool {
        self.details.is_some()
    }

    /// Current licence status.
    pub fn status(&self) -> LicenceStatus {
        self.status
    }

    /// Whether the licence is suspended.
    pub fn is_suspended(&self) -> bool {
        self.status.is_suspended()
    }

    /// All demerit entries in insertion order.
    pub fn demerits(&self) -> &[DemeritEntry] {
        &self.demerits
    }

    /// Number of demerit entries.
    pub fn demerit_record_count(&self) -> usize {
        self.demerits.len()
    }

    /// Points inside the window ending today.
    pub fn recent_points(&self) -> u32 {
        recent_points(&self.demerits, self.clock.today(), self.policy.window_years)
    }

    /// Current age, if registered.
    pub fn age(&self) -> Option<i32> {
        self.details
            .as_ref()
            .map(|d| age_on(&d.birth_date, self.clock.today()))
    }

    /// Active policy.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Serializable view of the record as of today.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            details: self.details.clone(),
            status: self.status,
            recent_points: self.recent_points(),
            demerits: self.demerits.clone(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use chrono::NaiveDate;
    use dlr_core::FixedClock;

    const ID: &str = "56s_d%&fAB";
    const EVEN_ID: &str = "26s_&*fABZ";
    const ADDRESS: &str = "10|Test St|Melbourne|Victoria|Australia";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    struct Harness {
        record: DriverRecord,
        registrations: MemorySink,
        demerits: MemorySink,
    }

    fn harness() -> Harness {
        let (sinks, registrations, demerits) = RecordSinks::in_memory();
        let record = DriverRecord::new(sinks).with_clock(Arc::new(FixedClock(today())));
        Harness {
            record,
            registrations,
            demerits,
        }
    }

    fn registered(birth_date: &str) -> Harness {
        let mut h = harness();
        assert!(h.record.add_person(ID, "John", "Doe", ADDRESS, birth_date));
        h
    }

    // ── Registration ─────────────────────────────────────────────────

    #[test]
    fn test_register_valid() {
        let mut h = harness();
        assert!(h.record.add_person(ID, "Alex", "Doe", ADDRESS, "15-11-2000"));
        assert!(h.record.is_registered());
        assert_eq!(
            h.registrations.lines(),
            vec![format!("{ID},Alex,Doe,{ADDRESS},15-11-2000")]
        );
    }

    #[test]
    fn test_register_invalid_id() {
        let mut h = harness();
        let err = h
            .record
            .register(&DetailsForm::new("12345678AB", "John", "Doe", ADDRESS, "15-11-1990"))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Validation(ValidationError::InvalidPersonId(_))
        ));
        assert!(!h.record.is_registered());
        assert!(h.registrations.is_empty());
    }

    #[test]
    fn test_register_invalid_address() {
        let mut h = harness();
        assert!(!h.record.add_person(
            ID,
            "John",
            "Doe",
            "12|King Street|Sydney|NSW|Australia",
            "15-11-1990"
        ));
        assert!(h.registrations.is_empty());
    }

    #[test]
    fn test_register_invalid_date() {
        let mut h = harness();
        assert!(!h.record.add_person(ID, "John", "Doe", ADDRESS, "1990-11-15"));
        assert!(!h.record.is_registered());
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut h = registered("15-11-2000");
        assert!(h.record.add_person("99x_@!Z9XY", "Jane", "Roe", ADDRESS, "01-01-1990"));
        let details = h.record.details().unwrap();
        assert_eq!(details.person_id.as_str(), "99x_@!Z9XY");
        assert_eq!(details.first_name, "Jane");
        assert_eq!(h.registrations.len(), 2);
    }

    #[test]
    fn test_register_sink_failure_keeps_memory_state() {
        let demerits = MemorySink::new("demerits");
        let sinks = RecordSinks::new(
            Arc::new(MemorySink::rejecting("registrations")),
            Arc::new(demerits),
        );
        let mut record = DriverRecord::new(sinks).with_clock(Arc::new(FixedClock(today())));
        let err = record
            .register(&DetailsForm::new(ID, "John", "Doe", ADDRESS, "15-11-2000"))
            .unwrap_err();
        assert!(matches!(err, RecordError::Sink(_)));
        assert!(record.is_registered());
    }

    // ── Demerits ─────────────────────────────────────────────────────

    #[test]
    fn test_demerit_valid_not_suspended() {
        let mut h = registered("15-11-2000");
        assert_eq!(h.record.add_demerit_points("01-01-2024", 3), OperationStatus::Success);
        assert!(!h.record.is_suspended());
        assert_eq!(h.demerits.lines(), vec![format!("{ID},01-01-2024,3,Active")]);
    }

    #[test]
    fn test_demerit_suspension_under_21() {
        let mut h = registered("15-11-2007");
        let first = h.record.add_demerit("01-01-2024", 4).unwrap();
        assert_eq!(first.status, LicenceStatus::Active);
        let second = h.record.add_demerit("01-06-2024", 3).unwrap();
        assert_eq!(second.recent_points, 7);
        assert_eq!(second.age, 17);
        assert!(second.newly_suspended);
        assert!(h.record.is_suspended());
        assert_eq!(h.record.demerit_record_count(), 2);
        assert_eq!(
            h.demerits.lines().last().unwrap(),
            &format!("{ID},01-06-2024,3,Suspended")
        );
    }

    #[test]
    fn test_under_21_at_limit_stays_active() {
        let mut h = registered("15-11-2007");
        h.record.add_demerit("01-01-2024", 4).unwrap();
        h.record.add_demerit("01-02-2024", 2).unwrap();
        assert!(!h.record.is_suspended());
        assert_eq!(h.record.recent_points(), 6);
    }

    #[test]
    fn test_demerit_suspension_over_21() {
        let mut h = registered("15-11-1990");
        h.record.add_demerit("01-12-2024", 6).unwrap();
        assert!(!h.record.is_suspended());
        let outcome = h.record.add_demerit("01-05-2025", 6).unwrap();
        assert_eq!(outcome.recent_points, 12);
        assert!(h.record.is_suspended());
        assert_eq!(h.record.demerit_record_count(), 2);
    }

    #[test]
    fn test_old_demerits_do_not_suspend() {
        let mut h = registered("15-11-1990");
        h.record.add_demerit("01-01-2020", 6).unwrap();
        // Exactly two years before today: outside the window.
        h.record.add_demerit("01-06-2023", 6).unwrap();
        let outcome = h.record.add_demerit("02-06-2023", 1).unwrap();
        assert_eq!(outcome.recent_points, 1);
        assert!(!h.record.is_suspended());
        assert_eq!(h.record.demerit_record_count(), 3);
    }

    #[test]
    fn test_suspension_is_monotonic() {
        let mut h = registered("15-11-2007");
        h.record.add_demerit("01-01-2024", 6).unwrap();
        h.record.add_demerit("01-02-2024", 6).unwrap();
        assert!(h.record.is_suspended());

        // An old entry keeps the recent total unchanged; status stays put.
        let outcome = h.record.add_demerit("01-01-2010", 1).unwrap();
        assert_eq!(outcome.status, LicenceStatus::Suspended);
        assert!(!outcome.newly_suspended);
        assert!(h.demerits.lines().last().unwrap().ends_with(",Suspended"));
    }

    #[test]
    fn test_demerit_invalid_date_format() {
        let mut h = registered("15-11-2000");
        assert_eq!(h.record.add_demerit_points("2024-01-01", 5), OperationStatus::Failed);
        assert_eq!(h.record.demerit_record_count(), 0);
        assert!(h.demerits.is_empty());
    }

    #[test]
    fn test_demerit_points_out_of_range() {
        let mut h = registered("15-11-2000");
        assert_eq!(h.record.add_demerit_points("01-01-2024", 0).as_str(), "Failed");
        assert_eq!(h.record.add_demerit_points("01-01-2024", 10).as_str(), "Failed");
        assert_eq!(h.record.demerit_record_count(), 0);
    }

    #[test]
    fn test_demerit_requires_registration() {
        let mut h = harness();
        let err = h.record.add_demerit("01-01-2024", 3).unwrap_err();
        assert!(matches!(err, RecordError::NotRegistered));
        assert_eq!(h.record.demerit_record_count(), 0);
    }

    #[test]
    fn test_demerit_sink_failure_keeps_entry() {
        let sinks = RecordSinks::new(
            Arc::new(MemorySink::new("registrations")),
            Arc::new(MemorySink::rejecting("demerits")),
        );
        let mut record = DriverRecord::new(sinks).with_clock(Arc::new(FixedClock(today())));
        assert!(record.add_person(ID, "John", "Doe", ADDRESS, "15-11-2007"));
        assert_eq!(record.add_demerit_points("01-01-2025", 4), OperationStatus::Failed);
        assert_eq!(record.add_demerit_points("01-02-2025", 4), OperationStatus::Failed);
        assert_eq!(record.demerit_record_count(), 2);
        assert!(record.is_suspended());
    }

    #[test]
    fn test_custom_policy_limits() {
        let policy = PolicyConfig {
            full_licence_limit: 5,
            ..PolicyConfig::default()
        };
        let mut h = registered("15-11-1990");
        h.record = h.record.clone().with_policy(policy);
        h.record.add_demerit("01-01-2025", 5).unwrap();
        assert!(h.record.is_suspended());
    }

    // ── Updates ──────────────────────────────────────────────────────

    #[test]
    fn test_update_name() {
        let mut h = registered("15-11-2000");
        let changes = h
            .record
            .update_details(&DetailsForm::new(ID, "Johnny", "Doe", ADDRESS, "15-11-2000"))
            .unwrap();
        assert!(changes.name);
        assert!(!changes.birth_date && !changes.address && !changes.person_id);
        assert_eq!(h.record.details().unwrap().first_name, "Johnny");
    }

    #[test]
    fn test_update_birthday_only() {
        let mut h = registered("15-11-2000");
        assert!(h.record.update_personal_details(ID, "John", "Doe", ADDRESS, "01-01-2001"));
        assert_eq!(h.record.details().unwrap().birth_date.to_string(), "01-01-2001");
    }

    #[test]
    fn test_day_past_month_end_logged_as_submitted() {
        let mut h = harness();
        assert!(h.record.add_person(ID, "John", "Doe", ADDRESS, "31-02-2000"));
        assert_eq!(
            h.record.details().unwrap().birth_date.as_naive(),
            NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()
        );
        assert_eq!(
            h.registrations.lines(),
            vec![format!("{ID},John,Doe,{ADDRESS},31-02-2000")]
        );

        assert_eq!(h.record.add_demerit_points("31-04-2025", 2), OperationStatus::Success);
        assert_eq!(h.demerits.lines(), vec![format!("{ID},31-04-2025,2,Active")]);
    }

    #[test]
    fn test_birth_date_compared_as_submitted() {
        let mut h = registered("31-02-2000");
        // Same text: only the name changes, so this is not a birth-date change.
        let changes = h
            .record
            .update_details(&DetailsForm::new(ID, "Jon", "Doe", ADDRESS, "31-02-2000"))
            .unwrap();
        assert!(!changes.birth_date);

        // Different text for the same resolved day still counts as a change.
        let err = h
            .record
            .update_details(&DetailsForm::new(ID, "Johnny", "Doe", ADDRESS, "29-02-2000"))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Policy(PolicyViolation::BirthDateChangedWithOtherFields)
        ));
    }

    #[test]
    fn test_update_birthday_with_others_refused() {
        let mut h = registered("15-11-2000");
        let before = h.record.details().cloned();
        let err = h
            .record
            .update_details(&DetailsForm::new(
                "99x_@!Z9XY",
                "Johnny",
                "Doe",
                "15|Queen Street|Melbourne|Victoria|Australia",
                "01-01-1999",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Policy(PolicyViolation::BirthDateChangedWithOtherFields)
        ));
        assert_eq!(h.record.details().cloned(), before);
    }

    #[test]
    fn test_update_address_under_18_refused() {
        let mut h = registered("15-11-2007");
        let err = h
            .record
            .update_details(&DetailsForm::new(
                ID,
                "John",
                "Doe",
                "55|New Road|Melbourne|Victoria|Australia",
                "15-11-2007",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Policy(PolicyViolation::AddressChangeUnderage { age: 17, .. })
        ));
        assert_eq!(h.record.details().unwrap().address.as_str(), ADDRESS);
    }

    #[test]
    fn test_update_address_adult() {
        let mut h = registered("15-11-2000");
        let new_address = "55|New Road|Geelong|Victoria|Australia";
        assert!(h.record.update_personal_details(ID, "John", "Doe", new_address, "15-11-2000"));
        assert_eq!(h.record.details().unwrap().address.as_str(), new_address);
    }

    #[test]
    fn test_update_even_id_locked() {
        let mut h = harness();
        assert!(h.record.add_person(EVEN_ID, "Eve", "Doe", ADDRESS, "15-11-1995"));
        let err = h
            .record
            .update_details(&DetailsForm::new("88x_!@tRPZ", "Eve", "Doe", ADDRESS, "15-11-1995"))
            .unwrap_err();
        assert!(matches!(err, RecordError::Policy(PolicyViolation::PersonIdLocked { .. })));
        assert_eq!(h.record.person_id().unwrap().as_str(), EVEN_ID);
    }

    #[test]
    fn test_update_odd_id_allowed() {
        let mut h = registered("15-11-2000");
        assert!(h.record.update_personal_details("99x_@!Z9XY", "John", "Doe", ADDRESS, "15-11-2000"));
        assert_eq!(h.record.person_id().unwrap().as_str(), "99x_@!Z9XY");
    }

    #[test]
    fn test_update_invalid_values_refused() {
        let mut h = registered("15-11-2000");
        let before = h.record.details().cloned();
        let bad = [
            DetailsForm::new("1234567890", "John", "Doe", ADDRESS, "15-11-2000"),
            DetailsForm::new("56s_d%", "John", "Doe", ADDRESS, "15-11-2000"),
            DetailsForm::new(ID, "John", "Doe", "12|King Street|Sydney|NSW|Australia", "15-11-2000"),
            DetailsForm::new(ID, "John", "Doe", "Melbourne|Victoria|Australia", "15-11-2000"),
            DetailsForm::new(ID, "John", "Doe", ADDRESS, "2000/11/15"),
            DetailsForm::default(),
        ];
        for form in &bad {
            assert!(h.record.update_details(form).is_err(), "accepted {form:?}");
            assert_eq!(h.record.details().cloned(), before);
        }
    }

    #[test]
    fn test_update_requires_registration() {
        let mut h = harness();
        let err = h
            .record
            .update_details(&DetailsForm::new(ID, "John", "Doe", ADDRESS, "15-11-2000"))
            .unwrap_err();
        assert!(matches!(err, RecordError::NotRegistered));
    }

    #[test]
    fn test_update_keeps_demerits_and_status() {
        let mut h = registered("15-11-2000");
        h.record.add_demerit("01-01-2025", 6).unwrap();
        h.record.add_demerit("01-02-2025", 6).unwrap();
        assert!(h.record.is_suspended());
        assert!(h.record.update_personal_details(ID, "Jon", "Doe", ADDRESS, "15-11-2000"));
        assert!(h.record.is_suspended());
        assert_eq!(h.record.demerit_record_count(), 2);
        // Updates are not logged.
        assert_eq!(h.registrations.len(), 1);
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn test_age_query() {
        let h = registered("15-11-2000");
        assert_eq!(h.record.age(), Some(24));
        assert_eq!(harness().record.age(), None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut h = registered("15-11-2000");
        h.record.add_demerit("01-01-2025", 3).unwrap();
        let snapshot = h.record.snapshot();
        assert_eq!(snapshot.recent_points, 3);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["details"]["person_id"], ID);
        assert_eq!(json["details"]["birth_date"], "15-11-2000");
        assert_eq!(json["status"], "Active");
        assert_eq!(json["demerits"][0]["date"], "01-01-2025");
        assert_eq!(json["demerits"][0]["points"], 3);
    }

    #[test]
    fn test_details_form_roundtrip() {
        let h = registered("15-11-2000");
        let form = DetailsForm::from(h.record.details().unwrap());
        assert_eq!(form, DetailsForm::new(ID, "John", "Doe", ADDRESS, "15-11-2000"));
        assert!(h.record.details().unwrap().changes_to(&form).is_empty());
    }
}
