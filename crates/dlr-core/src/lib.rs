//! # dlr-core — Foundational Types for Driver Licence Records
//!
//! Domain primitives shared by the record engine. Every other crate in the
//! workspace depends on `dlr-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for validated fields.** `PersonId`, `Address` and
//!    `CalendarDate` can only be built through validating constructors. The
//!    plain predicates (`is_valid_person_id`, `is_valid_address`,
//!    `is_valid_date`) answer the same question without allocating.
//!
//! 2. **Explicit "today".** Age and window calculations take the current
//!    date as an argument; the `Clock` trait supplies it at the edges.
//!
//! 3. **Configuration as data.** Thresholds live in `PolicyConfig` with
//!    defaults matching the road rules, overridable from YAML.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use config::{DlrConfig, PolicyConfig, SinkPaths};
pub use error::{ConfigError, DlrError, ValidationError};
pub use identity::{is_valid_address, is_valid_person_id, Address, PersonId};
pub use temporal::{age_on, is_valid_date, years_before, CalendarDate, Clock, FixedClock, SystemClock};
