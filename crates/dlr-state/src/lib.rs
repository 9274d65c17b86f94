//! # dlr-state — Driver Record Entity
//!
//! The stateful half of the licence stack: one driver's record and the
//! rules that govern it.
//!
//! ## Modules
//!
//! - **Record** (`record.rs`): the `DriverRecord` entity. Registration,
//!   demerit addition with suspension, and policy-checked detail updates.
//!
//! - **Demerit** (`demerit.rs`): demerit entries, the rolling-window point
//!   sum, and the one-way `Active → Suspended` licence status.
//!
//! - **Policy** (`policy.rs`): the ordered update-authorization checks.
//!
//! - **Sink** (`sink.rs`): the append-only log capability with file and
//!   in-memory implementations.
//!
//! - **Registry** (`registry.rs`): many records keyed by person ID.
//!
//! ## Design
//!
//! The entity performs no I/O of its own and never reads the system time
//! directly. Sinks and the clock are injected, so the whole rule engine is
//! testable with `MemorySink` and `FixedClock`.

pub mod demerit;
pub mod policy;
pub mod record;
pub mod registry;
pub mod sink;

// ─── Record re-exports ──────────────────────────────────────────────

pub use record::{
    DetailsForm, DriverRecord, OperationStatus, PersonalDetails, RecordError, RecordSnapshot,
};

// ─── Demerit re-exports ─────────────────────────────────────────────

pub use demerit::{recent_points, DemeritEntry, DemeritOutcome, LicenceStatus};

// ─── Policy re-exports ──────────────────────────────────────────────

pub use policy::{authorize_update, ChangeSet, PolicyViolation};

// ─── Sink re-exports ────────────────────────────────────────────────

pub use sink::{AppendSink, FileSink, MemorySink, RecordSinks, SinkError};

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::{RecordRegistry, RegistryError};
