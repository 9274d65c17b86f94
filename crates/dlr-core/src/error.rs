//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by the driver licence record crates. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Validation errors carry the rejected raw input so log lines show
//!   exactly what the caller submitted.
//! - Configuration errors name the offending setting.
//! - Nothing in this crate panics on malformed input; every rejection is a
//!   value.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum DlrError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised when a raw field value fails its format rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Person identifier does not match the 10-character licence format.
    #[error("invalid person ID: \"{0}\" (expected 10 chars: 2 digits 2-9, 6 chars with at least 2 symbols, 2 uppercase letters)")]
    InvalidPersonId(String),

    /// Address is not a 5-part pipe-delimited Victorian address.
    #[error("invalid address: \"{0}\" (expected number|street|city|Victoria|country)")]
    InvalidAddress(String),

    /// Date does not parse as `dd-MM-yyyy`.
    #[error("invalid date: \"{0}\" (expected dd-MM-yyyy)")]
    InvalidDate(String),

    /// Demerit points fall outside the permitted range for a single offence.
    #[error("demerit points {points} outside permitted range {min}..={max}")]
    PointsOutOfRange {
        /// The rejected point value.
        points: i64,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },
}

/// Errors while loading or checking configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A setting holds a value the rule engine cannot work with.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Name of the offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
