//! Rule engine configuration.
//!
//! The defaults encode the road-authority rules: a rolling two-year demerit
//! window, suspension for drivers under 21 above 6 points and for everyone
//! else at 12 points, no address changes under 18, and 1 to 6 points per
//! offence. Deployments may override any value from a YAML document:
//!
//! ```yaml
//! policy:
//!   full_licence_limit: 12
//!   window_years: 2
//! sinks:
//!   registrations: /var/lib/dlr/persons.txt
//!   demerits: /var/lib/dlr/demerits.txt
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlrConfig {
    /// Thresholds for suspension and update authorization.
    pub policy: PolicyConfig,
    /// Where the file-backed sinks append.
    pub sinks: SinkPaths,
}

impl DlrConfig {
    /// Parse configuration from a YAML string and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: DlrConfig = serde_yaml::from_str(yaml)?;
        config.policy.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}

/// Suspension and update-policy thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Drivers younger than this use `young_driver_limit`.
    pub young_driver_age: i32,
    /// Young drivers are suspended when recent points exceed this.
    pub young_driver_limit: u32,
    /// Other drivers are suspended when recent points reach this.
    pub full_licence_limit: u32,
    /// Length of the trailing demerit window in years.
    pub window_years: u32,
    /// Drivers younger than this may not change address.
    pub min_address_change_age: i32,
    /// Fewest points a single offence may carry.
    pub min_points: u32,
    /// Most points a single offence may carry.
    pub max_points: u32,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            young_driver_age: 21,
            young_driver_limit: 6,
            full_licence_limit: 12,
            window_years: 2,
            min_address_change_age: 18,
            min_points: 1,
            max_points: 6,
        }
    }
}

impl PolicyConfig {
    /// Reject settings the rule engine cannot apply.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_years == 0 {
            return Err(ConfigError::Invalid {
                field: "window_years",
                reason: "demerit window must span at least one year".to_string(),
            });
        }
        if self.min_points == 0 {
            return Err(ConfigError::Invalid {
                field: "min_points",
                reason: "an offence must carry at least one point".to_string(),
            });
        }
        if self.min_points > self.max_points {
            return Err(ConfigError::Invalid {
                field: "max_points",
                reason: format!(
                    "max_points {} is below min_points {}",
                    self.max_points, self.min_points
                ),
            });
        }
        Ok(())
    }

    /// Whether `recent_points` at `age` triggers suspension.
    pub fn suspends(&self, age: i32, recent_points: u32) -> bool {
        if age < self.young_driver_age {
            recent_points > self.young_driver_limit
        } else {
            recent_points >= self.full_licence_limit
        }
    }
}

/// Destinations for the file-backed sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkPaths {
    /// Registration log.
    pub registrations: PathBuf,
    /// Demerit log.
    pub demerits: PathBuf,
}

impl Default for SinkPaths {
    fn default() -> Self {
        Self {
            registrations: PathBuf::from("persons.txt"),
            demerits: PathBuf::from("demerits.txt"),
        }
    }
}
