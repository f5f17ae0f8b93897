//! Runtime configuration for the movement systems.
//!
//! [`Tuning`] gathers the values that shape game feel. Every field has a
//! default, so a JSON file only needs to name the values it overrides. Data
//! files (part catalogues, trap definitions) share [`ConfigError`] for their
//! loaders.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_MAX_BRAKE, DEFAULT_MAX_COLLISION_PASSES, DEFAULT_MAX_COLLISION_TURN,
    DEFAULT_MAX_DISPLACE_ATTEMPTS, DEFAULT_MAX_FLEET_STEPS, DEFAULT_MOMENTUM_TOLERANCE,
    DEFAULT_REVERSE_THRUST_FACTOR, DEFAULT_SKID_CHECK_ONE_IN, DEFAULT_SKID_DRAG_MULTIPLIER,
    DEFAULT_SKID_DRIFT_ONE_IN,
};

/// Failure while loading configuration or data files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The contents were not valid JSON for the expected shape.
    #[error("failed to parse {what}: {source}")]
    Parse {
        /// Description of the document being parsed.
        what: String,
        /// Underlying parser failure.
        source: serde_json::Error,
    },
    /// The document parsed but describes an inconsistent configuration.
    #[error("invalid {what}: {detail}")]
    Invalid {
        /// Description of the document being validated.
        what: String,
        /// What was wrong with it.
        detail: String,
    },
}

impl ConfigError {
    /// Convenience constructor for validation failures.
    pub fn invalid(what: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Invalid {
            what: what.into(),
            detail: detail.into(),
        }
    }
}

/// Parse a JSON document, labelling failures with `what`.
pub(crate) fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, ConfigError> {
    serde_json::from_str(text).map_err(|source| ConfigError::Parse {
        what: what.to_owned(),
        source,
    })
}

/// Read a file into a string, labelling failures with its path.
pub(crate) fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Values that tune vehicle handling without changing its structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Multiplier applied to rolling drag when skidding at a right angle.
    pub skid_drag_multiplier: f64,
    /// Largest heading change a single collision can cause, in degrees.
    pub max_collision_turn_deg: f64,
    /// Odds (one in N) of the uncontrolled skid check firing each tick.
    pub skid_check_one_in: u32,
    /// Odds (one in N) of a skidding vehicle drifting 15° each tick.
    pub skid_drift_one_in: u32,
    /// Permitted disagreement between vehicle and obstacle impulse, in N·s.
    pub momentum_tolerance: f64,
    /// Maximum momentum exchange passes against a single obstacle.
    pub max_collision_passes: u32,
    /// Braking deceleration in vmiph per turn.
    pub max_brake: i32,
    /// Fraction of forward acceleration available when reversing without an
    /// electric motor.
    pub reverse_thrust_factor: f64,
    /// When `false`, steering is mirrored while reversing.
    pub reverse_steering: bool,
    /// Maximum collision rounds during one displacement.
    pub max_displace_attempts: u32,
    /// Maximum vehicle actions the fleet runs in one turn.
    pub max_fleet_steps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            skid_drag_multiplier: DEFAULT_SKID_DRAG_MULTIPLIER,
            max_collision_turn_deg: DEFAULT_MAX_COLLISION_TURN,
            skid_check_one_in: DEFAULT_SKID_CHECK_ONE_IN,
            skid_drift_one_in: DEFAULT_SKID_DRIFT_ONE_IN,
            momentum_tolerance: DEFAULT_MOMENTUM_TOLERANCE,
            max_collision_passes: DEFAULT_MAX_COLLISION_PASSES,
            max_brake: DEFAULT_MAX_BRAKE,
            reverse_thrust_factor: DEFAULT_REVERSE_THRUST_FACTOR,
            reverse_steering: false,
            max_displace_attempts: DEFAULT_MAX_DISPLACE_ATTEMPTS,
            max_fleet_steps: DEFAULT_MAX_FLEET_STEPS,
        }
    }
}

impl Tuning {
    /// Parse tuning values from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] when a value is out of range.
    ///
    /// # Examples
    /// ```
    /// use trundle::config::Tuning;
    /// let tuning = Tuning::from_json_str(r#"{ "reverse_steering": true }"#).unwrap();
    /// assert!(tuning.reverse_steering);
    /// assert_eq!(tuning.max_brake, Tuning::default().max_brake);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let tuning: Self = parse_json(text, "tuning")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning values from a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_file(path.as_ref())?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.skid_drag_multiplier.is_finite() && self.skid_drag_multiplier >= 1.0) {
            return Err(ConfigError::invalid(
                "tuning",
                "skid_drag_multiplier must be at least 1",
            ));
        }
        if !(0.0..=360.0).contains(&self.max_collision_turn_deg) {
            return Err(ConfigError::invalid(
                "tuning",
                "max_collision_turn_deg must lie within 0..=360",
            ));
        }
        if !(self.momentum_tolerance.is_finite() && self.momentum_tolerance > 0.0) {
            return Err(ConfigError::invalid(
                "tuning",
                "momentum_tolerance must be positive",
            ));
        }
        if self.max_collision_passes == 0 || self.max_displace_attempts == 0 {
            return Err(ConfigError::invalid(
                "tuning",
                "collision pass limits must be at least 1",
            ));
        }
        if self.max_brake < 0 {
            return Err(ConfigError::invalid("tuning", "max_brake cannot be negative"));
        }
        if !(0.0..=1.0).contains(&self.reverse_thrust_factor) {
            return Err(ConfigError::invalid(
                "tuning",
                "reverse_thrust_factor must lie within 0..=1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_document_yields_defaults() {
        let tuning = Tuning::from_json_str("{}").unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[rstest]
    #[case::drag(r#"{ "skid_drag_multiplier": 0.5 }"#)]
    #[case::turn(r#"{ "max_collision_turn_deg": 400.0 }"#)]
    #[case::passes(r#"{ "max_collision_passes": 0 }"#)]
    #[case::reverse(r#"{ "reverse_thrust_factor": 1.5 }"#)]
    fn out_of_range_values_are_rejected(#[case] text: &str) {
        assert!(matches!(
            Tuning::from_json_str(text),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        assert!(matches!(
            Tuning::from_json_str(r#"{ "warp_drive": true }"#),
            Err(ConfigError::Parse { .. })
        ));
    }
}
