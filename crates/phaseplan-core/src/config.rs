//! Mission planning configuration.
//!
//! Every setting has a default, so an absent or partial configuration file is
//! fine.
//!
//! ```json
//! {
//!   "first_phase_duration_secs": 3599,
//!   "phase_gap_secs": 1,
//!   "phase_offset_secs": 3600,
//!   "auto_create_first_phase": true,
//!   "phase_delete_policy": "retain",
//!   "arrow_symbol_patterns": ["POLA", "PPA"]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MissionError, Result};

/// What happens to entity data tied to a phase when that phase is deleted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhaseDeletePolicy {
    /// Leave per-phase control points and lifetimes untouched; references to
    /// the deleted phase are kept and reported as dangling.
    #[default]
    Retain,
    /// Drop per-phase control points for the deleted phase, remove entities
    /// that only lived in it and clip lifetimes to the remaining phases.
    Purge,
}

/// Tunables for phase creation, deletion and symbol classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MissionConfig {
    /// Length of the first phase, in seconds
    pub first_phase_duration_secs: i64,

    /// Gap between the end of a phase and the start of the next, in seconds
    pub phase_gap_secs: i64,

    /// Offset applied to the previous phase's extent to find the end of a
    /// newly appended phase, in seconds
    pub phase_offset_secs: i64,

    /// Add a first phase automatically when a unit is placed on a mission
    /// without phases
    pub auto_create_first_phase: bool,

    /// Clean-up behaviour on phase deletion
    pub phase_delete_policy: PhaseDeletePolicy,

    /// Symbol code fragments that mark a line symbol as an arrow
    pub arrow_symbol_patterns: Vec<String>,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            first_phase_duration_secs: 3599,
            phase_gap_secs: 1,
            phase_offset_secs: 3600,
            auto_create_first_phase: true,
            phase_delete_policy: PhaseDeletePolicy::Retain,
            arrow_symbol_patterns: vec!["POLA".to_string(), "PPA".to_string()],
        }
    }
}

impl MissionConfig {
    /// Loads a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| MissionError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            MissionError::Configuration {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the user configuration file when one exists, defaults otherwise.
    pub fn load_default() -> Result<Self> {
        match Self::find_default_file() {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Existing `$XDG_CONFIG_HOME/phaseplan/config.json` (or a system config
    /// directory equivalent), if any.
    pub fn find_default_file() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("phaseplan").find_config_file("config.json")
    }

    /// Rejects settings that would produce inverted or empty phases.
    pub fn validate(&self) -> Result<()> {
        if self.first_phase_duration_secs <= 0 {
            return Err(MissionError::invalid_input("first_phase_duration_secs")
                .with_reason("must be positive"));
        }
        if self.phase_gap_secs < 0 {
            return Err(
                MissionError::invalid_input("phase_gap_secs").with_reason("must not be negative")
            );
        }
        if self.phase_offset_secs <= self.phase_gap_secs {
            return Err(MissionError::invalid_input("phase_offset_secs")
                .with_reason("must be greater than phase_gap_secs"));
        }
        Ok(())
    }
}
