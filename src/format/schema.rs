//! Format Schema Types
//!
//! A format is a named rule set. Files on disk mirror the TOML layout below;
//! the runtime `Format` keeps the checked `RuleSet` ready for validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or checking a format definition
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to read format file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse format file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Format '{name}' is invalid: {reason}")]
    InvalidRules {
        name: String,
        #[source]
        reason: RuleSetError,
    },
}

/// Largest squad a format may ask for
pub const MAX_SQUAD_SIZE: usize = 100;

/// Why a rule set can never be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    #[error("squad_size must be between 1 and {max}, got {actual}")]
    SquadSize { actual: usize, max: usize },

    #[error("home_country must not be empty")]
    EmptyHomeCountry,

    #[error("{field} ({value}) exceeds squad_size ({squad_size})")]
    LimitAboveSquad {
        field: &'static str,
        value: usize,
        squad_size: usize,
    },
}

/// Root format file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FormatFile {
    pub format: FormatMeta,
    pub rules: RuleSet,
}

/// Format metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FormatMeta {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// Composition limits applied by the validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub squad_size: usize,
    pub home_country: String,
    pub max_overseas: usize,
    pub max_bowlers: usize,
    pub min_wicketkeepers: usize,
}

impl Default for RuleSet {
    /// The T20 franchise rules
    fn default() -> Self {
        Self {
            squad_size: 11,
            home_country: "India".to_string(),
            max_overseas: 4,
            max_bowlers: 5,
            min_wicketkeepers: 1,
        }
    }
}

impl RuleSet {
    /// Reject rule sets no squad could ever satisfy
    pub fn check(&self) -> Result<(), RuleSetError> {
        if !(1..=MAX_SQUAD_SIZE).contains(&self.squad_size) {
            return Err(RuleSetError::SquadSize {
                actual: self.squad_size,
                max: MAX_SQUAD_SIZE,
            });
        }
        if self.home_country.trim().is_empty() {
            return Err(RuleSetError::EmptyHomeCountry);
        }
        for (field, value) in [
            ("max_overseas", self.max_overseas),
            ("max_bowlers", self.max_bowlers),
            ("min_wicketkeepers", self.min_wicketkeepers),
        ] {
            if value > self.squad_size {
                return Err(RuleSetError::LimitAboveSquad {
                    field,
                    value,
                    squad_size: self.squad_size,
                });
            }
        }
        Ok(())
    }
}

/// Runtime format
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    pub name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub rules: RuleSet,
}

impl TryFrom<FormatFile> for Format {
    type Error = FormatError;

    fn try_from(file: FormatFile) -> Result<Self, Self::Error> {
        file.rules
            .check()
            .map_err(|reason| FormatError::InvalidRules {
                name: file.format.name.clone(),
                reason,
            })?;

        Ok(Self {
            name: file.format.name,
            version: file.format.version,
            description: file.format.description,
            rules: file.rules,
        })
    }
}

impl Format {
    /// Parse a format from TOML text; `origin` only labels errors
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, FormatError> {
        let file: FormatFile = toml::from_str(content).map_err(|e| FormatError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Self::try_from(file)
    }
}
