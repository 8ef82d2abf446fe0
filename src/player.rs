//! Player Model
//!
//! Player records as supplied by the catalog. Records are immutable once
//! loaded; role text is parsed strictly so the validator never has to guess.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::validation::PreconditionError;

/// Unique player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PlayerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Playing role of a cricketer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Batter,
    Bowler,
    AllRounder,
    Wicketkeeper,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Batter,
        Role::Bowler,
        Role::AllRounder,
        Role::Wicketkeeper,
    ];

    /// Display label, also the canonical serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batter => "Batter",
            Role::Bowler => "Bowler",
            Role::AllRounder => "All-rounder",
            Role::Wicketkeeper => "Wicketkeeper",
        }
    }

    /// Bowlers and all-rounders both count against the bowling cap
    pub fn is_bowling_capable(&self) -> bool {
        matches!(self, Role::Bowler | Role::AllRounder)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PreconditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let role = match trimmed.to_ascii_lowercase().as_str() {
            "batter" | "batsman" => Role::Batter,
            "bowler" => Role::Bowler,
            "all-rounder" | "allrounder" | "all rounder" => Role::AllRounder,
            "wicketkeeper" | "wicket-keeper" => Role::Wicketkeeper,
            _ => return Err(PreconditionError::UnknownRole(trimmed.to_string())),
        };
        Ok(role)
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A player record carrying a statistic no real player could have
#[derive(Debug, Clone, PartialEq, Error)]
#[error("player {id} has invalid {field}: {value}")]
pub struct RecordError {
    pub id: PlayerId,
    pub field: &'static str,
    pub value: f64,
}

/// A player record from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub country: String,
    pub role: Role,
    #[serde(default)]
    pub batting_avg: Option<f64>,
    #[serde(default)]
    pub bowling_avg: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Player {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        country: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            country: country.into(),
            role,
            batting_avg: None,
            bowling_avg: None,
            image_url: None,
        }
    }

    pub fn with_batting_avg(mut self, avg: f64) -> Self {
        self.batting_avg = Some(avg);
        self
    }

    pub fn with_bowling_avg(mut self, avg: f64) -> Self {
        self.bowling_avg = Some(avg);
        self
    }

    /// Whether this player counts against the overseas cap for `home_country`
    pub fn is_overseas(&self, home_country: &str) -> bool {
        self.country != home_country
    }

    /// Check record-level invariants (averages are non-negative when present)
    pub fn check(&self) -> Result<(), RecordError> {
        for (field, value) in [
            ("batting_avg", self.batting_avg),
            ("bowling_avg", self.bowling_avg),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(RecordError {
                        id: self.id,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}
