//! Cricket Roster
//!
//! Squad composition rules for cricket team selection.
//!
//! This library provides:
//! - Roster composition validation with itemized violations
//! - Interactive selection with a bounded squad size
//! - Named squad formats loaded from TOML
//! - Player catalog and roster store collaborators
//! - Saved roster details with team statistics
//! - Configuration management

pub mod builder;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod details;
pub mod format;
pub mod player;
pub mod selection;
pub mod store;
pub mod validation;

// Re-exports for clean public API
pub use builder::{SubmitError, TeamBuilder};
pub use catalog::{InMemoryCatalog, PlayerCatalog, PlayerFilter};
pub use config::Config;
pub use details::{DetailsError, RosterDetails, roster_details};
pub use format::{Format, FormatRegistry, RuleSet, RuleSetError};
pub use player::{Player, PlayerId, RecordError, Role};
pub use selection::{Selection, SelectionChange, SelectionError};
pub use store::{InMemoryRosterStore, OwnerId, Roster, RosterId, RosterStore, StoreError};
pub use validation::{CompositionSummary, ValidationVerdict, Violation, summarize, validate};
