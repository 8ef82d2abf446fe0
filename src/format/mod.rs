//! Squad Formats
//!
//! Named rule sets (T20, ODI, custom) selecting the limits the validator applies.

pub mod registry;
pub mod schema;

pub use registry::{DEFAULT_FORMAT, FormatPriority, FormatRegistry, LoadedFormat};
pub use schema::{Format, FormatError, MAX_SQUAD_SIZE, RuleSet, RuleSetError};
