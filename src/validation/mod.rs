//! Validation Engine
//!
//! Roster composition checks, independent of selection, storage and output.

pub mod engine;

pub use engine::{
    CompositionSummary, PreconditionError, Rule, ValidationVerdict, Violation, evaluate,
    summarize, validate,
};
