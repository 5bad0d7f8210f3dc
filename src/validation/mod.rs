//! Pre-flight validation: every finding is collected into a structured
//! report before any document mutation, so a malformed import is reported in
//! full and cancelled as a whole.

pub mod report;
pub mod rules;

pub use report::{ValidationCategory, ValidationItem, ValidationReport, ValidationSeverity};
