//! Diagnostic system for metadata-resolution failures.
//!
//! Every failure in the semantic front-end is fatal for the whole run, so
//! a diagnostic here carries:
//! - An error code for searchability
//! - A clear message (what went wrong)
//! - The qualified name of the offending declaration (where)
//! - Notes (why, and what the metadata looked like)

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
