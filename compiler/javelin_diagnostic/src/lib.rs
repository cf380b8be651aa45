//! Diagnostic system for error reporting.
//!
//! Recovery parsing never aborts on malformed input, so diagnostics are
//! accumulated rather than returned early:
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Context labels (why it's wrong)

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
