//! Error codes for all diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E1001`) with the first
//! digit indicating the phase. Used for lookups and documentation.

use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Invalid character in source
    E0001,
    /// Unterminated string literal
    E0002,
    /// Unterminated character literal
    E0003,
    /// Invalid number literal
    E0004,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected identifier
    E1002,
    /// Expected type reference
    E1003,
    /// Unclosed delimiter
    E1004,
    /// Unterminated type argument list
    E1005,
    /// Missing declaration name
    E1006,
    /// Source truncated at the cursor
    E1007,
    /// Expected member declaration
    E1008,
    /// Expected statement
    E1009,
}

impl ErrorCode {
    /// The code as it appears in output, e.g. `"E1001"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
        }
    }

    /// One-line description for documentation listings.
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::E0001 => "invalid character in source",
            ErrorCode::E0002 => "unterminated string literal",
            ErrorCode::E0003 => "unterminated character literal",
            ErrorCode::E0004 => "invalid number literal",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected identifier",
            ErrorCode::E1003 => "expected type reference",
            ErrorCode::E1004 => "unclosed delimiter",
            ErrorCode::E1005 => "unterminated type argument list",
            ErrorCode::E1006 => "missing declaration name",
            ErrorCode::E1007 => "source truncated at the cursor",
            ErrorCode::E1008 => "expected member declaration",
            ErrorCode::E1009 => "expected statement",
        }
    }

    /// Whether this code belongs to the lexer phase.
    pub const fn is_lexer(self) -> bool {
        matches!(
            self,
            ErrorCode::E0001 | ErrorCode::E0002 | ErrorCode::E0003 | ErrorCode::E0004
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
