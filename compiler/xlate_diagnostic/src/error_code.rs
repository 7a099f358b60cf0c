use std::fmt;

/// Error codes for all front-end diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Metadata resolution errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Metadata Resolution Errors (E1xxx)
    /// Declaration of a kind the model does not recognize
    E1001,
    /// Ambiguous annotation data
    E1002,
    /// Proxy annotation argument of an unrecognized type
    E1003,
}

impl ErrorCode {
    /// Get the numeric code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
        }
    }

    /// Check if this is a metadata resolution error (E1xxx range).
    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this is an unsupported-kind class error.
    ///
    /// Malformed proxies belong to this class: the policy enumeration is
    /// closed, so an unknown argument is a tooling defect.
    pub fn is_unsupported_kind(&self) -> bool {
        matches!(self, ErrorCode::E1001 | ErrorCode::E1003)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
