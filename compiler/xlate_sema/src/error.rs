//! Errors raised while building the semantic model.
//!
//! The enumeration is closed: every failure is fatal for the whole
//! metadata-resolution pass, and each variant names the declaration that
//! caused it so the run can stop with a pinpointed diagnostic.

use xlate_diagnostic::{Diagnostic, ErrorCode};

/// A fatal metadata-resolution error.
///
/// `Clone` so a failed construction cached by the source can be handed to
/// every caller that asks for the same record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SemaError {
    /// A declaration of a kind the model does not handle here, e.g. a type
    /// handle given where a member is required, or a failed narrowing.
    #[error("`{name}` is a {found}, expected {expected}")]
    UnsupportedKind {
        name: String,
        found: &'static str,
        expected: &'static str,
    },

    /// Ambiguous or conflicting annotation data.
    #[error("ambiguous metadata on `{owner}`: {message}")]
    Configuration { owner: String, message: String },

    /// A proxy annotation argument whose type the policy does not recognize.
    #[error("malformed proxy `{proxy}`: {detail}")]
    MalformedProxy { proxy: String, detail: String },
}

impl SemaError {
    pub(crate) fn configuration(owner: impl Into<String>, message: impl Into<String>) -> Self {
        SemaError::Configuration {
            owner: owner.into(),
            message: message.into(),
        }
    }

    /// The diagnostic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SemaError::UnsupportedKind { .. } => ErrorCode::E1001,
            SemaError::Configuration { .. } => ErrorCode::E1002,
            SemaError::MalformedProxy { .. } => ErrorCode::E1003,
        }
    }

    /// Qualified name of the offending declaration.
    pub fn subject(&self) -> &str {
        match self {
            SemaError::UnsupportedKind { name, .. } => name,
            SemaError::Configuration { owner, .. } => owner,
            SemaError::MalformedProxy { proxy, .. } => proxy,
        }
    }

    /// Convert to a diagnostic for reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_subject(self.subject());

        match self {
            SemaError::UnsupportedKind { .. } => {
                diag.with_note("this is a defect in the metadata reader, not in user code")
            }
            SemaError::Configuration { .. } => {
                diag.with_note("remove the duplicate or conflicting annotation")
            }
            SemaError::MalformedProxy { .. } => diag.with_note(
                "proxy arguments must be target types, an attribute policy or a member policy",
            ),
        }
    }
}
