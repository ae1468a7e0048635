//! Error codes for all translator diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2001`) with the first digit
//! indicating the phase that raised it.

use std::fmt;

/// Error codes for all translator diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E0xxx: Directive errors
/// - E1xxx: Collection and reachability errors
/// - E2xxx: Lowering errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Directive Errors (E0xxx)
    /// Directive text cannot be parsed (bad key, unbalanced value, conflicting overrides)
    E0001,
    /// Directive key is not one of the recognized keys
    E0002,
    /// Directive key requires a value but none was given
    E0003,
    /// Directive used on a method it cannot apply to, or exporting a name
    /// another root already exports
    E0004,

    // Collection / Reachability Errors (E1xxx)
    /// Named implementer does not resolve to an override of the abstract method
    E1001,
    /// Called method has no declaration available for translation
    E1002,
    /// No root methods matched the root filters
    E1003,

    // Lowering Errors (E2xxx)
    /// Construct outside the translatable subset
    E2001,
    /// `code` override of a non-void method has no `return`
    E2002,

    // Internal Errors (E9xxx)
    /// Internal translator error
    E9001,
}

impl ErrorCode {
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E0001,
        ErrorCode::E0002,
        ErrorCode::E0003,
        ErrorCode::E0004,
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E9001,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Short name of the failure class.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "MalformedDirective",
            ErrorCode::E0002 => "UnknownDirectiveKey",
            ErrorCode::E0003 => "MissingDirectiveValue",
            ErrorCode::E0004 => "MisappliedDirective",
            ErrorCode::E1001 => "UnresolvedImplementer",
            ErrorCode::E1002 => "UnresolvedCallee",
            ErrorCode::E1003 => "NoRootMethods",
            ErrorCode::E2001 => "InconvertibleConstruct",
            ErrorCode::E2002 => "MissingReturnInOverride",
            ErrorCode::E9001 => "InternalError",
        }
    }

    pub fn is_directive_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_collection_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_lowering_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or(())
    }
}
