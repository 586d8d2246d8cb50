//! Parser error types.

use bsl_lexer::ScanError;
use thiserror::Error;

/// Fatal parser failure. Aborts parsing of the current module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Scanner fatal propagated through the parser
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The current token does not match what the grammar requires
    #[error("expected {what} at line {line}")]
    Expected {
        /// What the grammar required
        what: String,
        /// 1-based line of the offending token
        line: usize,
        /// Byte offset of the offending token
        pos: usize,
    },

    /// A name was declared twice in the same scope or namespace
    #[error("\"{name}\" already declared at line {line}")]
    AlreadyDeclared {
        /// The redeclared name
        name: String,
        /// 1-based line of the redeclaration
        line: usize,
    },

    /// A module-level `Var` after the first method declaration
    #[error("variable declarations must precede method declarations (line {line})")]
    VarAfterMethod {
        /// 1-based line of the `Var`
        line: usize,
    },
}

/// A deferred, non-fatal parse finding.
///
/// Calls to methods that never meet a declaration produce one record per
/// call site at end of parse; non-fatal scanner findings are folded into the
/// same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// Human-readable description
    pub text: String,
    /// 1-based line
    pub line: usize,
    /// Byte offset
    pub pos: usize,
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;
