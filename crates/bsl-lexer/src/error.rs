//! Scanner error types.
//!
//! The scanner has two failure modes. Fatal conditions abort the parse of the
//! whole module and surface as [`ScanError`]. Non-fatal conditions (an
//! unknown compilation directive) are recorded as [`ScanDiagnostic`] records
//! and scanning continues with a best-effort token.

use thiserror::Error;

/// Fatal scanner failure. Aborts parsing of the current module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A character that opens no token
    #[error("unknown character {ch:?} at line {line}")]
    UnknownChar {
        /// The offending character
        ch: char,
        /// 1-based line
        line: usize,
        /// Byte offset
        pos: usize,
    },

    /// `&` not followed by a directive name
    #[error("expected compilation directive at line {line}")]
    ExpectedDirective {
        /// 1-based line
        line: usize,
        /// Byte offset
        pos: usize,
    },

    /// `#` not followed by an instruction name
    #[error("expected preprocessor instruction at line {line}")]
    ExpectedPrepInstruction {
        /// 1-based line
        line: usize,
        /// Byte offset
        pos: usize,
    },

    /// `#`-instruction whose name is not in the instruction table
    #[error("unknown preprocessor instruction \"{name}\" at line {line}")]
    UnknownPrepInstruction {
        /// The unrecognized spelling
        name: String,
        /// 1-based line
        line: usize,
        /// Byte offset
        pos: usize,
    },

    /// A number literal the decimal parser rejected
    #[error("malformed number literal \"{lit}\" at line {line}")]
    MalformedNumber {
        /// The literal text
        lit: String,
        /// 1-based line
        line: usize,
        /// Byte offset
        pos: usize,
    },
}

/// Non-fatal scanner finding, reported alongside parser diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    /// Human-readable description
    pub text: String,
    /// 1-based line
    pub line: usize,
    /// Byte offset
    pub pos: usize,
}

/// Result type for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;
