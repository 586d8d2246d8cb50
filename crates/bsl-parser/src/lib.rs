//! Recursive-descent parser for BSL modules.
//!
//! The parser consumes tokens straight from the scanner (no token buffer)
//! and builds the AST while resolving identifiers against the module's
//! lexical scopes and the global context for its module kind.
//!
//! Two error channels exist. Fatal conditions (syntax mismatch at the top
//! level, redeclaration, scanner fatals) abort the module parse with a
//! [`ParseError`]. Deferred findings (calls to methods that never get
//! declared, unknown compilation directives) accumulate as
//! [`ParseDiagnostic`] records and are returned next to the finished module.
//!
//! ```no_run
//! use bsl_context::ModuleKind;
//! use bsl_parser::Parser;
//!
//! let parsed = Parser::new("Перем Сумма;\nСумма = 1;", ModuleKind::CommonModule)
//!     .parse()
//!     .expect("syntactically valid module");
//! assert!(parsed.diagnostics.is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
mod parser;

pub use error::{ParseDiagnostic, ParseError, Result};
pub use parser::{Parsed, Parser};
