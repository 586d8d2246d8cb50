//! Empty exception handlers.
//!
//! An `Исключение` block with no statements swallows the error without a
//! trace.

use bsl_ast::ExceptStmt;
use bsl_report::{Issue, Kind, Location, Severity};

use crate::{Check, Plugin, VisitContext};

/// See the module docs.
pub struct EmptyExcept {
    path: String,
    issues: Vec<Issue>,
}

impl EmptyExcept {
    /// Creates the check for one module.
    pub fn new(path: &str) -> Self {
        EmptyExcept { path: path.to_string(), issues: Vec::new() }
    }
}

impl Plugin for EmptyExcept {
    fn name(&self) -> &'static str {
        "empty-except"
    }

    fn enter_except_stmt(&mut self, node: &ExceptStmt, _ctx: &VisitContext) {
        if node.body.is_empty() {
            self.issues.push(Issue {
                rule: "empty-except",
                kind: Kind::CodeSmell,
                severity: Severity::Info,
                message: "Empty exception handler".to_string(),
                effort_minutes: 2,
                location: Location {
                    path: self.path.clone(),
                    start_line: node.place.beg_line,
                    end_line: node.place.end_line,
                    start_col: node.place.beg_col,
                    end_col: node.place.end_col,
                },
            });
        }
    }
}

impl Check for EmptyExcept {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
