//! Concatenation-cost estimation.
//!
//! Per expression root: count `+` operations and remember whether a string
//! literal took part. Two or more additions over a string operand build the
//! result piecewise and are reported; a single `+` of two strings is fine.

use bsl_ast::{BinaryExpr, Expr};
use bsl_report::{Issue, Kind, Location, Severity};
use bsl_token::TokenKind;

use crate::{Check, Plugin, VisitContext};

/// See the module docs.
pub struct Concatenation {
    path: String,
    add_count: usize,
    saw_string: bool,
    issues: Vec<Issue>,
}

impl Concatenation {
    /// Creates the check for one module.
    pub fn new(path: &str) -> Self {
        Concatenation { path: path.to_string(), add_count: 0, saw_string: false, issues: Vec::new() }
    }
}

impl Plugin for Concatenation {
    fn name(&self) -> &'static str {
        "string-concatenation"
    }

    fn enter_expr(&mut self, _node: &Expr, _ctx: &VisitContext) {
        self.add_count = 0;
        self.saw_string = false;
    }

    fn enter_binary_expr(&mut self, node: &BinaryExpr, _ctx: &VisitContext) {
        if node.operator == TokenKind::Add {
            self.add_count += 1;
            if matches!(node.left, Expr::String(_)) || matches!(node.right, Expr::String(_)) {
                self.saw_string = true;
            }
        }
    }

    fn leave_expr(&mut self, node: &Expr, _ctx: &VisitContext) {
        if self.saw_string && self.add_count > 1 {
            let place = node.place();
            self.issues.push(Issue {
                rule: "string-concatenation",
                kind: Kind::CodeSmell,
                severity: Severity::Info,
                message: "Inefficient string concatenation".to_string(),
                effort_minutes: 2,
                location: Location {
                    path: self.path.clone(),
                    start_line: place.beg_line,
                    end_line: place.end_line,
                    start_col: place.beg_col,
                    end_col: place.end_col,
                },
            });
        }
    }
}

impl Check for Concatenation {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
