//! Structure-constructor misuse.
//!
//! `Новый Структура("Ключ1,Ключ2,...", Значение1, ...)` with more than two
//! arguments packs keys and values into one opaque call; inserting the
//! values one by one reads better and survives reordering.

use bsl_ast::{Expr, NewExpr};
use bsl_report::{Issue, Kind, Location, Severity};

use crate::{Check, Plugin, VisitContext};

/// See the module docs.
pub struct StructureConstructor {
    path: String,
    issues: Vec<Issue>,
}

impl StructureConstructor {
    /// Creates the check for one module.
    pub fn new(path: &str) -> Self {
        StructureConstructor { path: path.to_string(), issues: Vec::new() }
    }
}

impl Plugin for StructureConstructor {
    fn name(&self) -> &'static str {
        "structure-constructor"
    }

    fn enter_new_expr(&mut self, node: &NewExpr, _ctx: &VisitContext) {
        let Some(name) = &node.name else { return };
        let lower = name.to_lowercase();
        if lower != "structure" && lower != "структура" {
            return;
        }
        if node.args.len() > 2 && matches!(node.args.first(), Some(Some(Expr::String(_)))) {
            self.issues.push(Issue {
                rule: "structure-constructor",
                kind: Kind::CodeSmell,
                severity: Severity::Info,
                message: "Structure constructor with more than two arguments".to_string(),
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

impl Check for StructureConstructor {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
