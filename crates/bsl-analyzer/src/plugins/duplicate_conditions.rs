//! Duplicate-condition detection across `Если`/`ИначеЕсли` chains.
//!
//! Conditions are compared by their textual span. Each `If` opens a fresh
//! set (nested ifs keep their own), every `ElsIf` condition already present
//! in the set is reported.

use std::sync::Arc;

use bsl_ast::{ElsIfStmt, IfStmt, Place};
use bsl_report::{Issue, Kind, Location, Severity};
use rustc_hash::FxHashSet;

use crate::{Check, Plugin, VisitContext};

/// See the module docs.
pub struct DuplicateConditions {
    path: String,
    src: Arc<str>,
    conditions: Vec<FxHashSet<String>>,
    issues: Vec<Issue>,
}

impl DuplicateConditions {
    /// Creates the check for one module; `src` is the module source the
    /// condition spans are sliced from.
    pub fn new(path: &str, src: Arc<str>) -> Self {
        DuplicateConditions {
            path: path.to_string(),
            src,
            conditions: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn cond_text(&self, place: Place) -> String {
        place.slice(&self.src).to_string()
    }

    fn issue(&mut self, place: Place) {
        self.issues.push(Issue {
            rule: "duplicate-conditions",
            kind: Kind::CodeSmell,
            severity: Severity::Info,
            message: "Duplicate condition".to_string(),
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

impl Plugin for DuplicateConditions {
    fn name(&self) -> &'static str {
        "duplicate-conditions"
    }

    fn enter_if_stmt(&mut self, node: &IfStmt, _ctx: &VisitContext) {
        let mut set = FxHashSet::default();
        set.insert(self.cond_text(node.cond.place()));
        self.conditions.push(set);
    }

    fn enter_elsif_stmt(&mut self, node: &ElsIfStmt, _ctx: &VisitContext) {
        let place = node.cond.place();
        let text = self.cond_text(place);
        if let Some(set) = self.conditions.last_mut() {
            if !set.insert(text) {
                self.issue(place);
            }
        }
    }

    fn leave_if_stmt(&mut self, _node: &IfStmt, _ctx: &VisitContext) {
        self.conditions.pop();
    }
}

impl Check for DuplicateConditions {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
