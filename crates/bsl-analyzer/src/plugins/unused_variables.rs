//! Unused-variable and unused-parameter detection.
//!
//! Per-method state machine keyed by the declaration's arena item:
//!
//! - locals and auto variables start as `Set` (declared, value never read);
//! - parameters start as `Get` — parameters that are merely read are not
//!   worth a warning — or as `Nil` in strict mode, which reports parameters
//!   nobody touches at all;
//! - reading an identifier moves it to `Get` (`GetInLoop` inside a loop);
//! - re-assigning moves it back to `Set`, unless the previous read happened
//!   in a loop that is still open — loop iterations will read the new value
//!   again.
//!
//! At method end, every local not in a `Get` state is reported at its last
//! assignment; a parameter is reported when untouched (`Nil`) or when a
//! by-value parameter was only ever overwritten.

use bsl_ast::{AssignStmt, IdentExpr, ItemId, MethodDecl, Place};
use bsl_report::{Issue, Kind, Location, Severity};
use rustc_hash::FxHashMap;

use crate::{Check, Plugin, VisitContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Nil,
    Set,
    Get,
    GetInLoop,
}

#[derive(Debug)]
struct Tracked {
    name: String,
    place: Place,
    by_val: bool,
    state: State,
}

/// See the module docs.
pub struct UnusedVariables {
    path: String,
    strict_params: bool,
    vars: FxHashMap<ItemId, Tracked>,
    params: FxHashMap<ItemId, Tracked>,
    assign_left: Option<Place>,
    issues: Vec<Issue>,
}

impl UnusedVariables {
    /// Creates the check for one module. With `strict_params` every
    /// parameter starts untracked and merely-read parameters get reported
    /// too.
    pub fn new(path: &str, strict_params: bool) -> Self {
        UnusedVariables {
            path: path.to_string(),
            strict_params,
            vars: FxHashMap::default(),
            params: FxHashMap::default(),
            assign_left: None,
            issues: Vec::new(),
        }
    }

    fn issue(&mut self, message: String, place: Place) {
        self.issues.push(Issue {
            rule: "unused-variables",
            kind: Kind::CodeSmell,
            severity: Severity::Info,
            message,
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

    fn on_assigned(tracked: &mut Tracked, target: Place, in_loop: bool) {
        // A value read inside a still-open loop stays live across the
        // re-assignment; anywhere else the old value is dead.
        if !(tracked.state == State::GetInLoop && in_loop) {
            tracked.state = State::Set;
        }
        tracked.place = target;
    }
}

impl Plugin for UnusedVariables {
    fn name(&self) -> &'static str {
        "unused-variables"
    }

    fn enter_method_decl(&mut self, node: &MethodDecl, _ctx: &VisitContext) {
        self.vars.clear();
        self.params.clear();
        self.assign_left = None;

        let initial = if self.strict_params { State::Nil } else { State::Get };
        for param in node.sign.params() {
            self.params.insert(
                param.item,
                Tracked {
                    name: param.name.clone(),
                    place: param.place,
                    by_val: param.by_val,
                    state: initial,
                },
            );
        }
        for var in &node.vars {
            self.vars.insert(
                var.item,
                Tracked { name: var.name.clone(), place: var.place, by_val: false, state: State::Set },
            );
        }
        for auto in &node.auto {
            self.vars.insert(
                auto.item,
                Tracked {
                    name: auto.name.clone(),
                    place: auto.place,
                    by_val: false,
                    state: State::Set,
                },
            );
        }
    }

    fn enter_assign_stmt(&mut self, node: &AssignStmt, _ctx: &VisitContext) {
        self.assign_left = Some(node.left.place);
    }

    fn leave_assign_stmt(&mut self, node: &AssignStmt, ctx: &VisitContext) {
        // Only a plain identifier target kills the old value; writing
        // through a tail (`X.Поле = ...`) reads X.
        if node.left.args.is_none() && node.left.tail.is_empty() {
            let target = node.left.place;
            if let Some(tracked) = self.vars.get_mut(&node.left.head) {
                Self::on_assigned(tracked, target, ctx.in_loop());
            } else if let Some(tracked) = self.params.get_mut(&node.left.head) {
                Self::on_assigned(tracked, target, ctx.in_loop());
            }
        }
        self.assign_left = None;
    }

    fn enter_ident_expr(&mut self, node: &IdentExpr, ctx: &VisitContext) {
        if node.tail.is_empty() && self.assign_left == Some(node.place) {
            return; // the assignment target itself is not a read
        }
        let state = if ctx.in_loop() { State::GetInLoop } else { State::Get };
        if let Some(tracked) = self.vars.get_mut(&node.head) {
            tracked.state = state;
        } else if let Some(tracked) = self.params.get_mut(&node.head) {
            tracked.state = state;
        }
    }

    fn leave_method_decl(&mut self, _node: &MethodDecl, _ctx: &VisitContext) {
        let mut findings: Vec<(Place, String)> = Vec::new();
        for tracked in self.vars.values() {
            if !matches!(tracked.state, State::Get | State::GetInLoop) {
                findings
                    .push((tracked.place, format!("Unused variable \"{}\"", tracked.name)));
            }
        }
        for tracked in self.params.values() {
            if tracked.state == State::Nil || tracked.state == State::Set && tracked.by_val {
                findings
                    .push((tracked.place, format!("Unused parameter \"{}\"", tracked.name)));
            }
        }
        findings.sort_by_key(|(place, _)| (place.beg_line, place.beg_pos));
        for (place, message) in findings {
            self.issue(message, place);
        }
        self.vars.clear();
        self.params.clear();
    }
}

impl Check for UnusedVariables {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
