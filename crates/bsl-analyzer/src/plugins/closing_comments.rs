//! Closing-comment verification for methods and regions.
//!
//! The house style closes every method with `// ИмяМетода()` and every
//! region with `// ИмяОбласти` on the line of the closing keyword. The
//! check compares the comment on that line against the declared name;
//! a missing comment is not reported.

use bsl_ast::{MethodDecl, Module, PrepEndRegionInst, PrepRegionInst};
use bsl_position::Comment;
use bsl_report::{Issue, Kind, Location, Severity};
use rustc_hash::FxHashMap;

use crate::{Check, Plugin, VisitContext};

/// See the module docs.
pub struct ClosingComments {
    path: String,
    comments: FxHashMap<usize, Comment>,
    region_stack: Vec<String>,
    issues: Vec<Issue>,
}

impl ClosingComments {
    /// Creates the check for one module.
    pub fn new(path: &str) -> Self {
        ClosingComments {
            path: path.to_string(),
            comments: FxHashMap::default(),
            region_stack: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn issue(&mut self, message: String, comment: &Comment) {
        self.issues.push(Issue {
            rule: "closing-comments",
            kind: Kind::CodeSmell,
            severity: Severity::Info,
            message,
            effort_minutes: 2,
            location: Location {
                path: self.path.clone(),
                start_line: comment.line,
                end_line: comment.line,
                start_col: comment.column.saturating_sub(2), // include the //
                end_col: comment.column + comment.text.chars().count(),
            },
        });
    }
}

impl Plugin for ClosingComments {
    fn name(&self) -> &'static str {
        "closing-comments"
    }

    fn enter_module(&mut self, node: &Module, _ctx: &VisitContext) {
        self.comments = node.comments.clone();
    }

    fn enter_method_decl(&mut self, node: &MethodDecl, _ctx: &VisitContext) {
        let line = node.place.end_line;
        if let Some(comment) = self.comments.get(&line).cloned() {
            let expected = format!(" {}()", node.sign.name());
            if comment.text.trim_end() != expected {
                self.issue(
                    format!(
                        "Method \"{}()\" has an incorrect closing comment.",
                        node.sign.name()
                    ),
                    &comment,
                );
            }
        }
    }

    fn enter_prep_region_inst(&mut self, node: &PrepRegionInst, _ctx: &VisitContext) {
        self.region_stack.push(node.name.clone());
    }

    fn enter_prep_end_region_inst(&mut self, node: &PrepEndRegionInst, _ctx: &VisitContext) {
        let Some(region_name) = self.region_stack.pop() else {
            return; // unbalanced #EndRegion, nothing to check against
        };
        let line = node.place.end_line;
        if let Some(comment) = self.comments.get(&line).cloned() {
            let expected = format!(" {region_name}");
            if comment.text.trim_end() != expected {
                self.issue(
                    format!("Region \"{region_name}\" has an incorrect closing comment."),
                    &comment,
                );
            }
        }
    }
}

impl Check for ClosingComments {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
