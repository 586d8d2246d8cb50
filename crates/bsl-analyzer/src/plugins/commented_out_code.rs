//! Commented-out-code heuristic.
//!
//! A comment is flagged as likely code when it looks like an assignment
//! (`x = ...`), a multi-line-string continuation, a statement opening with a
//! reserved keyword, or a first word ending in `;`. Contiguous flagged
//! blocks report once: a comment directly below a flagged line is absorbed
//! into the same finding.

use bsl_ast::Module;
use bsl_position::Comment;
use bsl_report::{Issue, Kind, Location, Severity};
use bsl_token::Keyword;

use crate::{Check, Plugin, VisitContext};

/// See the module docs.
pub struct CommentedOutCode {
    path: String,
    issues: Vec<Issue>,
}

impl CommentedOutCode {
    /// Creates the check for one module.
    pub fn new(path: &str) -> Self {
        CommentedOutCode { path: path.to_string(), issues: Vec::new() }
    }

    fn looks_like_code(text: &str) -> bool {
        let words: Vec<&str> = text.split(' ').collect();
        let first = words.first().copied().unwrap_or("");
        words.len() > 1 && words[1] == "="
            || first == "|"
            || first == "\t"
            || Keyword::lookup(first).is_some()
            || first.ends_with(';')
    }

    fn issue(&mut self, comment: &Comment) {
        self.issues.push(Issue {
            rule: "commented-out-code",
            kind: Kind::CodeSmell,
            severity: Severity::Info,
            message: "Comment probably contains commented-out code.".to_string(),
            effort_minutes: 2,
            location: Location {
                path: self.path.clone(),
                start_line: comment.line,
                end_line: comment.line,
                start_col: comment.column.saturating_sub(2),
                end_col: comment.column + comment.text.chars().count(),
            },
        });
    }
}

impl Plugin for CommentedOutCode {
    fn name(&self) -> &'static str {
        "commented-out-code"
    }

    fn enter_module(&mut self, node: &Module, _ctx: &VisitContext) {
        let mut lines: Vec<usize> = node.comments.keys().copied().collect();
        lines.sort_unstable();

        let mut flagged_line = 0usize;
        for line in lines {
            let comment = &node.comments[&line];
            if flagged_line + 1 == line {
                // continuation of an already-reported block
                flagged_line = line;
                continue;
            }
            if Self::looks_like_code(&comment.text) {
                self.issue(comment);
                flagged_line = line;
            }
        }
    }
}

impl Check for CommentedOutCode {
    fn close(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
