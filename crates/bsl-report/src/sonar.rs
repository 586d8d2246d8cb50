//! SonarQube generic-issue wire format.
//!
//! The serialized document has the exact shape of SonarQube's
//! `sonar.externalIssuesReportPaths` import:
//!
//! ```json
//! { "issues": [
//!     { "engineId": "...", "ruleId": "...", "severity": "INFO",
//!       "type": "CODE_SMELL",
//!       "primaryLocation": { "message": "...", "filePath": "...",
//!                            "textRange": { "startLine": 1, "endLine": 1,
//!                                           "startColumn": 0, "endColumn": 1 } },
//!       "effortMinutes": 2 } ] }
//! ```

use serde::Serialize;

use crate::Issue;

/// Engine identifier stamped on every exported issue.
pub const ENGINE_ID: &str = "bsl-lint";

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct TextRange {
    start_line: usize,
    end_line: usize,
    start_column: usize,
    end_column: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct PrimaryLocation {
    message: String,
    file_path: String,
    text_range: TextRange,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct SonarIssue {
    engine_id: &'static str,
    rule_id: &'static str,
    severity: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    primary_location: PrimaryLocation,
    effort_minutes: u32,
}

/// The complete generic-issue document.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct GenericIssueReport {
    issues: Vec<SonarIssue>,
}

impl GenericIssueReport {
    /// Builds the wire document from merged issues.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let issues = issues
            .iter()
            .map(|issue| SonarIssue {
                engine_id: ENGINE_ID,
                rule_id: issue.rule,
                severity: issue.severity.as_str(),
                kind: issue.kind.as_str(),
                primary_location: PrimaryLocation {
                    message: issue.message.clone(),
                    file_path: issue.location.path.clone(),
                    text_range: TextRange {
                        start_line: issue.location.start_line,
                        end_line: issue.location.end_line,
                        start_column: issue.location.start_col,
                        end_column: issue.location.end_col,
                    },
                },
                effort_minutes: issue.effort_minutes,
            })
            .collect();
        GenericIssueReport { issues }
    }

    /// Number of issues in the document.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// True when the document carries no issues.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Serializes the document to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the document into a writer.
    pub fn write_to(&self, writer: impl std::io::Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, Location, Severity};
    use pretty_assertions::assert_eq;

    fn sample() -> Issue {
        Issue {
            rule: "closing-comments",
            kind: Kind::CodeSmell,
            severity: Severity::Info,
            message: "Method \"Test()\" has an incorrect closing comment.".to_string(),
            effort_minutes: 2,
            location: Location {
                path: "CommonModules/Core/Module.bsl".to_string(),
                start_line: 3,
                end_line: 3,
                start_col: 14,
                end_col: 22,
            },
        }
    }

    #[test]
    fn report_matches_the_generic_issue_shape() {
        let report = GenericIssueReport::from_issues(&[sample()]);
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let issue = &value["issues"][0];
        assert_eq!(issue["engineId"], "bsl-lint");
        assert_eq!(issue["ruleId"], "closing-comments");
        assert_eq!(issue["severity"], "INFO");
        assert_eq!(issue["type"], "CODE_SMELL");
        assert_eq!(issue["effortMinutes"], 2);
        assert_eq!(
            issue["primaryLocation"]["message"],
            "Method \"Test()\" has an incorrect closing comment."
        );
        assert_eq!(issue["primaryLocation"]["filePath"], "CommonModules/Core/Module.bsl");
        assert_eq!(issue["primaryLocation"]["textRange"]["startLine"], 3);
        assert_eq!(issue["primaryLocation"]["textRange"]["endColumn"], 22);
    }

    #[test]
    fn empty_report() {
        let report = GenericIssueReport::from_issues(&[]);
        assert!(report.is_empty());
        assert_eq!(report.to_json().unwrap(), "{\n  \"issues\": []\n}");
    }
}
