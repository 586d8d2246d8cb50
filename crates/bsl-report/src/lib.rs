//! Diagnostic issue model and the SonarQube generic-issue report.
//!
//! Analyzer plugins accumulate [`Issue`] records; the driver merges them and
//! serializes the set through [`sonar::GenericIssueReport`] into the JSON
//! shape SonarQube's generic-issue import expects.

use serde::Serialize;

pub mod sonar;

/// What kind of problem an issue describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kind {
    /// A coding error that will break something
    Bug,
    /// A security concern
    Vulnerability,
    /// Maintainability debt
    CodeSmell,
}

impl Kind {
    /// Uppercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Bug => "BUG",
            Kind::Vulnerability => "VULNERABILITY",
            Kind::CodeSmell => "CODE_SMELL",
        }
    }
}

/// How urgent an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Must fix, blocks the release
    Blocker,
    /// Must fix
    Critical,
    /// Should fix
    Major,
    /// Nice to fix
    Minor,
    /// Informational
    Info,
}

impl Severity {
    /// Uppercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Blocker => "BLOCKER",
            Severity::Critical => "CRITICAL",
            Severity::Major => "MAJOR",
            Severity::Minor => "MINOR",
            Severity::Info => "INFO",
        }
    }
}

/// Where an issue points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Path of the module's source file
    pub path: String,
    /// First line (1-based)
    pub start_line: usize,
    /// Last line (1-based)
    pub end_line: usize,
    /// First column
    pub start_col: usize,
    /// Last column
    pub end_col: usize,
}

/// One diagnostic finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Rule identifier of the reporting check
    pub rule: &'static str,
    /// Issue kind
    pub kind: Kind,
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Estimated remediation effort in minutes
    pub effort_minutes: u32,
    /// Source location
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_names_are_uppercase() {
        assert_eq!(Kind::CodeSmell.as_str(), "CODE_SMELL");
        assert_eq!(Severity::Info.as_str(), "INFO");
    }
}
