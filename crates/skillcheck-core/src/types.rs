use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a finding is. Errors fail a run; warnings only fail it when
/// `fail_on_warning` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Machine-readable identifier of the rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCode {
    MissingName,
    MissingDescription,
    DuplicateName,
    NamePathMismatch,
    EmptyBody,
    ParseError,
    IoError,
    SymlinkLoop,
}

impl RuleCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::MissingName => "missing-name",
            RuleCode::MissingDescription => "missing-description",
            RuleCode::DuplicateName => "duplicate-name",
            RuleCode::NamePathMismatch => "name-path-mismatch",
            RuleCode::EmptyBody => "empty-body",
            RuleCode::ParseError => "parse-error",
            RuleCode::IoError => "io-error",
            RuleCode::SymlinkLoop => "symlink-loop",
        }
    }

    /// The severity this rule always reports at.
    pub fn severity(&self) -> Severity {
        match self {
            RuleCode::NamePathMismatch | RuleCode::EmptyBody | RuleCode::SymlinkLoop => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation result attached to a document path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Path relative to the scan root, `/`-separated.
    pub path: String,
    pub rule: RuleCode,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(path: impl Into<String>, rule: RuleCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            rule,
            severity: rule.severity(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.path, self.rule, self.message)
    }
}
