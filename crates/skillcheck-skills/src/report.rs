use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use skillcheck_core::{Finding, Result, Severity};

/// Outcome of a validation pass.
///
/// Rendering is deterministic: no timestamps or absolute paths, so the same
/// tree always produces byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Documents that matched the include patterns.
    pub documents: usize,
    pub errors: usize,
    pub warnings: usize,
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn new(documents: usize, findings: Vec<Finding>) -> Self {
        let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
        Self {
            documents,
            errors,
            warnings: findings.len() - errors,
            findings,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Whether the run fails: any error, or any warning when `fail_on_warning`.
    pub fn fails(&self, fail_on_warning: bool) -> bool {
        self.has_errors() || (fail_on_warning && self.warnings > 0)
    }

    /// Process exit code for this report: 0 when it passes, 1 otherwise.
    pub fn exit_code(&self, fail_on_warning: bool) -> i32 {
        i32::from(self.fails(fail_on_warning))
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Finding> {
        self.findings.iter().filter(move |f| f.path == path)
    }

    /// Human-readable summary grouped by severity.
    pub fn render_human(&self) -> String {
        self.render_human_with(|_, label| label.to_string())
    }

    /// Like [`render_human`](Self::render_human), with `style` applied to each
    /// group heading (e.g. to colour it for a terminal).
    pub fn render_human_with(&self, style: impl Fn(Severity, &str) -> String) -> String {
        let mut out = String::new();
        for (severity, label, count) in [
            (Severity::Error, "errors", self.errors),
            (Severity::Warning, "warnings", self.warnings),
        ] {
            if count == 0 {
                continue;
            }
            let _ = writeln!(out, "{} ({count}):", style(severity, label));
            for finding in self.with_severity(severity) {
                let _ = writeln!(out, "  {finding}");
            }
        }
        let _ = writeln!(
            out,
            "{} document(s) checked, {} error(s), {} warning(s)",
            self.documents, self.errors, self.warnings
        );
        out
    }

    /// Machine-readable listing, one entry per finding.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
