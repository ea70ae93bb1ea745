use std::collections::HashMap;

use skillcheck_core::{Finding, RuleCode, SkillcheckError};

use crate::record::SkillRecord;
use crate::registry::{FailureKind, RegistryIndex};
use crate::report::ValidationReport;

/// Run every rule over `index`. Read-only; the same index always yields the
/// same findings in the same order (by path, then rule order per document).
pub fn validate(index: &RegistryIndex) -> ValidationReport {
    let duplicates: HashMap<&str, SkillcheckError> = index
        .duplicates()
        .iter()
        .map(|d| (d.duplicate.as_str(), SkillcheckError::from(d)))
        .collect();

    let mut findings = Vec::new();

    for record in index.records() {
        check_record(record, &mut findings);
        if let Some(err) = duplicates.get(record.relative_path()) {
            findings.push(Finding::new(record.relative_path(), RuleCode::DuplicateName, err.to_string()));
        }
    }

    for failure in index.failures() {
        let finding = match &failure.kind {
            FailureKind::Parse(e) => {
                Finding::new(&failure.path, RuleCode::ParseError, format!("malformed front matter: {e}"))
            }
            FailureKind::Io(reason) => {
                Finding::new(&failure.path, RuleCode::IoError, format!("cannot read file: {reason}"))
            }
            FailureKind::Traversal(reason) => {
                Finding::new(&failure.path, RuleCode::IoError, format!("cannot read directory: {reason}"))
            }
            FailureKind::SymlinkLoop { ancestor } => Finding::new(
                &failure.path,
                RuleCode::SymlinkLoop,
                format!("symlink loops back to '{ancestor}', not followed"),
            ),
        };
        findings.push(finding);
    }

    // Records and failures are each already in path order; a stable sort
    // interleaves them without disturbing per-document rule order.
    findings.sort_by(|a, b| a.path.cmp(&b.path));

    ValidationReport::new(index.document_count(), findings)
}

fn check_record(record: &SkillRecord, findings: &mut Vec<Finding>) {
    let path = record.relative_path();
    let fm = record.front_matter();

    if fm.present {
        if fm.name.trim().is_empty() {
            findings.push(Finding::new(path, RuleCode::MissingName, "front matter has no `name`"));
        }
        if fm.description.trim().is_empty() {
            findings.push(Finding::new(
                path,
                RuleCode::MissingDescription,
                "front matter has no `description`",
            ));
        }
    }

    if let (Some(name), Some(expected)) = (record.name(), expected_name(path)) {
        if name != expected {
            findings.push(Finding::new(
                path,
                RuleCode::NamePathMismatch,
                format!("name '{name}' does not match '{expected}' derived from the path"),
            ));
        }
    }

    if record.body().trim().is_empty() {
        findings.push(Finding::new(path, RuleCode::EmptyBody, "document body is empty"));
    }
}

/// Name a document is expected to declare: the containing directory for
/// `SKILL.md`, the file stem for anything else (e.g. `agents/<name>.md`).
pub fn expected_name(relative_path: &str) -> Option<&str> {
    let mut parts = relative_path.rsplit('/');
    let file = parts.next()?;
    if file == "SKILL.md" {
        return parts.next().filter(|dir| !dir.is_empty());
    }
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    (!stem.is_empty()).then_some(stem)
}
