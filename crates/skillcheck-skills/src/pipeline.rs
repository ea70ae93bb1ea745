use std::path::Path;

use tracing::{info, warn};

use skillcheck_core::Result;

use crate::document::SkillDocument;
use crate::record::{Parsed, SkillRecord};
use crate::registry::{DocumentFailure, FailureKind, RegistryIndex};
use crate::report::ValidationReport;
use crate::scanner::{self, ScanEvent, ScanOptions};
use crate::validator;

/// Scan `root`, read and parse every matching document, and index the
/// results. Per-document problems are kept on the index as failures; only an
/// unreadable root or a record build defect aborts.
pub fn load_registry(root: &Path, options: &ScanOptions) -> Result<RegistryIndex> {
    info!(root = %root.display(), follow_symlinks = options.follow_symlinks(), "scanning for skill documents");

    let mut records = Vec::new();
    let mut failures = Vec::new();

    for event in scanner::scan(root, options)? {
        match event {
            ScanEvent::Document { path, relative_path } => {
                let document = match SkillDocument::read(root, &path) {
                    Ok(document) => document,
                    Err(e) => {
                        warn!(path = %relative_path, error = %e, "failed to read document");
                        failures.push(DocumentFailure {
                            path: relative_path,
                            kind: FailureKind::Io(e.to_string()),
                        });
                        continue;
                    }
                };
                match SkillRecord::from_document(document)? {
                    Parsed::Record(record) => {
                        info!(path = %relative_path, skill = record.name().unwrap_or("-"), "loaded document");
                        records.push(record);
                    }
                    Parsed::Malformed { error, .. } => {
                        warn!(path = %relative_path, %error, "failed to parse front matter");
                        failures.push(DocumentFailure {
                            path: relative_path,
                            kind: FailureKind::Parse(error),
                        });
                    }
                }
            }
            ScanEvent::SymlinkLoop { relative_path, ancestor } => failures.push(DocumentFailure {
                path: relative_path,
                kind: FailureKind::SymlinkLoop { ancestor },
            }),
            ScanEvent::Unreadable { relative_path, reason } => failures.push(DocumentFailure {
                path: relative_path,
                kind: FailureKind::Traversal(reason),
            }),
        }
    }

    let index = RegistryIndex::build(records, failures);
    info!(
        records = index.len(),
        named = index.named().len(),
        failures = index.failures().len(),
        "registry built"
    );
    Ok(index)
}

/// Load and validate in one call.
pub fn check(root: &Path, options: &ScanOptions) -> Result<ValidationReport> {
    let index = load_registry(root, options)?;
    Ok(validator::validate(&index))
}
