use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use skillcheck_core::{ParseError, SkillcheckError};

use crate::record::SkillRecord;

/// Exact-name lookup found nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no skill named '{0}'")]
pub struct NotFound(pub String);

/// A document that could not become a record, or a traversal problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    /// `/`-separated path relative to the scan root.
    pub path: String,
    pub kind: FailureKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The file matched but could not be read.
    Io(String),
    /// The front-matter block is malformed.
    Parse(ParseError),
    /// A directory below the root could not be listed.
    Traversal(String),
    /// A followed symlink points at one of its ancestors.
    SymlinkLoop { ancestor: String },
}

impl DocumentFailure {
    /// Whether this failure stands for a matched document (as opposed to a
    /// problem with the walk itself).
    pub fn is_document(&self) -> bool {
        matches!(self.kind, FailureKind::Io(_) | FailureKind::Parse(_))
    }
}

/// Two records declaring the same name. The first one (by path) is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: String,
    pub first: String,
    pub duplicate: String,
}

impl From<&DuplicateName> for SkillcheckError {
    fn from(d: &DuplicateName) -> Self {
        SkillcheckError::DuplicateName {
            name: d.name.clone(),
            first: PathBuf::from(&d.first),
            duplicate: PathBuf::from(&d.duplicate),
        }
    }
}

/// All records from one scan, indexed by declared name.
///
/// Built once from a finished scan and never mutated afterwards. Records are
/// kept in insertion order, which is lexicographic relative-path order, so
/// "first seen" for duplicate names is the lexicographically smallest path.
#[derive(Debug, Default)]
pub struct RegistryIndex {
    records: Vec<SkillRecord>,
    by_name: HashMap<String, usize>,
    unnamed: BTreeMap<String, usize>,
    duplicates: Vec<DuplicateName>,
    failures: Vec<DocumentFailure>,
}

impl RegistryIndex {
    /// Index `records`. Named records go into the by-name map (first path
    /// wins on conflict); records without a name are keyed by relative path.
    pub fn build(
        records: impl IntoIterator<Item = SkillRecord>,
        failures: impl IntoIterator<Item = DocumentFailure>,
    ) -> Self {
        let mut records: Vec<SkillRecord> = records.into_iter().collect();
        records.sort_by(|a, b| a.relative_path().cmp(b.relative_path()));
        let mut failures: Vec<DocumentFailure> = failures.into_iter().collect();
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut unnamed = BTreeMap::new();
        let mut duplicates = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let Some(name) = record.name() else {
                debug!(path = %record.relative_path(), "indexing unnamed document by path");
                unnamed.insert(record.relative_path().to_string(), idx);
                continue;
            };
            match by_name.get(name) {
                Some(&first) => {
                    let first = records[first].relative_path();
                    warn!(skill = %name, %first, duplicate = %record.relative_path(), "duplicate skill name");
                    duplicates.push(DuplicateName {
                        name: name.to_string(),
                        first: first.to_string(),
                        duplicate: record.relative_path().to_string(),
                    });
                }
                None => {
                    by_name.insert(name.to_string(), idx);
                }
            }
        }

        Self {
            records,
            by_name,
            unnamed,
            duplicates,
            failures,
        }
    }

    /// Exact, case-sensitive lookup by declared name. Surrounding whitespace
    /// in the name is significant.
    pub fn get(&self, name: &str) -> Option<&SkillRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    /// Like [`get`](Self::get) but with a `NotFound` error for the miss.
    pub fn lookup(&self, name: &str) -> Result<&SkillRecord, NotFound> {
        self.get(name).ok_or_else(|| NotFound(name.to_string()))
    }

    /// Lookup of a record without a name, by its relative path.
    pub fn get_unnamed(&self, relative_path: &str) -> Option<&SkillRecord> {
        self.unnamed.get(relative_path).map(|&i| &self.records[i])
    }

    /// Every record, in insertion order. Includes unnamed records and the
    /// losing side of duplicate names.
    pub fn records(&self) -> impl Iterator<Item = &SkillRecord> {
        self.records.iter()
    }

    /// Indexed records sorted by name.
    pub fn named(&self) -> Vec<&SkillRecord> {
        let mut named: Vec<_> = self.by_name.values().map(|&i| &self.records[i]).collect();
        named.sort_by_key(|r| r.name());
        named
    }

    /// Records without a name, sorted by relative path.
    pub fn unnamed(&self) -> impl Iterator<Item = &SkillRecord> {
        self.unnamed.values().map(|&i| &self.records[i])
    }

    pub fn duplicates(&self) -> &[DuplicateName] {
        &self.duplicates
    }

    /// Documents that failed to load, plus traversal problems, sorted by path.
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records plus documents that matched but failed to load.
    pub fn document_count(&self) -> usize {
        self.records.len() + self.failures.iter().filter(|f| f.is_document()).count()
    }

    /// Generate the `<available_skills>` block for an agent's system prompt.
    /// Only includes name + description; the agent reads the full document
    /// from the listed file when it decides to use a skill.
    pub fn system_prompt_block(&self) -> Option<String> {
        let skills = self.named();
        if skills.is_empty() {
            return None;
        }

        let mut block = String::from("<available_skills>\n");
        for skill in &skills {
            let _ = write!(
                block,
                "<skill>\n  <name>{}</name>\n  <description>{}</description>\n  <file>{}</file>\n</skill>\n",
                xml_escape(skill.name().unwrap_or_default()),
                xml_escape(skill.description().trim()),
                xml_escape(&skill.path().display().to_string()),
            );
        }
        block.push_str("To use a skill: read its file, then follow the instructions using your tools.\n");
        block.push_str("</available_skills>");

        Some(block)
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
