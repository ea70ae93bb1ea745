use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the skillcheck workspace.
#[derive(Error, Debug)]
pub enum SkillcheckError {
    // ── Scan errors ────────────────────────────────────────────
    #[error("cannot read root directory {}: {reason}", path.display())]
    RootUnreadable { path: PathBuf, reason: String },

    // ── Document errors ────────────────────────────────────────
    #[error("front matter: {0}")]
    Parse(#[from] ParseError),

    #[error("duplicate skill name '{name}': {} already declared by {}", duplicate.display(), first.display())]
    DuplicateName {
        name: String,
        first: PathBuf,
        duplicate: PathBuf,
    },

    /// A pipeline contract was violated. Never expected in normal operation.
    #[error("record build failed: {0}")]
    Build(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SkillcheckError>;

/// A malformed front-matter block. `line` is the 1-based line in the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("front matter opened here is never closed with ---")]
    Unterminated,

    #[error("malformed line: {0}")]
    Malformed(String),

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),

    #[error("unterminated quoted string")]
    UnterminatedQuote,
}
