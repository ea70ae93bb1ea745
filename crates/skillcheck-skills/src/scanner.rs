use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use skillcheck_config::ScanConfig;
use skillcheck_core::{Result, SkillcheckError};

use crate::document::relative_path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// What to look for during a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    include: Vec<Pattern>,
    exclude_dirs: Vec<String>,
    follow_symlinks: bool,
}

impl ScanOptions {
    pub fn new(include_patterns: &[String], exclude_dirs: &[String], follow_symlinks: bool) -> Result<Self> {
        let include = include_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| SkillcheckError::ConfigValidation {
                    field: "scan.include_patterns".into(),
                    reason: format!("invalid glob '{p}': {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            include,
            exclude_dirs: exclude_dirs.to_vec(),
            follow_symlinks,
        })
    }

    pub fn from_config(config: &ScanConfig) -> Result<Self> {
        Self::new(&config.include_patterns, &config.exclude_dirs, config.follow_symlinks)
    }

    /// Whether a `/`-separated relative path names a candidate document.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_with(relative_path, MATCH_OPTIONS))
    }

    pub fn follow_symlinks(&self) -> bool {
        self.follow_symlinks
    }
}

/// One item produced by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A file matching the include patterns.
    Document { path: PathBuf, relative_path: String },
    /// A symlink pointing back at one of its own ancestors. Not followed.
    SymlinkLoop { relative_path: String, ancestor: String },
    /// A directory entry that could not be visited.
    Unreadable { relative_path: String, reason: String },
}

type EntryFilter = Box<dyn FnMut(&DirEntry) -> bool>;

/// Lazy walk over a root directory.
///
/// Entries come out sorted by file name at each level, so two scans of an
/// unchanged tree yield the same sequence. A `Scan` is consumed as it is
/// iterated; start a new one with [`scan`] to walk again.
pub struct Scan {
    root: PathBuf,
    options: ScanOptions,
    walker: walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>,
}

/// Start scanning `root`. Fails only if the root itself cannot be listed.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Scan> {
    std::fs::read_dir(root).map_err(|e| SkillcheckError::RootUnreadable {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;

    let exclude = options.exclude_dirs.clone();
    let filter: EntryFilter = Box::new(move |entry: &DirEntry| {
        entry.depth() == 0
            || !entry.file_type().is_dir()
            || !entry
                .file_name()
                .to_str()
                .is_some_and(|name| exclude.iter().any(|d| d == name))
    });

    let walker = WalkDir::new(root)
        .follow_links(options.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(filter);

    Ok(Scan {
        root: root.to_path_buf(),
        options: options.clone(),
        walker,
    })
}

impl Scan {
    fn classify_error(&self, err: walkdir::Error) -> ScanEvent {
        let relative = err
            .path()
            .map(|p| relative_path(&self.root, p))
            .unwrap_or_default();
        if let Some(ancestor) = err.loop_ancestor() {
            let ancestor = relative_path(&self.root, ancestor);
            warn!(path = %relative, %ancestor, "symlink loop, not following");
            return ScanEvent::SymlinkLoop {
                relative_path: relative,
                ancestor,
            };
        }
        let reason = err
            .io_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| err.to_string());
        warn!(path = %relative, %reason, "skipping unreadable entry");
        ScanEvent::Unreadable {
            relative_path: relative,
            reason,
        }
    }
}

impl Iterator for Scan {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => return Some(self.classify_error(err)),
            };
            if entry.depth() == 0 {
                continue;
            }
            let file_type = entry.file_type();
            if file_type.is_symlink() {
                debug!(path = ?entry.path(), "skipping symlink");
                continue;
            }
            if !file_type.is_file() {
                continue;
            }
            let relative = relative_path(&self.root, entry.path());
            if self.options.matches(&relative) {
                debug!(path = %relative, "matched document");
                return Some(ScanEvent::Document {
                    path: entry.into_path(),
                    relative_path: relative,
                });
            }
        }
    }
}
