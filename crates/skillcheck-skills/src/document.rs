use std::path::{Component, Path, PathBuf};

/// One discovered file, read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDocument {
    path: PathBuf,
    relative_path: String,
    raw_content: String,
}

impl SkillDocument {
    pub fn new(path: PathBuf, relative_path: impl Into<String>, raw_content: String) -> Self {
        Self {
            path,
            relative_path: relative_path.into(),
            raw_content,
        }
    }

    /// Read `path` (which lives under `root`). The file handle is closed before
    /// this returns, on success and on failure.
    pub fn read(root: &Path, path: &Path) -> std::io::Result<Self> {
        let raw_content = std::fs::read_to_string(path)?;
        Ok(Self::new(path.to_path_buf(), relative_path(root, path), raw_content))
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `/`-separated path relative to the scan root.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }
}

/// `/`-separated form of `path` relative to `root`. Paths outside `root`
/// are rendered whole.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_uses_forward_slashes() {
        let root = Path::new("/repo");
        let path = root.join("packer").join("SKILL.md");
        assert_eq!(relative_path(root, &path), "packer/SKILL.md");
    }

    #[test]
    fn read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let skill_dir = dir.path().join("consul");
        std::fs::create_dir_all(&skill_dir).unwrap();
        let path = skill_dir.join("SKILL.md");
        std::fs::write(&path, "# Consul").unwrap();

        let doc = SkillDocument::read(dir.path(), &path).unwrap();
        assert_eq!(doc.relative_path(), "consul/SKILL.md");
        assert_eq!(doc.raw_content(), "# Consul");
        assert_eq!(doc.path(), path.as_path());
    }

    #[test]
    fn read_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SkillDocument::read(dir.path(), &dir.path().join("nope.md")).is_err());
    }
}
