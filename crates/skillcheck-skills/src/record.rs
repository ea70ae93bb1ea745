use std::path::Path;

use skillcheck_core::{ParseError, Result, SkillcheckError};

use crate::document::SkillDocument;
use crate::frontmatter::FrontMatter;

/// A parsed document: its front matter plus the Markdown body that follows.
///
/// The record owns its document; the body is a view into the document's
/// content rather than a second copy.
#[derive(Debug, Clone)]
pub struct SkillRecord {
    document: SkillDocument,
    front_matter: FrontMatter,
    body_start: usize,
}

impl SkillRecord {
    /// Combine a document with its parsed front matter. `body_start` is the
    /// byte offset at which the body begins in the document's content.
    ///
    /// Fails only on a pipeline defect: an offset that does not fall on a
    /// character boundary of the content, or a non-zero offset for a document
    /// without front matter.
    pub fn build(document: SkillDocument, front_matter: FrontMatter, body_start: usize) -> Result<Self> {
        let content = document.raw_content();
        if !content.is_char_boundary(body_start) {
            return Err(SkillcheckError::Build(format!(
                "{}: body offset {} is outside the document content ({} bytes)",
                document.relative_path(),
                body_start,
                content.len()
            )));
        }
        if !front_matter.present && body_start != 0 {
            return Err(SkillcheckError::Build(format!(
                "{}: document has no front matter but body starts at byte {}",
                document.relative_path(),
                body_start
            )));
        }
        Ok(Self {
            document,
            front_matter,
            body_start,
        })
    }

    /// Parse a document and build its record in one step. A malformed
    /// front-matter block hands the document back with the parse error.
    pub fn from_document(document: SkillDocument) -> Result<Parsed> {
        let parsed = FrontMatter::parse(document.raw_content())
            .map(|(fm, body)| (fm, document.raw_content().len() - body.len()));
        match parsed {
            Ok((front_matter, body_start)) => {
                Ok(Parsed::Record(Self::build(document, front_matter, body_start)?))
            }
            Err(error) => Ok(Parsed::Malformed { document, error }),
        }
    }

    pub fn document(&self) -> &SkillDocument {
        &self.document
    }

    pub fn path(&self) -> &Path {
        self.document.path()
    }

    pub fn relative_path(&self) -> &str {
        self.document.relative_path()
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    /// Declared name exactly as written. A blank name counts as missing.
    pub fn name(&self) -> Option<&str> {
        let name = self.front_matter.name.as_str();
        (!name.trim().is_empty()).then_some(name)
    }

    pub fn description(&self) -> &str {
        &self.front_matter.description
    }

    /// Markdown body (everything after the front-matter block).
    pub fn body(&self) -> &str {
        &self.document.raw_content()[self.body_start..]
    }
}

/// Outcome of [`SkillRecord::from_document`].
#[derive(Debug)]
pub enum Parsed {
    Record(SkillRecord),
    Malformed {
        document: SkillDocument,
        error: ParseError,
    },
}
