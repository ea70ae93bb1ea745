//! # skillcheck-skills
//!
//! Discovery, parsing, indexing and validation of skill and agent documents.
//! A skill is a directory containing a `SKILL.md` file (Markdown with a
//! front-matter block); agents live as `<name>.md` under `.claude/agents/`.
//!
//! ## Document format
//!
//! ```markdown
//! ---
//! name: packer-image-build
//! description: Build and validate machine images with Packer
//! ---
//!
//! # Packer image build
//!
//! ## When to use this skill
//! When the user asks to create or update a Packer template.
//! ```
//!
//! Agent documents carry extra fields such as `tools`, `model` and `color`;
//! those are kept verbatim in [`FrontMatter::extra`].
//!
//! ## Pipeline
//!
//! 1. [`scanner::scan`] walks the root and yields matching paths lazily
//! 2. each file is read into a [`SkillDocument`]
//! 3. [`FrontMatter::parse`] splits metadata from body
//! 4. [`SkillRecord::build`] combines them
//! 5. [`RegistryIndex::build`] indexes records by name
//! 6. [`validate`] produces a [`ValidationReport`]
//!
//! Nothing is cached between runs; every invocation rebuilds from disk.

pub mod document;
pub mod frontmatter;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod report;
pub mod scanner;
pub mod validator;

pub use document::SkillDocument;
pub use frontmatter::{FieldValue, FrontMatter};
pub use pipeline::{check, load_registry};
pub use record::{Parsed, SkillRecord};
pub use registry::{DocumentFailure, DuplicateName, FailureKind, NotFound, RegistryIndex};
pub use report::ValidationReport;
pub use scanner::{ScanEvent, ScanOptions};
pub use validator::validate;
