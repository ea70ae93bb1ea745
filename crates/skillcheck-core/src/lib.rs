//! # skillcheck-core
//!
//! Shared vocabulary for the skillcheck workspace: the unified error type,
//! front-matter parse errors, and the finding types every validation pass
//! produces.

pub mod error;
pub mod types;

pub use error::{ParseError, ParseErrorKind, Result, SkillcheckError};
pub use types::*;
