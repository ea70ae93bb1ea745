//! # skillcheck-cli
//!
//! Command-line interface for skillcheck.
//!
//! ## Commands
//!
//! - `skillcheck check` - Scan a tree and validate every skill/agent document
//! - `skillcheck list` - List indexed documents
//! - `skillcheck show` - Show one skill by name
//! - `skillcheck prompt` - Render the `<available_skills>` system-prompt block
//! - `skillcheck config` - Show the effective configuration
//! - `skillcheck completions` - Generate shell completions

pub mod commands;
mod logging;

pub use commands::Cli;
