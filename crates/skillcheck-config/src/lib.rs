//! # skillcheck-config
//!
//! Configuration for skillcheck. Reads `skillcheck.toml`, then applies
//! environment variable overrides. CLI flags are applied on top by the caller.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::SkillcheckConfig;
pub use schema::{CheckConfig, ConfigWarning, LoggingConfig, OutputFormat, ScanConfig, WarningSeverity};
