use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration, maps to `skillcheck.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillcheckConfig {
    pub scan: ScanConfig,
    pub check: CheckConfig,
    pub logging: LoggingConfig,
}

// ── Scan ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Glob patterns matched against the `/`-separated path relative to the root.
    pub include_patterns: Vec<String>,
    /// Directory names that are never descended into.
    pub exclude_dirs: Vec<String>,
    /// Follow symbolic links while walking. Loops are reported, not followed.
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec![
                "**/SKILL.md".into(),
                "**/.claude/skills/**/*.md".into(),
                "**/.claude/agents/**/*.md".into(),
            ],
            exclude_dirs: vec![".git".into(), "node_modules".into(), "target".into()],
            follow_symlinks: false,
        }
    }
}

// ── Check ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Treat warnings as failures when computing the exit code.
    pub fail_on_warning: bool,
    /// Report rendering.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}' (expected human or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty", "compact" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", label, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, " ({h})")?;
        }
        Ok(())
    }
}

impl SkillcheckConfig {
    /// Validate the configuration. Returns the non-fatal warnings, or an error
    /// string listing every hard error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Include patterns ───
        if self.scan.include_patterns.is_empty() {
            warnings.push(ConfigWarning {
                field: "scan.include_patterns".into(),
                message: "no include patterns, nothing would ever be scanned".into(),
                severity: WarningSeverity::Error,
                hint: Some("Use e.g. [\"**/SKILL.md\"]".into()),
            });
        }
        for (i, pattern) in self.scan.include_patterns.iter().enumerate() {
            if let Err(e) = glob::Pattern::new(pattern) {
                warnings.push(ConfigWarning {
                    field: format!("scan.include_patterns[{i}]"),
                    message: format!("invalid glob '{pattern}': {e}"),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }

        // ── Exclude dirs ───
        for (i, dir) in self.scan.exclude_dirs.iter().enumerate() {
            if dir.contains('/') || dir.contains('\\') {
                warnings.push(ConfigWarning {
                    field: format!("scan.exclude_dirs[{i}]"),
                    message: format!("'{dir}' contains a path separator and will never match"),
                    severity: WarningSeverity::Warning,
                    hint: Some("Entries are bare directory names, e.g. \"node_modules\"".into()),
                });
            }
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_cleanly() {
        let warnings = SkillcheckConfig::default().validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn bad_glob_is_an_error() {
        let mut config = SkillcheckConfig::default();
        config.scan.include_patterns = vec!["**/[SKILL.md".into()];
        let err = config.validate().unwrap_err();
        assert!(err.contains("scan.include_patterns[0]"));
    }

    #[test]
    fn empty_include_list_is_an_error() {
        let mut config = SkillcheckConfig::default();
        config.scan.include_patterns.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_level_is_a_warning() {
        let mut config = SkillcheckConfig::default();
        config.logging.level = "loud".into();
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "logging.level");
        assert_eq!(warnings[0].severity, WarningSeverity::Warning);
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("HUMAN".parse::<OutputFormat>().unwrap(), OutputFormat::Human);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
