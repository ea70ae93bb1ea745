use std::path::{Path, PathBuf};
use tracing::{info, warn};

use skillcheck_core::{Result, SkillcheckError};

use crate::schema::SkillcheckConfig;

const CONFIG_FILE: &str = "skillcheck.toml";

/// Loads the skillcheck configuration for one invocation.
pub struct ConfigLoader {
    config: SkillcheckConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > SKILLCHECK_CONFIG env >
    /// ./skillcheck.toml > <config dir>/skillcheck/skillcheck.toml.
    ///
    /// The returned flag is true when the path was asked for explicitly and
    /// must therefore exist.
    pub fn resolve_path(explicit: Option<&Path>) -> (PathBuf, bool) {
        if let Some(p) = explicit {
            return (p.to_path_buf(), true);
        }
        if let Ok(p) = std::env::var("SKILLCHECK_CONFIG") {
            return (PathBuf::from(p), true);
        }
        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return (local, false);
        }
        let global = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skillcheck")
            .join(CONFIG_FILE);
        (global, false)
    }

    /// Load the config from disk, falling back to defaults when no implicit
    /// config file exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            Self::parse_file(&config_path)?
        } else if explicit {
            return Err(SkillcheckError::Config(format!(
                "config file not found: {}",
                config_path.display()
            )));
        } else {
            SkillcheckConfig::default()
        };

        let config = Self::apply_env_overrides(config, |key| std::env::var(key).ok());

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => return Err(SkillcheckError::Config(e)),
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    fn parse_file(path: &Path) -> Result<SkillcheckConfig> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str::<SkillcheckConfig>(&raw).map_err(|e| {
            SkillcheckError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Get a copy of the loaded config.
    pub fn get(&self) -> SkillcheckConfig {
        self.config.clone()
    }

    /// Path the config was resolved to (it may not exist).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (SKILLCHECK_LOG_LEVEL, SKILLCHECK_FAIL_ON_WARNING, etc.).
    /// `lookup` reads a variable; the process environment in production.
    pub fn apply_env_overrides(
        mut config: SkillcheckConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> SkillcheckConfig {
        if let Some(v) = lookup("SKILLCHECK_LOG_LEVEL") {
            config.logging.level = v;
        }
        if let Some(v) = lookup("SKILLCHECK_LOG_FORMAT") {
            config.logging.format = v;
        }
        if let Some(v) = lookup("SKILLCHECK_FAIL_ON_WARNING") {
            match parse_bool(&v) {
                Some(b) => config.check.fail_on_warning = b,
                None => warn!(value = %v, "ignoring non-boolean SKILLCHECK_FAIL_ON_WARNING"),
            }
        }
        if let Some(v) = lookup("SKILLCHECK_FOLLOW_SYMLINKS") {
            match parse_bool(&v) {
                Some(b) => config.scan.follow_symlinks = b,
                None => warn!(value = %v, "ignoring non-boolean SKILLCHECK_FOLLOW_SYMLINKS"),
            }
        }
        config
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
