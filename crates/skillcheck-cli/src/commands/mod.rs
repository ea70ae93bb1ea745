use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use skillcheck_config::{ConfigLoader, OutputFormat, SkillcheckConfig};
use skillcheck_core::{Result, SkillcheckError};
use skillcheck_skills::ScanOptions;

mod check;
mod skills;

/// Discover, parse and validate SKILL.md and agent documents
#[derive(Parser)]
#[command(name = "skillcheck", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to skillcheck.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory tree and validate every skill and agent document
    Check {
        /// Root directory to scan (default: current directory)
        root: Option<PathBuf>,
        /// Report format: human or json
        #[arg(short, long)]
        format: Option<OutputFormat>,
        /// Exit non-zero when any warning is reported
        #[arg(long)]
        fail_on_warning: bool,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// List the documents found under a root
    List {
        /// Root directory to scan (default: current directory)
        root: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Show one skill by its exact name
    Show {
        /// Skill name (case-sensitive)
        name: String,
        /// Root directory to scan (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Print the <available_skills> block for an agent system prompt
    Prompt {
        /// Root directory to scan (default: current directory)
        root: Option<PathBuf>,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Scan flags shared by every command that walks a tree.
#[derive(clap::Args, Debug, Default)]
struct ScanArgs {
    /// Include pattern (repeatable); replaces the configured patterns
    #[arg(short, long = "include", value_name = "GLOB")]
    include: Vec<String>,
    /// Follow symbolic links (loops are reported, not followed)
    #[arg(long, overrides_with = "no_follow_symlinks")]
    follow_symlinks: bool,
    /// Skip symbolic links even if the config enables following them
    #[arg(long, overrides_with = "follow_symlinks")]
    no_follow_symlinks: bool,
}

impl ScanArgs {
    /// Apply the flags on top of the configured scan settings.
    fn options(&self, config: &SkillcheckConfig) -> Result<ScanOptions> {
        let mut scan = config.scan.clone();
        if !self.include.is_empty() {
            scan.include_patterns = self.include.clone();
        }
        if self.follow_symlinks {
            scan.follow_symlinks = true;
        } else if self.no_follow_symlinks {
            scan.follow_symlinks = false;
        }
        ScanOptions::from_config(&scan)
    }
}

fn root_or_cwd(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| PathBuf::from("."))
}

impl Cli {
    /// Run the selected command and return the process exit code.
    pub fn run(self) -> Result<i32> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // Resolve log level: --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(&config.logging.level)
        };
        crate::logging::init(log_level, &config.logging);

        match self.command {
            Commands::Check {
                root,
                format,
                fail_on_warning,
                scan,
            } => {
                let options = scan.options(&config)?;
                let format = format.unwrap_or(config.check.format);
                let fail_on_warning = fail_on_warning || config.check.fail_on_warning;
                check::cmd_check(&root_or_cwd(root), &options, format, fail_on_warning)
            }
            Commands::List { root, json, scan } => {
                skills::cmd_list(&root_or_cwd(root), &scan.options(&config)?, json)
            }
            Commands::Show { name, root, scan } => {
                skills::cmd_show(&root_or_cwd(root), &scan.options(&config)?, &name)
            }
            Commands::Prompt { root, scan } => {
                skills::cmd_prompt(&root_or_cwd(root), &scan.options(&config)?)
            }
            Commands::Config { json } => Self::cmd_config(&config, json),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_config(config: &SkillcheckConfig, json: bool) -> Result<i32> {
        if json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| SkillcheckError::Config(e.to_string()))?
            );
        }
        Ok(0)
    }

    fn cmd_completions(shell: Shell) -> Result<i32> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "skillcheck", &mut std::io::stdout());
        Ok(0)
    }
}
