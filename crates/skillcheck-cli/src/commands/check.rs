use std::path::Path;

use console::style;
use tracing::info;

use skillcheck_config::OutputFormat;
use skillcheck_core::{Result, Severity};
use skillcheck_skills::{ScanOptions, ValidationReport};

pub(super) fn cmd_check(
    root: &Path,
    options: &ScanOptions,
    format: OutputFormat,
    fail_on_warning: bool,
) -> Result<i32> {
    let report = skillcheck_skills::check(root, options)?;
    info!(
        documents = report.documents,
        errors = report.errors,
        warnings = report.warnings,
        "validation finished"
    );
    print!("{}", render(&report, format)?);
    Ok(report.exit_code(fail_on_warning))
}

fn render(report: &ValidationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", report.to_json()?)),
        OutputFormat::Human => Ok(report.render_human_with(|severity, label| match severity {
            Severity::Error => style(label).red().bold().to_string(),
            Severity::Warning => style(label).yellow().bold().to_string(),
        })),
    }
}
