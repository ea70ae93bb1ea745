use std::path::Path;

use console::style;
use serde_json::json;

use skillcheck_core::Result;
use skillcheck_skills::{FailureKind, ScanOptions, SkillRecord};

pub(super) fn cmd_list(root: &Path, options: &ScanOptions, json: bool) -> Result<i32> {
    let index = skillcheck_skills::load_registry(root, options)?;

    if json {
        let skills: Vec<_> = index.named().into_iter().map(record_json).collect();
        let unnamed: Vec<_> = index.unnamed().map(|r| r.relative_path()).collect();
        let failed: Vec<_> = index
            .failures()
            .iter()
            .filter(|f| f.is_document())
            .map(|f| f.path.as_str())
            .collect();
        let out = json!({ "skills": skills, "unnamed": unnamed, "failed": failed });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(0);
    }

    let named = index.named();
    if named.is_empty() {
        println!("No skills found in {}", root.display());
    } else {
        println!("{}\n", style(format!("Skills ({}):", named.len())).bold());
        for s in named {
            println!("  {}", style(s.name().unwrap_or_default()).cyan());
            println!("    {}", s.description().trim());
            for (key, value) in &s.front_matter().extra {
                println!("    {key}: {value}");
            }
            println!("    File: {}", s.relative_path());
            println!();
        }
    }

    let unnamed: Vec<_> = index.unnamed().collect();
    if !unnamed.is_empty() {
        println!("{}", style(format!("Unnamed documents ({}):", unnamed.len())).bold());
        for r in unnamed {
            println!("  {}", r.relative_path());
        }
        println!();
    }

    let failed: Vec<_> = index.failures().iter().filter(|f| f.is_document()).collect();
    if !failed.is_empty() {
        println!("{}", style(format!("Failed to load ({}):", failed.len())).red().bold());
        for f in failed {
            let reason = match &f.kind {
                FailureKind::Parse(e) => e.to_string(),
                FailureKind::Io(e) => e.clone(),
                _ => String::new(),
            };
            println!("  {}: {}", f.path, reason);
        }
        println!("  Run `skillcheck check` for the full report.");
    }

    Ok(0)
}

pub(super) fn cmd_show(root: &Path, options: &ScanOptions, name: &str) -> Result<i32> {
    let index = skillcheck_skills::load_registry(root, options)?;
    let skill = match index.lookup(name) {
        Ok(skill) => skill,
        Err(e) => {
            eprintln!("{e}");
            return Ok(1);
        }
    };

    println!("{}", style(name).bold());
    println!("  {}", skill.description().trim());
    for (key, value) in &skill.front_matter().extra {
        println!("  {key}: {value}");
    }
    println!("  File: {}", skill.path().display());

    println!("\n  {}", style("Instructions:").bold());
    for line in skill.body().lines() {
        println!("    {line}");
    }
    Ok(0)
}

pub(super) fn cmd_prompt(root: &Path, options: &ScanOptions) -> Result<i32> {
    let index = skillcheck_skills::load_registry(root, options)?;
    if let Some(block) = index.system_prompt_block() {
        println!("{block}");
    }
    Ok(0)
}

fn record_json(r: &SkillRecord) -> serde_json::Value {
    json!({
        "name": r.name(),
        "description": r.description(),
        "path": r.relative_path(),
        "extra": r.front_matter().extra,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillcheck_config::ScanConfig;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let skill = dir.path().join("nomad");
        std::fs::create_dir_all(&skill).unwrap();
        std::fs::write(
            skill.join("SKILL.md"),
            "---\nname: nomad\ndescription: Schedule jobs\ntags: [hashicorp]\n---\nUse nomad.\n",
        )
        .unwrap();
        dir
    }

    fn options() -> ScanOptions {
        ScanOptions::from_config(&ScanConfig::default()).unwrap()
    }

    #[test]
    fn show_unknown_name_exits_one() {
        let dir = fixture();
        assert_eq!(cmd_show(dir.path(), &options(), "Nomad").unwrap(), 1);
        assert_eq!(cmd_show(dir.path(), &options(), "nomad").unwrap(), 0);
    }

    #[test]
    fn list_and_prompt_succeed() {
        let dir = fixture();
        assert_eq!(cmd_list(dir.path(), &options(), true).unwrap(), 0);
        assert_eq!(cmd_list(dir.path(), &options(), false).unwrap(), 0);
        assert_eq!(cmd_prompt(dir.path(), &options()).unwrap(), 0);
    }

    #[test]
    fn record_json_shape() {
        let dir = fixture();
        let index = skillcheck_skills::load_registry(dir.path(), &options()).unwrap();
        let v = record_json(index.get("nomad").unwrap());
        assert_eq!(v["name"], "nomad");
        assert_eq!(v["path"], "nomad/SKILL.md");
        assert_eq!(v["extra"]["tags"][0], "hashicorp");
    }
}
