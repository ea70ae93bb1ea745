#[cfg(test)]
mod tests {
    use skillcheck_config::ScanConfig;
    use skillcheck_core::{RuleCode, Severity, SkillcheckError};
    use skillcheck_skills::*;
    use std::path::Path;

    fn options() -> ScanOptions {
        ScanOptions::from_config(&ScanConfig::default()).unwrap()
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn skill(name: &str, description: &str) -> String {
        format!("---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n\nInstructions.\n")
    }

    // ── Registry properties ────────────────────────────────────

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "docs/README.md", b"# not a skill");

        let index = load_registry(dir.path(), &options()).unwrap();
        assert!(index.is_empty());
        let report = validate(&index);
        assert!(report.findings.is_empty());
        assert_eq!(report.documents, 0);
    }

    #[test]
    fn test_well_formed_skill_indexed_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "packer/SKILL.md", skill("packer", "Build images").as_bytes());

        let index = load_registry(dir.path(), &options()).unwrap();
        let record = index.get("packer").unwrap();
        assert_eq!(record.relative_path(), "packer/SKILL.md");
        assert!(record.body().contains("Instructions."));
        assert!(validate(&index).findings.is_empty());
    }

    #[test]
    fn test_duplicate_names_first_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/SKILL.md", skill("foo", "Foo skill").as_bytes());
        write(dir.path(), "b/SKILL.md", skill("foo", "Foo skill").as_bytes());

        let index = load_registry(dir.path(), &options()).unwrap();
        assert_eq!(index.get("foo").unwrap().relative_path(), "a/SKILL.md");

        let report = validate(&index);
        let dups: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.rule == RuleCode::DuplicateName)
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].path, "b/SKILL.md");
        assert_eq!(dups[0].severity, Severity::Error);
    }

    #[test]
    fn test_unterminated_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "broken/SKILL.md", b"---\nname: broken\ndescription: never closed\n\n# Body\n");

        let index = load_registry(dir.path(), &options()).unwrap();
        assert!(index.get("broken").is_none());
        assert_eq!(index.failures().len(), 1);
        assert_eq!(index.failures()[0].path, "broken/SKILL.md");

        let report = validate(&index);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].rule, RuleCode::ParseError);
        assert_eq!(report.findings[0].path, "broken/SKILL.md");
        assert_eq!(report.exit_code(false), 1);
    }

    #[test]
    fn test_no_front_matter_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes/SKILL.md", b"# Notes\n\nJust prose.\n");

        let index = load_registry(dir.path(), &options()).unwrap();
        assert!(index.get_unnamed("notes/SKILL.md").is_some());
        let report = validate(&index);
        assert!(!report.findings.iter().any(|f| matches!(
            f.rule,
            RuleCode::MissingName | RuleCode::MissingDescription
        )));
        assert_eq!(report.exit_code(true), 0);
    }

    #[test]
    fn test_unreadable_file_recorded_and_scan_continues() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad/SKILL.md", &[0xff, 0xfe, 0x00, 0x80]);
        write(dir.path(), "good/SKILL.md", skill("good", "Fine").as_bytes());

        let index = load_registry(dir.path(), &options()).unwrap();
        assert!(index.get("good").is_some());
        assert!(matches!(index.failures()[0].kind, FailureKind::Io(_)));

        let report = validate(&index);
        assert_eq!(report.documents, 2);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].rule, RuleCode::IoError);
        assert_eq!(report.findings[0].path, "bad/SKILL.md");
    }

    #[test]
    fn test_unreadable_root_aborts() {
        let err = load_registry(Path::new("/nonexistent/skillcheck/root"), &options()).unwrap_err();
        assert!(matches!(err, SkillcheckError::RootUnreadable { .. }));
    }

    #[test]
    fn test_agents_and_skills_together() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "terraform/.claude/agents/plan-reviewer.md",
            b"---\nname: plan-reviewer\ndescription: Reviews terraform plans\ntools: Read, Grep\nmodel: sonnet\ncolor: green\n---\nReview the plan.\n",
        );
        write(
            dir.path(),
            "terraform/.claude/skills/module-author/SKILL.md",
            skill("module-author", "Write modules").as_bytes(),
        );

        let index = load_registry(dir.path(), &options()).unwrap();
        let agent = index.get("plan-reviewer").unwrap();
        assert_eq!(
            agent.front_matter().get("tools"),
            Some(&FieldValue::List(vec!["Read".into(), "Grep".into()]))
        );
        assert!(index.get("module-author").is_some());
        assert!(validate(&index).findings.is_empty());
    }

    #[test]
    fn test_name_path_mismatch_warns_only() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "consul/SKILL.md", skill("consul-mesh", "Service mesh").as_bytes());

        let report = check(dir.path(), &options()).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].rule, RuleCode::NamePathMismatch);
        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), 1);
    }

    #[test]
    fn test_custom_include_pattern() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "guides/usage.md", b"---\nname: usage\ndescription: Usage guide\n---\nText\n");
        write(dir.path(), "packer/SKILL.md", skill("packer", "Images").as_bytes());

        let opts = ScanOptions::new(&["guides/*.md".into()], &[], false).unwrap();
        let index = load_registry(dir.path(), &opts).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get("usage").is_some());
    }

    #[test]
    fn test_non_ascii_indentation_does_not_abort_scan() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a/SKILL.md",
            "---\nname: a\ndescription: >\n \u{a0}indented with nbsp\n  plain\n---\nBody\n".as_bytes(),
        );
        write(dir.path(), "b/SKILL.md", skill("b", "Second").as_bytes());

        let report = check(dir.path(), &options()).unwrap();
        assert_eq!(report.documents, 2);
        assert!(report.findings.is_empty());

        let index = load_registry(dir.path(), &options()).unwrap();
        assert_eq!(index.get("a").unwrap().description(), "\u{a0}indented with nbsp  plain\n");
        assert!(index.get("b").is_some());
    }

    #[test]
    fn test_lookup_uses_declared_name_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo/SKILL.md", b"---\nname: \" foo\"\ndescription: Foo\n---\nBody\n");

        let index = load_registry(dir.path(), &options()).unwrap();
        assert!(index.get("foo").is_none());
        assert!(index.get(" foo").is_some());
    }

    // ── Report stability ───────────────────────────────────────

    #[test]
    fn test_reports_are_byte_identical_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/SKILL.md", skill("foo", "Foo").as_bytes());
        write(dir.path(), "b/SKILL.md", skill("foo", "Foo").as_bytes());
        write(dir.path(), "c/SKILL.md", b"---\nname: c\n---\n");
        write(dir.path(), "d/SKILL.md", b"---\nname: d\n");

        let first = check(dir.path(), &options()).unwrap();
        let second = check(dir.path(), &options()).unwrap();
        assert_eq!(first.render_human(), second.render_human());
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());

        let rules: Vec<_> = first.findings.iter().map(|f| (f.path.as_str(), f.rule)).collect();
        assert_eq!(
            rules,
            vec![
                ("a/SKILL.md", RuleCode::NamePathMismatch),
                ("b/SKILL.md", RuleCode::NamePathMismatch),
                ("b/SKILL.md", RuleCode::DuplicateName),
                ("c/SKILL.md", RuleCode::MissingDescription),
                ("c/SKILL.md", RuleCode::EmptyBody),
                ("d/SKILL.md", RuleCode::ParseError),
            ]
        );
    }

    #[test]
    fn test_front_matter_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let original = "---\nname: vault\ndescription: \"Secrets: read & write\"\ntools: [Read, Bash]\nhidden: true\n---\nBody\n";
        write(dir.path(), "vault/SKILL.md", original.as_bytes());

        let index = load_registry(dir.path(), &options()).unwrap();
        let fm = index.get("vault").unwrap().front_matter().clone();
        let (reparsed, _) = FrontMatter::parse(&fm.to_block()).unwrap();
        assert_eq!(reparsed, fm);
    }
}
