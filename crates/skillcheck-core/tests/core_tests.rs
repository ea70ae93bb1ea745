#[cfg(test)]
mod tests {
    use skillcheck_core::*;
    use std::path::PathBuf;

    // ── Rule code tests ────────────────────────────────────────

    #[test]
    fn test_rule_code_severities() {
        assert_eq!(RuleCode::MissingName.severity(), Severity::Error);
        assert_eq!(RuleCode::MissingDescription.severity(), Severity::Error);
        assert_eq!(RuleCode::DuplicateName.severity(), Severity::Error);
        assert_eq!(RuleCode::ParseError.severity(), Severity::Error);
        assert_eq!(RuleCode::IoError.severity(), Severity::Error);
        assert_eq!(RuleCode::NamePathMismatch.severity(), Severity::Warning);
        assert_eq!(RuleCode::EmptyBody.severity(), Severity::Warning);
        assert_eq!(RuleCode::SymlinkLoop.severity(), Severity::Warning);
    }

    #[test]
    fn test_rule_code_serializes_kebab_case() {
        let json = serde_json::to_string(&RuleCode::NamePathMismatch).unwrap();
        assert_eq!(json, "\"name-path-mismatch\"");
        assert_eq!(RuleCode::NamePathMismatch.to_string(), "name-path-mismatch");
    }

    #[test]
    fn test_finding_takes_rule_severity() {
        let f = Finding::new("a/SKILL.md", RuleCode::EmptyBody, "body is empty");
        assert_eq!(f.severity, Severity::Warning);
        assert_eq!(f.to_string(), "a/SKILL.md: [empty-body] body is empty");
    }

    #[test]
    fn test_finding_json_shape() {
        let f = Finding::new("b/SKILL.md", RuleCode::DuplicateName, "dup");
        let v: serde_json::Value = serde_json::to_value(&f).unwrap();
        assert_eq!(v["path"], "b/SKILL.md");
        assert_eq!(v["rule"], "duplicate-name");
        assert_eq!(v["severity"], "error");
        assert_eq!(v["message"], "dup");
    }

    // ── Error tests ────────────────────────────────────────────

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(4, ParseErrorKind::DuplicateKey("name".into()));
        assert_eq!(err.to_string(), "line 4: duplicate key 'name'");
    }

    #[test]
    fn test_parse_error_converts() {
        let err: SkillcheckError = ParseError::new(1, ParseErrorKind::Unterminated).into();
        assert!(matches!(err, SkillcheckError::Parse(_)));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_duplicate_name_display() {
        let err = SkillcheckError::DuplicateName {
            name: "foo".into(),
            first: PathBuf::from("a/SKILL.md"),
            duplicate: PathBuf::from("b/SKILL.md"),
        };
        let s = err.to_string();
        assert!(s.contains("foo"));
        assert!(s.contains("a/SKILL.md"));
        assert!(s.contains("b/SKILL.md"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: SkillcheckError = io.into();
        assert!(err.to_string().contains("nope"));
    }
}
