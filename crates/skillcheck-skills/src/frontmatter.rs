use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use skillcheck_core::{ParseError, ParseErrorKind};

const DELIMITER: &str = "---";

/// Fields whose comma-separated plain values are split into lists.
const LIST_FIELDS: &[&str] = &["tools", "allowed-tools", "tags"];

/// Value of an extra front-matter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    List(Vec<String>),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::List(items) => write!(f, "{}", items.join(", ")),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Metadata block at the top of a skill or agent document.
///
/// ```text
/// ---
/// name: terraform-module-review
/// description: Review a Terraform module for common mistakes
/// tools: Read, Grep, Glob
/// model: sonnet
/// ---
/// ```
///
/// `name` and `description` are first-class; every other key lands in `extra`.
/// A document without a block yields `FrontMatter::default()` with
/// `present == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Whether the document opened with a front-matter block at all.
    #[serde(skip)]
    pub present: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, FieldValue>,
}

impl FrontMatter {
    /// Split `content` into its front matter and the Markdown body that follows.
    ///
    /// The body is the exact text after the closing delimiter line, so it is
    /// always a suffix of `content`. Without a block the whole content is body.
    pub fn parse(content: &str) -> Result<(FrontMatter, &str), ParseError> {
        let text = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = text.split_inclusive('\n').enumerate().map(|(i, l)| (i + 1, l));
        let Some((_, first)) = lines.next() else {
            return Ok((FrontMatter::default(), content));
        };
        if !is_delimiter(first) {
            return Ok((FrontMatter::default(), content));
        }

        let mut offset = first.len();
        let mut block = Vec::new();
        let mut closed = false;
        for (lineno, line) in lines {
            offset += line.len();
            if is_delimiter(line) {
                closed = true;
                break;
            }
            block.push((lineno, line.trim_end_matches(['\n', '\r'])));
        }
        if !closed {
            return Err(ParseError::new(1, ParseErrorKind::Unterminated));
        }

        let front_matter = parse_block(&block)?;
        Ok((front_matter, &text[offset..]))
    }

    /// Look up an extra field.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.extra.get(key)
    }

    /// Render the block back to text, delimiters included. Parsing the result
    /// yields a front matter equal to `self` (key order is not preserved).
    pub fn to_block(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        if !self.name.is_empty() {
            let _ = writeln!(out, "name: {}", render_scalar(&self.name));
        }
        if !self.description.is_empty() {
            let _ = writeln!(out, "description: {}", render_scalar(&self.description));
        }
        for (key, value) in &self.extra {
            let rendered = match value {
                FieldValue::Bool(b) => b.to_string(),
                FieldValue::Text(s) => render_scalar(s),
                FieldValue::List(items) => {
                    let items: Vec<String> = items.iter().map(|s| render_scalar(s)).collect();
                    format!("[{}]", items.join(", "))
                }
            };
            let _ = writeln!(out, "{key}: {rendered}");
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

// ── Block parsing ──────────────────────────────────────────────

/// A value before it is assigned to a typed field.
enum Raw {
    Plain(String),
    Quoted(String),
    List(Vec<String>),
}

type Line<'a> = (usize, &'a str);

fn malformed(line: usize, msg: impl Into<String>) -> ParseError {
    ParseError::new(line, ParseErrorKind::Malformed(msg.into()))
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// A `- item` line at column zero, which YAML allows under a key.
fn is_bare_item(line: &str) -> bool {
    line == "-" || line.starts_with("- ")
}

fn is_blank(line: &str) -> bool {
    line.trim_matches([' ', '\t', '\r']).is_empty()
}

/// Leading spaces and tabs, in bytes. Other Unicode whitespace is content.
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn parse_block(block: &[Line<'_>]) -> Result<FrontMatter, ParseError> {
    let mut fm = FrontMatter {
        present: true,
        ..Default::default()
    };
    let mut seen: Vec<String> = Vec::new();

    let mut i = 0;
    while i < block.len() {
        let (lineno, line) = block[i];
        i += 1;
        if is_blank(line) || line.starts_with('#') {
            continue;
        }
        if is_indented(line) {
            return Err(malformed(lineno, "indented line does not belong to any key"));
        }
        let (key, rest) = split_key(line).ok_or_else(|| {
            malformed(lineno, format!("expected `key: value`, found `{}`", line.trim()))
        })?;

        let start = i;
        while i < block.len() && continues(block, i) {
            i += 1;
        }

        for (key, raw, at) in parse_entry(lineno, key, rest.trim(), &block[start..i])? {
            if seen.contains(&key) {
                return Err(ParseError::new(at, ParseErrorKind::DuplicateKey(key)));
            }
            assign(&mut fm, &key, raw, at)?;
            seen.push(key);
        }
    }

    Ok(fm)
}

/// Whether `block[i]` continues the entry above it. Blank lines only count
/// when an indented line follows them.
fn continues(block: &[Line<'_>], i: usize) -> bool {
    let line = block[i].1;
    if !is_blank(line) {
        return is_indented(line) || is_bare_item(line);
    }
    block[i + 1..]
        .iter()
        .find(|(_, l)| !is_blank(l))
        .is_some_and(|(_, l)| is_indented(l))
}

/// Split `key: value`. The key must be non-empty and made of ASCII
/// alphanumerics, `-`, `_` or `.`; the colon must be followed by whitespace
/// or end the line.
fn split_key(line: &str) -> Option<(&str, &str)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim_end();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid || !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
        return None;
    }
    Some((key, rest))
}

fn parse_entry(
    lineno: usize,
    key: &str,
    rest: &str,
    cont: &[Line<'_>],
) -> Result<Vec<(String, Raw, usize)>, ParseError> {
    let content: Vec<Line<'_>> = cont.iter().copied().filter(|(_, l)| !is_blank(l)).collect();

    let single = |raw: Raw| -> Result<Vec<(String, Raw, usize)>, ParseError> {
        Ok(vec![(key.to_string(), raw, lineno)])
    };

    match rest {
        "" => {
            let Some(&(_, first)) = content.first() else {
                return single(Raw::Plain(String::new()));
            };
            if first.trim_start().starts_with('-') {
                single(Raw::List(parse_block_list(&content)?))
            } else {
                parse_mapping(key, &content)
            }
        }
        "|" | "|-" | "|+" | ">" | ">-" | ">+" => single(Raw::Quoted(block_scalar(rest, cont))),
        _ if rest.starts_with('[') => {
            reject_continuation(&content)?;
            single(Raw::List(parse_flow_list(lineno, rest)?))
        }
        _ if rest.starts_with(['"', '\'']) => {
            reject_continuation(&content)?;
            single(Raw::Quoted(parse_quoted_whole(lineno, rest)?))
        }
        _ => {
            let mut lines = vec![rest];
            lines.extend(cont.iter().map(|(_, l)| l.trim()));
            single(Raw::Plain(fold(&lines)))
        }
    }
}

fn reject_continuation(content: &[Line<'_>]) -> Result<(), ParseError> {
    match content.first() {
        Some(&(at, _)) => Err(malformed(at, "unexpected continuation line after value")),
        None => Ok(()),
    }
}

fn parse_block_list(content: &[Line<'_>]) -> Result<Vec<String>, ParseError> {
    let mut items = Vec::new();
    for &(at, line) in content {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let item = match line.strip_prefix('-') {
            Some(item) if item.is_empty() || item.starts_with([' ', '\t']) => item.trim(),
            _ => return Err(malformed(at, format!("expected list item, found `{line}`"))),
        };
        if item.is_empty() {
            continue;
        }
        if item.starts_with(['"', '\'']) {
            items.push(parse_quoted_whole(at, item)?);
        } else {
            items.push(item.to_string());
        }
    }
    Ok(items)
}

/// One level of nesting, flattened to dotted keys (`metadata.author`).
fn parse_mapping(parent: &str, content: &[Line<'_>]) -> Result<Vec<(String, Raw, usize)>, ParseError> {
    let base = content.first().map_or(0, |(_, l)| indent_width(l));

    let mut entries = Vec::new();
    for &(at, line) in content {
        if line.trim_start().starts_with('#') {
            continue;
        }
        if indent_width(line) != base {
            return Err(malformed(at, "nested values deeper than one level are not supported"));
        }
        let (child, rest) = split_key(&line[base..])
            .ok_or_else(|| malformed(at, format!("expected `key: value`, found `{}`", line.trim())))?;
        let rest = rest.trim();
        let raw = if rest.starts_with('[') {
            Raw::List(parse_flow_list(at, rest)?)
        } else if rest.starts_with(['"', '\'']) {
            Raw::Quoted(parse_quoted_whole(at, rest)?)
        } else {
            Raw::Plain(rest.to_string())
        };
        entries.push((format!("{parent}.{child}"), raw, at));
    }
    Ok(entries)
}

/// `|` keeps line breaks, `>` folds them into spaces. `-` strips the final
/// newline; otherwise one is kept.
fn block_scalar(indicator: &str, cont: &[Line<'_>]) -> String {
    let indent = cont
        .iter()
        .filter(|(_, l)| !is_blank(l))
        .map(|(_, l)| indent_width(l))
        .min()
        .unwrap_or(0);
    let lines: Vec<&str> = cont
        .iter()
        .map(|(_, l)| if is_blank(l) { "" } else { l[indent..].trim_end() })
        .collect();

    let mut text = if indicator.starts_with('|') {
        lines.join("\n")
    } else {
        fold(&lines)
    };
    if !text.is_empty() && !indicator.ends_with('-') {
        text.push('\n');
    }
    text
}

/// Join lines with spaces; an empty line becomes a line break.
fn fold(lines: &[&str]) -> String {
    let mut out = String::new();
    let mut pending_space = false;
    for line in lines {
        if line.is_empty() {
            out.push('\n');
            pending_space = false;
        } else {
            if pending_space {
                out.push(' ');
            }
            out.push_str(line);
            pending_space = true;
        }
    }
    out
}

fn parse_flow_list(lineno: usize, value: &str) -> Result<Vec<String>, ParseError> {
    let open = value.strip_prefix('[').unwrap_or(value);
    let mut parts = split_outside_quotes(open, ']');
    if parts.len() < 2 {
        return Err(malformed(lineno, "list is missing its closing `]`"));
    }
    let inner = parts.remove(0);
    let rest = open[inner.len() + 1..].trim();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err(malformed(lineno, format!("unexpected text after list: `{rest}`")));
    }

    let mut items = Vec::new();
    for part in split_outside_quotes(inner, ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if part.starts_with(['"', '\'']) {
            items.push(parse_quoted_whole(lineno, part)?);
        } else {
            items.push(part.to_string());
        }
    }
    Ok(items)
}

fn split_outside_quotes(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == sep => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Parse a quoted scalar that must make up the whole value (a trailing
/// `# comment` is allowed).
fn parse_quoted_whole(lineno: usize, value: &str) -> Result<String, ParseError> {
    let (text, rest) = parse_quoted(value)
        .ok_or_else(|| ParseError::new(lineno, ParseErrorKind::UnterminatedQuote))?;
    let rest = rest.trim();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err(malformed(lineno, format!("unexpected text after quoted value: `{rest}`")));
    }
    Ok(text)
}

/// Returns the unescaped string and the text after the closing quote, or
/// `None` if the quote is never closed.
fn parse_quoted(value: &str) -> Option<(String, &str)> {
    let mut chars = value.char_indices();
    let (_, quote) = chars.next()?;
    let mut out = String::new();

    if quote == '\'' {
        let mut chars = chars.peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if chars.peek().is_some_and(|&(_, n)| n == '\'') {
                    chars.next();
                    out.push('\'');
                } else {
                    return Some((out, &value[i + 1..]));
                }
            } else {
                out.push(c);
            }
        }
        return None;
    }

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, &value[i + 1..])),
            '\\' => match chars.next()?.1 {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            },
            _ => out.push(c),
        }
    }
    None
}

fn assign(fm: &mut FrontMatter, key: &str, raw: Raw, line: usize) -> Result<(), ParseError> {
    match key {
        "name" | "description" => {
            let text = match raw {
                Raw::Plain(s) | Raw::Quoted(s) => s,
                Raw::List(_) => {
                    return Err(malformed(line, format!("`{key}` must be a string, not a list")));
                }
            };
            if key == "name" {
                fm.name = text;
            } else {
                fm.description = text;
            }
        }
        _ => {
            let value = match raw {
                Raw::List(items) => FieldValue::List(items),
                Raw::Quoted(s) => FieldValue::Text(s),
                Raw::Plain(s) if s == "true" => FieldValue::Bool(true),
                Raw::Plain(s) if s == "false" => FieldValue::Bool(false),
                Raw::Plain(s) if LIST_FIELDS.contains(&key) && s.contains(',') => FieldValue::List(
                    s.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect(),
                ),
                Raw::Plain(s) => FieldValue::Text(s),
            };
            fm.extra.insert(key.to_string(), value);
        }
    }
    Ok(())
}

// ── Rendering ──────────────────────────────────────────────────

fn render_scalar(s: &str) -> String {
    let plain = !s.is_empty()
        && s == s.trim()
        && s != "true"
        && s != "false"
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.' | '/' | '(' | ')'));
    if plain {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
