//! Block-style YAML emitter for canonical documents.
//!
//! Output layout:
//! - 2-space indentation, sequences indented under their key
//! - keys in canonical field order, never sorted
//! - strings quoted only when a plain scalar would read back differently
//! - multi-line strings as literal blocks
//! - long single-line strings folded at the line width
//! - no anchors, aliases or tags

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use wexcfg_application::ConfigSerializer;
use wexcfg_domain::{CanonicalDocument, SerializationError};

/// Default maximum line width before long strings are folded.
pub const DEFAULT_LINE_WIDTH: usize = 120;

/// Media type of the emitted text.
pub const YAML_MEDIA_TYPE: &str = "text/yaml";

const INDENT: usize = 2;

/// YAML 1.1 booleans that plain scalars must not collide with.
const LEGACY_BOOLEANS: &[&str] = &["y", "n", "yes", "no", "on", "off"];

/// Longest key YAML accepts in implicit `key: value` form.
const MAX_IMPLICIT_KEY_CHARS: usize = 1024;

/// Serializes canonical documents to block-style YAML.
#[derive(Debug, Clone, Copy)]
pub struct YamlSerializer {
    line_width: usize,
}

impl Default for YamlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlSerializer {
    /// Creates a serializer with the default line width.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }

    /// Sets the line width used for folding.
    #[must_use]
    pub const fn with_line_width(mut self, line_width: usize) -> Self {
        self.line_width = line_width;
        self
    }
}

impl ConfigSerializer for YamlSerializer {
    fn media_type(&self) -> &'static str {
        YAML_MEDIA_TYPE
    }

    fn serialize(&self, canonical: &CanonicalDocument) -> Result<String, SerializationError> {
        to_yaml(canonical, self.line_width)
    }
}

/// Renders any serializable value as block-style YAML.
///
/// # Errors
///
/// Returns [`SerializationError`] if the value cannot be represented as
/// YAML data or holds a tagged value.
pub fn to_yaml<T: Serialize>(value: &T, line_width: usize) -> Result<String, SerializationError> {
    let value = serde_yaml::to_value(value).map_err(|e| SerializationError::new(e.to_string()))?;
    value_to_yaml(&value, line_width)
}

/// Renders a YAML value tree in block style.
///
/// # Errors
///
/// Returns [`SerializationError`] if the tree holds a tagged value or a
/// non-scalar mapping key.
pub fn value_to_yaml(value: &Value, line_width: usize) -> Result<String, SerializationError> {
    let mut emitter = Emitter {
        out: String::new(),
        line_width,
    };
    emitter.write_root(value)?;
    Ok(emitter.out)
}

struct Emitter {
    out: String,
    line_width: usize,
}

impl Emitter {
    fn write_root(&mut self, value: &Value) -> Result<(), SerializationError> {
        match value {
            Value::Mapping(map) if !map.is_empty() => self.write_mapping(map, 0, false),
            Value::Sequence(seq) if !seq.is_empty() => self.write_sequence(seq, 0, false),
            other => {
                let scalar = self.scalar(other, 0)?;
                self.out.push_str(&scalar);
                self.out.push('\n');
                Ok(())
            }
        }
    }

    /// Writes mapping entries at `indent`. With `inline`, the first key
    /// continues the current line.
    fn write_mapping(
        &mut self,
        map: &Mapping,
        indent: usize,
        mut inline: bool,
    ) -> Result<(), SerializationError> {
        for (key, value) in map {
            if !inline {
                self.pad(indent);
            }
            inline = false;
            let key = render_key(key)?;
            if key.chars().count() > MAX_IMPLICIT_KEY_CHARS {
                self.out.push_str("? ");
                self.out.push_str(&key);
                self.out.push('\n');
                self.pad(indent);
            } else {
                self.out.push_str(&key);
            }
            self.out.push(':');
            self.write_entry_value(value, indent)?;
        }
        Ok(())
    }

    fn write_entry_value(&mut self, value: &Value, indent: usize) -> Result<(), SerializationError> {
        match value {
            Value::Mapping(map) if !map.is_empty() => {
                self.out.push('\n');
                self.write_mapping(map, indent + INDENT, false)
            }
            Value::Sequence(seq) if !seq.is_empty() => {
                self.out.push('\n');
                self.write_sequence(seq, indent + INDENT, false)
            }
            scalar => {
                self.out.push(' ');
                let rendered = self.scalar(scalar, indent)?;
                self.out.push_str(&rendered);
                self.out.push('\n');
                Ok(())
            }
        }
    }

    fn write_sequence(
        &mut self,
        seq: &[Value],
        indent: usize,
        mut inline: bool,
    ) -> Result<(), SerializationError> {
        for item in seq {
            if !inline {
                self.pad(indent);
            }
            inline = false;
            self.out.push_str("- ");
            match item {
                Value::Mapping(map) if !map.is_empty() => {
                    self.write_mapping(map, indent + INDENT, true)?;
                }
                Value::Sequence(inner) if !inner.is_empty() => {
                    self.write_sequence(inner, indent + INDENT, true)?;
                }
                scalar => {
                    let rendered = self.scalar(scalar, indent)?;
                    self.out.push_str(&rendered);
                    self.out.push('\n');
                }
            }
        }
        Ok(())
    }

    fn pad(&mut self, indent: usize) {
        self.out.extend(std::iter::repeat_n(' ', indent));
    }

    fn column(&self) -> usize {
        let line_start = self.out.rfind('\n').map_or(0, |p| p + 1);
        self.out[line_start..].chars().count()
    }

    /// Renders a scalar written after the current line prefix. Block
    /// scalars indent their content one level below `indent`.
    fn scalar(&self, value: &Value, indent: usize) -> Result<String, SerializationError> {
        match value {
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(self.string(s, indent)),
            Value::Mapping(_) => Ok("{}".to_string()),
            Value::Sequence(_) => Ok("[]".to_string()),
            Value::Tagged(tagged) => Err(SerializationError::new(format!(
                "tagged value {} is not supported",
                tagged.tag
            ))),
        }
    }

    fn string(&self, s: &str, indent: usize) -> String {
        let content_indent = indent + INDENT;
        if s.contains('\n') {
            return literal_block(s, content_indent).unwrap_or_else(|| double_quoted(s));
        }
        if !is_plain_safe(s) {
            return double_quoted(s);
        }
        if self.column() + s.chars().count() > self.line_width {
            let width = self.line_width.saturating_sub(content_indent);
            if let Some(folded) = folded_block(s, width, content_indent) {
                return folded;
            }
        }
        s.to_string()
    }
}

fn render_key(key: &Value) -> Result<String, SerializationError> {
    match key {
        Value::String(s) if is_plain_safe(s) => Ok(s.clone()),
        Value::String(s) => Ok(double_quoted(s)),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        _ => Err(SerializationError::new("mapping keys must be scalars")),
    }
}

/// Characters a plain or block scalar cannot carry verbatim.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FEFF}')
}

/// Check whether `s` can be written unquoted and read back unchanged.
fn is_plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if first.is_whitespace() || s.ends_with(char::is_whitespace) {
        return false;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if s.chars().any(needs_escape) {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    if LEGACY_BOOLEANS.iter().any(|w| s.eq_ignore_ascii_case(w)) {
        return false;
    }
    matches!(serde_yaml::from_str::<Value>(s), Ok(Value::String(parsed)) if parsed == s)
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if needs_escape(c) => {
                let code = u32::from(c);
                if code <= 0xFF {
                    out.push_str(&format!("\\x{code:02X}"));
                } else {
                    out.push_str(&format!("\\u{code:04X}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Renders a multi-line string as a literal block, or `None` when the
/// text cannot survive literal style.
fn literal_block(s: &str, content_indent: usize) -> Option<String> {
    if s.chars().any(|c| c != '\n' && needs_escape(c)) {
        return None;
    }
    let body = s.trim_end_matches('\n');
    let trailing = s.len() - body.len();
    // Block indentation is taken from the first non-empty line.
    let first_content = body.split('\n').find(|line| !line.is_empty());
    if first_content.is_none_or(|line| line.starts_with(' ')) {
        return None;
    }
    let (chomp, lines) = match trailing {
        0 => ("-", body),
        1 => ("", body),
        _ => ("+", &s[..s.len() - 1]),
    };

    let pad = " ".repeat(content_indent);
    let mut out = format!("|{chomp}");
    for line in lines.split('\n') {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
    }
    Some(out)
}

/// Folds a long single-line string at single spaces, or `None` when no
/// break keeps the text intact.
fn folded_block(s: &str, width: usize, content_indent: usize) -> Option<String> {
    let bytes = s.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut last_break: Option<usize> = None;

    for (i, _) in s.match_indices(' ') {
        let single = i > 0 && bytes[i - 1] != b' ' && bytes.get(i + 1).is_some_and(|b| *b != b' ');
        if !single {
            continue;
        }
        if s[start..i].chars().count() > width {
            if let Some(b) = last_break.filter(|b| *b > start) {
                lines.push(&s[start..b]);
                start = b + 1;
            }
        }
        last_break = Some(i);
    }
    if s[start..].chars().count() > width {
        if let Some(b) = last_break.filter(|b| *b > start) {
            lines.push(&s[start..b]);
            start = b + 1;
        }
    }
    lines.push(&s[start..]);

    if lines.len() < 2 {
        return None;
    }

    let pad = " ".repeat(content_indent);
    let mut out = String::from(">-");
    for line in lines {
        out.push('\n');
        out.push_str(&pad);
        out.push_str(line);
    }
    Some(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_yaml::value::{Tag, TaggedValue};
    use wexcfg_domain::{ConfigurationDocument, normalize, template};

    fn emit<T: Serialize>(value: &T) -> String {
        to_yaml(value, DEFAULT_LINE_WIDTH).expect("serialization should work")
    }

    #[test]
    fn test_nested_mappings_use_two_space_indent() {
        let value: Value = serde_yaml::from_str("a:\n  b:\n    c: 1\n").unwrap();
        assert_eq!(emit(&value), "a:\n  b:\n    c: 1\n");
    }

    #[test]
    fn test_sequences_are_indented_under_their_key() {
        let value: Value =
            serde_yaml::from_str("items:\n- name: one\n  raw: a.txt\n- name: two\ncodes: [200, 302]\n")
                .unwrap();
        assert_eq!(
            emit(&value),
            "items:\n  - name: one\n    raw: a.txt\n  - name: two\ncodes:\n  - 200\n  - 302\n"
        );
    }

    #[test]
    fn test_empty_collections_are_inline() {
        let value: Value = serde_yaml::from_str("a: {}\nb: []\n").unwrap();
        assert_eq!(emit(&value), "a: {}\nb: []\n");
    }

    #[test]
    fn test_strings_quoted_only_when_ambiguous() {
        let cases = [
            ("WebApp Pentest", "WebApp Pentest"),
            ("1.0.0", "1.0.0"),
            ("./requests", "./requests"),
            ("http://127.0.0.1:8080", "http://127.0.0.1:8080"),
            ("Bearer {{api_token}}", "Bearer {{api_token}}"),
            ("", "\"\""),
            ("true", "\"true\""),
            ("Yes", "\"Yes\""),
            ("null", "\"null\""),
            ("42", "\"42\""),
            ("0.5", "\"0.5\""),
            ("key: value", "\"key: value\""),
            ("a #comment", "\"a #comment\""),
            ("{{token}}", "\"{{token}}\""),
            ("*", "\"*\""),
            (" padded", "\" padded\""),
            ("tab\there", "\"tab\\there\""),
            ("say \"hi\"", "say \"hi\""),
            ("a\u{2028}b", "\"a\\Lb\""),
            ("a\u{2029}b", "\"a\\Pb\""),
            ("\u{FEFF}bom", "\"\\uFEFFbom\""),
        ];
        for (input, expected) in cases {
            let mut map = Mapping::new();
            map.insert(Value::from("k"), Value::from(input));
            assert_eq!(emit(&map), format!("k: {expected}\n"), "input: {input:?}");
        }
    }

    #[test]
    fn test_multiline_strings_use_literal_blocks() {
        let mut map = Mapping::new();
        map.insert(Value::from("clip"), Value::from("line one\nline two\n"));
        map.insert(Value::from("strip"), Value::from("a\n\nb"));
        map.insert(Value::from("keep"), Value::from("a\n\n"));
        map.insert(Value::from("blank_first"), Value::from("\nsecond"));
        map.insert(Value::from("indented_first"), Value::from("\n  indented second"));
        let yaml = emit(&map);

        assert_eq!(
            yaml,
            "clip: |\n  line one\n  line two\nstrip: |-\n  a\n\n  b\nkeep: |+\n  a\n\n\
             blank_first: |-\n\n  second\nindented_first: \"\\n  indented second\"\n"
        );
        let back: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_long_keys_use_explicit_key_syntax() {
        let key = "k".repeat(1100);
        let mut map = Mapping::new();
        map.insert(Value::from(key.clone()), Value::from("v"));
        map.insert(Value::from("short"), Value::from("w"));
        let yaml = emit(&map);

        assert_eq!(yaml, format!("? {key}\n: v\nshort: w\n"));
        let back: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_awkward_strings_read_back_unchanged() {
        let long_words = vec!["word"; 40].join(" ");
        let awkward = [
            "",
            " ",
            "\n",
            "\n\n",
            "\n  indented second",
            "  leading\nlines",
            "first\n  indented\n",
            "  \nafter blank spaces",
            "trailing spaces  \nnext  ",
            "a\u{2028}b",
            "line\u{2029}para",
            "\u{FEFF}bom",
            "nel\u{85}here",
            "tab\tand\r\nreturn",
            "- dash",
            "? question",
            "#hash",
            "ends with colon:",
            "0x1F",
            "1e3",
            ".inf",
            "~",
            "NO",
            "'single'",
            "back\\slash \"quote\"",
            long_words.as_str(),
        ];

        for text in awkward {
            let mut map = Mapping::new();
            map.insert(Value::from("value"), Value::from(text));
            map.insert(Value::from(text), Value::from("as key"));
            let nested = Value::Sequence(vec![Value::Mapping(map.clone()), Value::from(text)]);

            for value in [Value::Mapping(map.clone()), nested] {
                let yaml = emit(&value);
                let back: Value = serde_yaml::from_str(&yaml)
                    .unwrap_or_else(|e| panic!("{text:?} produced unparsable YAML {yaml:?}: {e}"));
                assert_eq!(back, value, "text {text:?} emitted as {yaml:?}");
            }
        }
    }

    #[test]
    fn test_multiline_with_leading_space_is_quoted() {
        let mut map = Mapping::new();
        map.insert(Value::from("k"), Value::from("  indented\nnext"));
        assert_eq!(emit(&map), "k: \"  indented\\nnext\"\n");
    }

    #[test]
    fn test_long_strings_fold_at_line_width() {
        let words = vec!["word"; 40].join(" ");
        let mut map = Mapping::new();
        map.insert(Value::from("description"), Value::from(words.clone()));
        let yaml = emit(&map);

        assert!(yaml.starts_with("description: >-\n  word"));
        assert!(yaml.lines().all(|line| line.chars().count() <= DEFAULT_LINE_WIDTH));
        let back: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.get("description"), Some(&Value::from(words)));
    }

    #[test]
    fn test_long_string_without_breaks_stays_on_one_line() {
        let url = format!("http://example.com/{}", "a".repeat(150));
        let mut map = Mapping::new();
        map.insert(Value::from("url"), Value::from(url.clone()));
        assert_eq!(emit(&map), format!("url: {url}\n"));
    }

    #[test]
    fn test_tagged_values_are_rejected() {
        let mut map = Mapping::new();
        map.insert(
            Value::from("k"),
            Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new("custom"),
                value: Value::from(1),
            })),
        );
        let err = value_to_yaml(&Value::Mapping(map), DEFAULT_LINE_WIDTH).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate YAML: tagged value !custom is not supported"
        );
    }

    #[test]
    fn test_default_document_layout() {
        let canonical = normalize(&ConfigurationDocument::default());
        let yaml = YamlSerializer::new().serialize(&canonical).unwrap();
        assert_eq!(
            yaml,
            "\
project:
  name: WebApp Pentest
  description: Web application penetration testing assessment
  version: 1.0.0
network:
  verify_ssl: true
  timeout: 30
  max_retries: 3
  user_agent: WexBloit/2.0
execution:
  max_parallel_flows: 3
  default_delay: 0.0
raw_requests_path: ./requests
output:
  format: html
  path: ./reports
  verbose: true
"
        );
    }

    #[test]
    fn test_templates_round_trip_through_yaml() {
        for id in ["basic", "advanced", "api", "webapp"] {
            let canonical = normalize(&template(id));
            let yaml = YamlSerializer::new().serialize(&canonical).unwrap();
            let back: CanonicalDocument = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(back, canonical, "template {id}");
        }
    }

    #[test]
    fn test_media_type() {
        assert_eq!(YamlSerializer::default().media_type(), "text/yaml");
    }
}
