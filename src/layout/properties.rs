//! Property extraction from service body lines.
//!
//! A property line is `key = value`, optionally followed by a `#` comment.
//! Everything else (blank lines, comments, free text) is opaque and passed
//! through untouched.
use std::collections::BTreeMap;

/// Key/value properties of a service block.
pub type Properties = BTreeMap<String, String>;

/// Prefix written in front of a line to disable it.
pub const DISABLE_MARKER: &str = "# ";

/// Parse a `key = value` line, ignoring anything from the first `#` onward.
///
/// Returns `None` for opaque lines: no `=` before the comment, or an empty
/// key.
///
/// # Examples
///
/// ```
/// use layout_cli::layout::properties::parse_line;
///
/// assert_eq!(parse_line("path = /data1"), Some(("path", "/data1")));
/// assert_eq!(parse_line("url=a=b # note"), Some(("url", "a=b")));
/// assert_eq!(parse_line("# path=/old"), None);
/// assert_eq!(parse_line("free text"), None);
/// ```
#[must_use]
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let content = line.split_once('#').map_or(line, |(before, _)| before);
    let (key, value) = content.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Whether `key=value` reads back through [`parse_line`] as exactly this
/// property.
///
/// It does not when either side holds `#`, a line break or surrounding
/// whitespace, when the key holds `=`, or when the key opens with `[`.
///
/// # Examples
///
/// ```
/// use layout_cli::layout::properties::is_writable;
///
/// assert!(is_writable("args", "-Dfoo=bar"));
/// assert!(!is_writable("tag", "a#b"));
/// assert!(!is_writable("note", " padded"));
/// ```
#[must_use]
pub fn is_writable(key: &str, value: &str) -> bool {
    let line = format!("{key}={value}");
    !line.contains(['\n', '\r']) && !key.starts_with('[') && parse_line(&line) == Some((key, value))
}

/// Derive the property map of a block of lines.
///
/// Duplicate keys keep their first definition; later duplicates are left
/// for the serializer to disable.
#[must_use]
pub fn derive<'a>(lines: impl IntoIterator<Item = &'a str>) -> Properties {
    let mut properties = Properties::new();
    for line in lines {
        if let Some((key, value)) = parse_line(line) {
            properties
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    properties
}

/// Whether a line carries a disable marker.
#[must_use]
pub fn is_disabled(line: &str) -> bool {
    line.starts_with('#')
}

/// Whether a line is blank (empty or whitespace only).
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Remove one disable marker (`"# "` or a bare `"#"`) from a line.
#[must_use]
pub fn strip_marker(line: &str) -> &str {
    line.strip_prefix(DISABLE_MARKER)
        .or_else(|| line.strip_prefix('#'))
        .unwrap_or(line)
}

/// Prefix a line with the disable marker.
#[must_use]
pub fn disable(line: &str) -> String {
    format!("{DISABLE_MARKER}{line}")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_trims_key_and_value() {
        assert_eq!(parse_line("  size =  20G  "), Some(("size", "20G")));
    }

    #[test]
    fn parse_line_splits_at_first_equals() {
        assert_eq!(
            parse_line("args=-Dfoo=bar -Dx=y"),
            Some(("args", "-Dfoo=bar -Dx=y"))
        );
    }

    #[test]
    fn parse_line_strips_comment_without_whitespace() {
        assert_eq!(parse_line("port=22125#dcap"), Some(("port", "22125")));
    }

    #[test]
    fn parse_line_equals_only_inside_comment_is_opaque() {
        assert_eq!(parse_line("note # a=b"), None);
    }

    #[test]
    fn parse_line_empty_key_is_opaque() {
        assert_eq!(parse_line("=value"), None);
    }

    #[test]
    fn parse_line_empty_value_is_a_property() {
        assert_eq!(parse_line("lfs="), Some(("lfs", "")));
    }

    #[test]
    fn writable_properties_survive_a_reparse() {
        assert!(is_writable("path", "/data1"));
        assert!(is_writable("lfs", ""));
        assert!(is_writable("url", "a=b"));
        assert!(is_writable("Host Name", "h1"));
    }

    #[test]
    fn unwritable_properties() {
        assert!(!is_writable("tag", "a#b"));
        assert!(!is_writable("#tag", "a"));
        assert!(!is_writable("a=b", "c"));
        assert!(!is_writable("", "c"));
        assert!(!is_writable(" key", "c"));
        assert!(!is_writable("key", "c "));
        assert!(!is_writable("key", "line\nbreak"));
        assert!(!is_writable("key", "cr\rhere"));
        assert!(!is_writable("[d", "x]"));
    }

    #[test]
    fn derive_keeps_first_definition() {
        let props = derive(["a=1", "b=2", "a=3"]);
        assert_eq!(props.get("a").map(String::as_str), Some("1"));
        assert_eq!(props.get("b").map(String::as_str), Some("2"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn derive_skips_opaque_and_disabled_lines() {
        let props = derive(["", "# a=1", "comment", "c = 3"]);
        assert_eq!(props.len(), 1);
        assert_eq!(props["c"], "3");
    }

    #[test]
    fn keys_are_case_sensitive() {
        let props = derive(["Path=/a", "path=/b"]);
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn strip_marker_variants() {
        assert_eq!(strip_marker("# a=1"), "a=1");
        assert_eq!(strip_marker("#a=1"), "a=1");
        assert_eq!(strip_marker("# # note"), "# note");
        assert_eq!(strip_marker("a=1"), "a=1");
    }

    #[test]
    fn disable_then_strip_restores_line() {
        assert_eq!(strip_marker(&disable("host=h1")), "host=h1");
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   \t"));
        assert!(!is_blank(" x "));
    }
}
