//! Render a layout document back to text.
//!
//! Lines are never dropped: a line that no longer reflects the desired state
//! is disabled with the `"# "` marker, and a commented service has every
//! non-blank line disabled. A service that stays disabled is written exactly
//! as it was read.
use std::collections::BTreeSet;

use super::model::{Domain, LayoutDocument, Service};
use super::properties::{self, is_blank};

/// Render the whole document.
///
/// Lines are joined with the document's [line ending](LayoutDocument::line_ending)
/// and the result ends with one unless the document is empty.
///
/// # Examples
///
/// ```
/// use layout_cli::layout::parser::parse_str;
/// use layout_cli::layout::serializer::to_string;
///
/// let text = "[info]\n\n[info/info]\nhost=h1\n";
/// assert_eq!(to_string(&parse_str(text).unwrap()), text);
/// ```
#[must_use]
pub fn to_string(doc: &LayoutDocument) -> String {
    let lines = render(doc);
    if lines.is_empty() {
        return String::new();
    }
    let eol = doc.line_ending().as_str();
    let mut out = lines.join(eol);
    out.push_str(eol);
    out
}

/// Render the document as a list of lines.
#[must_use]
pub fn render(doc: &LayoutDocument) -> Vec<String> {
    let mut out = Vec::new();
    for domain in doc.domains() {
        render_domain(domain, &mut out);
    }
    out
}

fn render_domain(domain: &Domain, out: &mut Vec<String>) {
    if let Some(name) = domain.name() {
        out.push(format!("[{name}]"));
    }
    out.extend(domain.raw_lines.iter().cloned());

    let name = domain.name().unwrap_or_default();
    for service in &domain.services {
        out.push(format!("[{name}/{}]", service.name()));
        out.extend(render_service(service));
    }
}

/// How a stored line is emitted.
enum Emit<'a> {
    /// Reproduced: an opaque line, or a property line that still matches.
    Keep { raw: &'a str, content: &'a str },
    /// A property line that no longer matches; disabled.
    Disable(&'a str),
    /// A property that has no matching line yet.
    Append(String),
}

/// Render the body lines of one service.
fn render_service(service: &Service) -> Vec<String> {
    if service.is_commented() && service.disabled_in_source() {
        return service.raw_lines().to_vec();
    }

    let mut keys_done: BTreeSet<&str> = BTreeSet::new();
    let mut body: Vec<Emit<'_>> = Vec::with_capacity(service.raw_lines().len());

    for raw in service.raw_lines() {
        let content = service.content_of(raw);
        let emit = match properties::parse_line(content) {
            Some((key, value)) => {
                let wanted = service.properties.get(key).map(String::as_str);
                if wanted == Some(value) && keys_done.insert(key) {
                    Emit::Keep { raw, content }
                } else {
                    Emit::Disable(content)
                }
            }
            None => Emit::Keep { raw, content },
        };
        body.push(emit);
    }

    // New lines go after the last non-blank line so that trailing blank
    // separators stay at the end of the block.
    let insert_at = body
        .iter()
        .rposition(|emit| !matches!(emit, Emit::Keep { raw, .. } if is_blank(raw)))
        .map_or(0, |pos| pos + 1);
    let appended: Vec<Emit<'_>> = service
        .properties
        .iter()
        .filter(|(key, _)| !keys_done.contains(key.as_str()))
        .map(|(key, value)| Emit::Append(format!("{key}={value}")))
        .collect();
    body.splice(insert_at..insert_at, appended);

    body.into_iter()
        .map(|emit| emit_line(service, emit))
        .collect()
}

fn emit_line(service: &Service, emit: Emit<'_>) -> String {
    let enabled = match emit {
        Emit::Keep { raw, .. } if is_blank(raw) => return raw.to_string(),
        Emit::Keep { content, .. } => content.to_string(),
        Emit::Disable(content) => properties::disable(content),
        Emit::Append(line) => line,
    };

    if service.is_commented() && !is_blank(&enabled) {
        properties::disable(&enabled)
    } else {
        enabled
    }
}
