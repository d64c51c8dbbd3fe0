//! Layout file parser.
//!
//! Format:
//! ```text
//! [dCacheDomain]
//! preamble lines
//!
//! [dCacheDomain/admin]
//! host=head.example.org
//! # disabled=line
//! ```
//!
//! A header is any line that starts with `[` and ends with `]`. Every other
//! line belongs to the block opened by the preceding header; lines before the
//! first header form the preamble.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::model::{Domain, LayoutDocument, LineEnding, Service};
use crate::error::{DocumentError, ParseError};

/// The block that collects body lines until the next header.
enum Block {
    Preamble,
    Domain,
    Service(String),
}

/// A parsed `[domain]` or `[domain/service]` header.
struct Header<'a> {
    domain: &'a str,
    service: Option<&'a str>,
}

impl<'a> Header<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let inner = line.strip_prefix('[')?.strip_suffix(']')?;
        let (domain, service) = inner
            .split_once('/')
            .map_or((inner, None), |(domain, service)| (domain, Some(service)));
        Some(Self { domain, service })
    }
}

/// Read and parse a layout file.
///
/// Returns the text as read next to the parsed document. A missing file is
/// the first-run case: no text and an empty document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is structurally malformed;
/// the error names the file and the offending line.
pub fn read_file(path: &Path) -> Result<(Option<String>, LayoutDocument)> {
    if !path.exists() {
        return Ok((None, LayoutDocument::new()));
    }
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let doc = parse_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok((Some(content), doc))
}

/// Parse layout text into a document.
///
/// The terminator of the first line, `\n` or `\r\n`, is remembered for
/// serialization.
///
/// # Examples
///
/// ```
/// use layout_cli::layout::parser::parse_str;
///
/// let doc = parse_str("[dCacheDomain]\n[dCacheDomain/admin]\nhost=h1\n").unwrap();
/// let domain = doc.domain("dCacheDomain").unwrap();
/// assert_eq!(domain.services[0].name(), "admin");
/// assert_eq!(domain.services[0].properties["host"], "h1");
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] for a repeated or empty-service header in the
/// current domain, an empty domain name, a service header before its domain
/// header, or a domain defined twice.
pub fn parse_str(content: &str) -> Result<LayoutDocument, ParseError> {
    let mut doc = LayoutDocument::new();
    doc.set_line_ending(LineEnding::detect(content));
    let mut block = Block::Preamble;
    let mut current: Option<&str> = None;
    let mut lines: Vec<String> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let Some(header) = Header::parse(line) else {
            lines.push(line.to_string());
            continue;
        };
        let line_num = idx + 1;

        flush(&mut doc, block, std::mem::take(&mut lines));

        if header.domain.is_empty() {
            return Err(ParseError::MalformedHeader {
                line: line_num,
                header: line.to_string(),
            });
        }

        if current == Some(header.domain) {
            match header.service {
                Some(service) if !service.is_empty() => {
                    block = Block::Service(service.to_string());
                }
                _ => {
                    return Err(ParseError::MissingServiceName {
                        line: line_num,
                        header: line.to_string(),
                        domain: header.domain.to_string(),
                    });
                }
            }
        } else {
            if header.service.is_some() {
                return Err(ParseError::OrphanService {
                    line: line_num,
                    header: line.to_string(),
                    domain: header.domain.to_string(),
                });
            }
            doc.add_domain(Domain::new(header.domain))
                .map_err(|DocumentError::DuplicateDomain(name)| {
                    ParseError::DuplicateDomain {
                        line: line_num,
                        name,
                    }
                })?;
            current = Some(header.domain);
            block = Block::Domain;
        }
    }

    flush(&mut doc, block, lines);
    Ok(doc)
}

/// Store the lines collected for `block` in the document.
fn flush(doc: &mut LayoutDocument, block: Block, lines: Vec<String>) {
    match block {
        Block::Preamble => {
            if !lines.is_empty() {
                doc.push_preamble(lines);
            }
        }
        Block::Domain => {
            if let Some(domain) = doc.last_domain_mut() {
                domain.raw_lines = lines;
            }
        }
        Block::Service(name) => {
            if let Some(domain) = doc.last_domain_mut() {
                domain.push_service(Service::from_lines(name, lines));
            }
        }
    }
}
