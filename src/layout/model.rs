//! In-memory layout document: domains owning services owning their lines.
use crate::error::DocumentError;

use super::properties::{self, Properties};

/// Property key holding the service type of a wanted service.
pub const TYPE_KEY: &str = "type";

/// Property key holding the host of a wanted service.
pub const HOST_KEY: &str = "host";

/// Line terminator of a layout file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// The terminator of the first line of `text`; [`Lf`](Self::Lf) when
    /// the text has no line break.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_cli::layout::model::LineEnding;
    ///
    /// assert_eq!(LineEnding::detect("[d]\r\n[d/admin]\r\n"), LineEnding::CrLf);
    /// assert_eq!(LineEnding::detect("[d]\n"), LineEnding::Lf);
    /// ```
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text
            .split_once('\n')
            .is_some_and(|(first, _)| first.ends_with('\r'))
        {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    /// The terminator itself.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// A parsed layout file: an ordered sequence of domains.
///
/// Domain names are unique; the only unnamed domain is the preamble holding
/// lines that precede the first header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutDocument {
    domains: Vec<Domain>,
    line_ending: LineEnding,
}

impl LayoutDocument {
    /// Create an empty document (first run, no layout file yet).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            domains: Vec::new(),
            line_ending: LineEnding::Lf,
        }
    }

    /// Line terminator used when the document is written.
    #[must_use]
    pub const fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the line terminator used when the document is written.
    pub const fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// All domains in file order.
    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Mutable access to the domains.
    ///
    /// Returned as a slice so that callers cannot bypass the uniqueness
    /// check of [`add_domain`](Self::add_domain).
    pub fn domains_mut(&mut self) -> &mut [Domain] {
        &mut self.domains
    }

    /// Whether the document has no domains at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Look up a named domain.
    #[must_use]
    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name() == Some(name))
    }

    /// Look up a named domain for mutation.
    pub fn domain_mut(&mut self, name: &str) -> Option<&mut Domain> {
        self.domains.iter_mut().find(|d| d.name() == Some(name))
    }

    /// Append a domain.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateDomain`] if a domain with the same
    /// name already exists (or, for a preamble, if a preamble exists).
    pub fn add_domain(&mut self, domain: Domain) -> Result<(), DocumentError> {
        if self.domains.iter().any(|d| d.name == domain.name) {
            return Err(DocumentError::DuplicateDomain(
                domain.name.unwrap_or_default(),
            ));
        }
        self.domains.push(domain);
        Ok(())
    }

    /// Put the lines preceding the first header in front of every domain.
    pub(super) fn push_preamble(&mut self, raw_lines: Vec<String>) {
        self.domains.insert(0, Domain::preamble(raw_lines));
    }

    pub(super) fn last_domain_mut(&mut self) -> Option<&mut Domain> {
        self.domains.last_mut()
    }
}

/// A named group of services, or the unnamed preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    name: Option<String>,
    /// Lines between the domain header and its first service header.
    pub raw_lines: Vec<String>,
    /// Services in file order.
    pub services: Vec<Service>,
}

impl Domain {
    /// Create an empty named domain.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            raw_lines: Vec::new(),
            services: Vec::new(),
        }
    }

    /// Create the unnamed block holding lines before the first header.
    #[must_use]
    pub const fn preamble(raw_lines: Vec<String>) -> Self {
        Self {
            name: None,
            raw_lines,
            services: Vec::new(),
        }
    }

    /// Domain name, `None` for the preamble.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// A domain is commented when all of its services are (vacuously true
    /// for a domain without services).
    #[must_use]
    pub fn is_commented(&self) -> bool {
        self.services.iter().all(Service::is_commented)
    }

    /// Comment out every service in the domain.
    ///
    /// There is no inverse: enabling services is done per service.
    pub fn comment_out(&mut self) {
        for service in &mut self.services {
            service.set_commented(true);
        }
    }

    /// Append a service to the domain.
    pub fn push_service(&mut self, service: Service) {
        self.services.push(service);
    }
}

/// A single service block.
///
/// `raw_lines` are kept exactly as read; the serializer decides per line
/// whether it is reproduced, disabled, or re-enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    name: String,
    raw_lines: Vec<String>,
    /// Desired properties; the serializer brings the lines in line with them.
    pub properties: Properties,
    commented: bool,
    /// Every non-blank line of `raw_lines` carries a disable marker.
    disabled_in_source: bool,
    /// Disabled in the source and holding at least one disabled property,
    /// so the block is a commented service rather than a note.
    marked_in_source: bool,
}

impl Service {
    /// Create a new, enabled service carrying `properties`.
    ///
    /// The block starts with a single blank separator line; property lines
    /// are written in front of it on serialization.
    #[must_use]
    pub fn new(name: impl Into<String>, properties: Properties) -> Self {
        Self {
            name: name.into(),
            raw_lines: vec![String::new()],
            properties,
            commented: false,
            disabled_in_source: false,
            marked_in_source: false,
        }
    }

    /// Build a service from the body lines of a parsed block.
    ///
    /// A block whose non-blank lines all carry the disable marker, at least
    /// one of them a disabled `key=value`, is a commented service; its
    /// properties are read from the lines with one marker removed. A block
    /// holding only comments is an enabled service without properties.
    #[must_use]
    pub fn from_lines(name: impl Into<String>, raw_lines: Vec<String>) -> Self {
        let content: Vec<&str> = raw_lines
            .iter()
            .map(String::as_str)
            .filter(|l| !properties::is_blank(l))
            .collect();
        let disabled = !content.is_empty() && content.iter().all(|l| properties::is_disabled(l));
        let marked = disabled
            && content
                .iter()
                .any(|l| properties::parse_line(properties::strip_marker(l)).is_some());

        let properties = if marked {
            properties::derive(raw_lines.iter().map(|l| properties::strip_marker(l)))
        } else {
            properties::derive(raw_lines.iter().map(String::as_str))
        };

        Self {
            name: name.into(),
            raw_lines,
            properties,
            commented: marked,
            disabled_in_source: disabled,
            marked_in_source: marked,
        }
    }

    /// Service type (the part after `/` in the header).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body lines as read from the file.
    #[must_use]
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// Whether the service is disabled.
    #[must_use]
    pub const fn is_commented(&self) -> bool {
        self.commented
    }

    /// Enable or disable the service.
    pub const fn set_commented(&mut self, commented: bool) {
        self.commented = commented;
    }

    /// Whether the block was a commented service in the source.
    #[must_use]
    pub const fn marked_in_source(&self) -> bool {
        self.marked_in_source
    }

    /// Whether every non-blank source line was already disabled, so that a
    /// disabled service can be written back exactly as read.
    #[must_use]
    pub const fn disabled_in_source(&self) -> bool {
        self.disabled_in_source
    }

    /// The enabled form of a raw line: the line itself, or with one disable
    /// marker removed when the block was commented in the source.
    #[must_use]
    pub fn content_of<'a>(&self, raw: &'a str) -> &'a str {
        if self.marked_in_source && properties::is_disabled(raw) {
            properties::strip_marker(raw)
        } else {
            raw
        }
    }
}

/// A service that should exist on a host.
///
/// All descriptors live in one property map; `type` and `host` identify the
/// service but do not take part in matching (see
/// [`matcher::matches`](super::matcher::matches)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WantedService {
    properties: Properties,
}

impl WantedService {
    /// Create a descriptor for `service_type` on `host`.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_cli::layout::WantedService;
    ///
    /// let pool = WantedService::new("pool", "pool1.example.org").with_property("path", "/data1");
    /// assert_eq!(pool.service_type(), "pool");
    /// assert_eq!(pool.host(), "pool1.example.org");
    /// assert_eq!(pool.get("path"), Some("/data1"));
    /// ```
    #[must_use]
    pub fn new(service_type: impl Into<String>, host: impl Into<String>) -> Self {
        let mut properties = Properties::new();
        properties.insert(TYPE_KEY.to_string(), service_type.into());
        properties.insert(HOST_KEY.to_string(), host.into());
        Self { properties }
    }

    /// Add an extra property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Build a descriptor from a full property map.
    ///
    /// Returns `None` unless both `type` and `host` are present.
    #[must_use]
    pub fn from_properties(properties: Properties) -> Option<Self> {
        (properties.contains_key(TYPE_KEY) && properties.contains_key(HOST_KEY))
            .then_some(Self { properties })
    }

    /// Service type.
    #[must_use]
    pub fn service_type(&self) -> &str {
        self.get(TYPE_KEY).unwrap_or_default()
    }

    /// Host the service is wanted on.
    #[must_use]
    pub fn host(&self) -> &str {
        self.get(HOST_KEY).unwrap_or_default()
    }

    /// Look up a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All properties, `type` and `host` included.
    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn add_domain_rejects_duplicates() {
        let mut doc = LayoutDocument::new();
        doc.add_domain(Domain::new("dCacheDomain")).unwrap();
        let err = doc.add_domain(Domain::new("dCacheDomain")).unwrap_err();
        assert_eq!(err, DocumentError::DuplicateDomain("dCacheDomain".to_string()));
        assert_eq!(doc.domains().len(), 1);
    }

    #[test]
    fn domain_lookup_ignores_preamble() {
        let mut doc = LayoutDocument::new();
        doc.add_domain(Domain::preamble(lines(&["# header"]))).unwrap();
        doc.add_domain(Domain::new("info")).unwrap();
        assert!(doc.domain("info").is_some());
        assert!(doc.domain("").is_none());
        assert_eq!(doc.domains()[0].name(), None);
    }

    #[test]
    fn empty_domain_counts_as_commented() {
        assert!(Domain::new("replica").is_commented());
    }

    #[test]
    fn domain_commented_only_when_all_services_are() {
        let mut domain = Domain::new("dCacheDomain");
        domain.push_service(Service::new("admin", Properties::new()));
        domain.push_service(Service::from_lines("gplazma", lines(&["# host=h1"])));
        assert!(!domain.is_commented());

        domain.comment_out();
        assert!(domain.is_commented());
        assert!(domain.services.iter().all(Service::is_commented));
    }

    #[test]
    fn preamble_goes_before_existing_domains() {
        let mut doc = LayoutDocument::new();
        doc.add_domain(Domain::new("info")).unwrap();
        doc.push_preamble(lines(&["# generated"]));
        assert_eq!(doc.domains()[0].name(), None);
        assert_eq!(doc.domains()[1].name(), Some("info"));
    }

    #[test]
    fn line_ending_detection_uses_first_line() {
        assert_eq!(LineEnding::detect(""), LineEnding::Lf);
        assert_eq!(LineEnding::detect("no newline\r"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\r\nb\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    }

    #[test]
    fn from_lines_detects_commented_block() {
        let service = Service::from_lines(
            "pnfsmanager",
            lines(&["# host=h1", "#type=pnfsmanager", ""]),
        );
        assert!(service.is_commented());
        assert!(service.marked_in_source());
        assert!(service.disabled_in_source());
        assert_eq!(service.properties["host"], "h1");
        assert_eq!(service.properties["type"], "pnfsmanager");
    }

    #[test]
    fn from_lines_comment_only_block_is_enabled() {
        let service = Service::from_lines("gplazma", lines(&["# uses site defaults", ""]));
        assert!(!service.is_commented());
        assert!(!service.marked_in_source());
        assert!(service.disabled_in_source());
        assert!(service.properties.is_empty());
        assert_eq!(service.content_of("# uses site defaults"), "# uses site defaults");
    }

    #[test]
    fn from_lines_disabled_duplicates_keep_first_value() {
        let service = Service::from_lines("admin", lines(&["# a=1", "# a=2"]));
        assert!(service.is_commented());
        assert_eq!(service.properties["a"], "1");
    }

    #[test]
    fn from_lines_mixed_block_is_enabled() {
        let service = Service::from_lines("admin", lines(&["# old=1", "host=h1"]));
        assert!(!service.is_commented());
        assert_eq!(service.properties.len(), 1);
    }

    #[test]
    fn from_lines_blank_block_is_enabled() {
        let service = Service::from_lines("admin", lines(&["", ""]));
        assert!(!service.is_commented());
        assert!(service.properties.is_empty());
    }

    #[test]
    fn content_of_strips_marker_only_for_marked_blocks() {
        let marked = Service::from_lines("admin", lines(&["# host=h1"]));
        assert_eq!(marked.content_of("# host=h1"), "host=h1");

        let enabled = Service::from_lines("admin", lines(&["host=h1", "# note"]));
        assert_eq!(enabled.content_of("# note"), "# note");
    }

    #[test]
    fn wanted_service_from_properties_requires_identity() {
        let mut props = Properties::new();
        props.insert("type".to_string(), "admin".to_string());
        assert!(WantedService::from_properties(props.clone()).is_none());

        props.insert("host".to_string(), "h1".to_string());
        let wanted = WantedService::from_properties(props).unwrap();
        assert_eq!(wanted.service_type(), "admin");
        assert_eq!(wanted.host(), "h1");
    }
}
