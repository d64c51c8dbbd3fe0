//! Domain-specific error types for the layout engine.
//!
//! Internal modules return typed errors (e.g., [`ParseError`],
//! [`ReconcileError`]) while command handlers at the CLI boundary convert
//! them to [`anyhow::Error`] via the standard `?` operator and attach the
//! file path with `anyhow::Context`.
//!
//! # Error hierarchy
//!
//! ```text
//! LayoutError
//! ├── Parse(ParseError)          : malformed layout file structure
//! ├── Document(DocumentError)    : invalid programmatic document edits
//! └── Reconcile(ReconcileError)  : wanted services that cannot be placed
//!
//! ConfigError                    : invalid site configuration entries
//! ```

use thiserror::Error;

/// Top-level error type for the layout engine.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The layout file is structurally malformed.
    #[error("Layout parse error: {0}")]
    Parse(#[from] ParseError),

    /// A document edit violated a model invariant.
    #[error("Layout document error: {0}")]
    Document(#[from] DocumentError),

    /// A wanted service could not be reconciled into the document.
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),
}

/// Structural errors found while parsing a layout file.
///
/// Line numbers are 1-based and refer to the header line of the offending
/// block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A header for the current domain lacks the `/service` part, e.g. a
    /// repeated `[domain]` header or an empty `[domain/]`.
    #[error("line {line}: service header {header} is shorter than [{domain}/<service>]")]
    MissingServiceName {
        /// Line number of the header.
        line: usize,
        /// The header as written.
        header: String,
        /// Domain the header belongs to.
        domain: String,
    },

    /// A header with an empty domain portion.
    #[error("line {line}: malformed header {header}: empty domain name")]
    MalformedHeader {
        /// Line number of the header.
        line: usize,
        /// The header as written.
        header: String,
    },

    /// A service header whose domain was never opened by a `[domain]` header.
    #[error("line {line}: service header {header} appears before its [{domain}] header")]
    OrphanService {
        /// Line number of the header.
        line: usize,
        /// The header as written.
        header: String,
        /// Domain named by the header.
        domain: String,
    },

    /// A domain header reappearing after a different domain.
    #[error("line {line}: domain [{name}] is defined more than once")]
    DuplicateDomain {
        /// Line number of the second header.
        line: usize,
        /// Domain name.
        name: String,
    },
}

/// Errors raised by programmatic edits of a layout document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A domain with the same name already exists in the document.
    #[error("domain '{0}' already exists")]
    DuplicateDomain(String),
}

/// Errors raised while reconciling wanted services into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// No destination domain can be derived for a wanted service.
    #[error("cannot resolve a domain for service type '{service_type}' on host '{host}'")]
    UnresolvableDomain {
        /// Service type of the wanted entry.
        service_type: String,
        /// Host the service is wanted on.
        host: String,
    },
}

/// Errors in the site configuration that describes wanted services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A service entry value is an array or table instead of a scalar.
    #[error("host '{host}': service property '{key}' must be a string, number or boolean")]
    NonScalarValue {
        /// Host whose entry is invalid.
        host: String,
        /// Offending property key.
        key: String,
    },

    /// A service entry has no `type` property.
    #[error("host '{host}': service entry {index} has no 'type'")]
    MissingType {
        /// Host whose entry is invalid.
        host: String,
        /// 1-based position of the entry in the host's service list.
        index: usize,
    },

    /// A property that cannot be written as one `key=value` line and read
    /// back unchanged: the key is empty, padded or contains `=`, `#`, `[`
    /// or a line break, or the value contains `#`, a line break or
    /// surrounding whitespace.
    #[error("host '{host}': service property '{key}' cannot be written to a layout file")]
    UnwritableProperty {
        /// Host whose entry is invalid.
        host: String,
        /// Offending property key.
        key: String,
    },

    /// A short host name matches more than one declared host.
    #[error("host '{host}' is ambiguous: matches {}", candidates.join(", "))]
    AmbiguousHost {
        /// Host name as given.
        host: String,
        /// Declared hosts sharing its short name.
        candidates: Vec<String>,
    },
}
