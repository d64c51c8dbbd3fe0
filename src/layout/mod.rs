//! Layout reconciliation engine.
//!
//! A layout file lists domains and the services running inside them. The
//! engine parses the file into a [`LayoutDocument`], brings it in line with
//! the [`WantedService`]s of a host, and writes it back without losing any
//! line: services that are no longer wanted are commented out, not deleted.
//!
//! ```
//! use layout_cli::layout::{WantedService, parser, reconciler, serializer};
//!
//! let mut doc = parser::parse_str("[dCacheDomain]\n[dCacheDomain/admin]\nhost=h1\n").unwrap();
//! reconciler::reconcile(&[WantedService::new("info", "h1")], &mut doc).unwrap();
//! assert_eq!(
//!     serializer::to_string(&doc),
//!     "[dCacheDomain]\n[dCacheDomain/admin]\n# host=h1\n[info]\n\n[info/info]\nhost=h1\ntype=info\n\n"
//! );
//! ```
pub mod matcher;
pub mod model;
pub mod module;
pub mod parser;
pub mod properties;
pub mod reconciler;
pub mod resolver;
pub mod serializer;

pub use model::{Domain, LayoutDocument, Service, WantedService};
pub use properties::Properties;
pub use reconciler::ReconcilePlan;
pub use resolver::DomainResolver;
