//! Bring a layout document in line with the services wanted on a host.
//!
//! Reconciliation is split into [`plan`], which only reads the document, and
//! [`apply`], which performs the recorded changes. Every new block is
//! resolved while planning, so an unresolvable service leaves the document
//! untouched.
use std::collections::BTreeSet;

use super::matcher::matches;
use super::model::{Domain, LayoutDocument, Service, WantedService};
use super::resolver::DomainResolver;
use crate::error::{DocumentError, LayoutError, ReconcileError};

/// Position and name of an existing service block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRef {
    /// Domain name.
    pub domain: String,
    /// Service type.
    pub service: String,
    domain_index: usize,
    service_index: usize,
}

impl ServiceRef {
    fn new(doc: &LayoutDocument, domain_index: usize, service_index: usize) -> Self {
        let domain = doc.domains().get(domain_index);
        Self {
            domain: domain
                .and_then(Domain::name)
                .unwrap_or_default()
                .to_string(),
            service: domain
                .and_then(|d| d.services.get(service_index))
                .map(|s| s.name().to_string())
                .unwrap_or_default(),
            domain_index,
            service_index,
        }
    }
}

impl std::fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.domain, self.service)
    }
}

/// A new service block to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    /// Destination domain.
    pub domain: String,
    /// Whether the domain has to be created first.
    pub new_domain: bool,
    /// The service the block is created for.
    pub wanted: WantedService,
}

impl std::fmt::Display for Addition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}/{}]", self.domain, self.wanted.service_type())
    }
}

/// Changes needed to reconcile a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Commented services to re-enable.
    pub enable: Vec<ServiceRef>,
    /// Enabled services to comment out.
    pub disable: Vec<ServiceRef>,
    /// New service blocks.
    pub add: Vec<Addition>,
    /// Enabled services that already match a wanted service.
    pub kept: Vec<ServiceRef>,
}

impl ReconcilePlan {
    /// Whether applying the plan would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.enable.is_empty() && self.disable.is_empty() && self.add.is_empty()
    }

    /// Number of services the plan touches.
    #[must_use]
    pub const fn change_count(&self) -> usize {
        self.enable.len() + self.disable.len() + self.add.len()
    }

    /// One-line summary, e.g. `1 added, 2 disabled, 3 unchanged`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.add.is_empty() {
            parts.push(format!("{} added", self.add.len()));
        }
        if !self.enable.is_empty() {
            parts.push(format!("{} enabled", self.enable.len()));
        }
        if !self.disable.is_empty() {
            parts.push(format!("{} disabled", self.disable.len()));
        }
        parts.push(format!("{} unchanged", self.kept.len()));
        parts.join(", ")
    }
}

/// Compute the changes that reconcile `doc` with `wanted`.
///
/// Every existing service of a known type is visited, enabled ones before
/// commented ones. A service whose type is not wanted, or that matches no
/// remaining wanted entry of its type, is disabled; a matching commented
/// service is re-enabled. Each wanted entry satisfies at most one service.
/// Entries left over get a new block in the domain given by `resolver`.
///
/// # Errors
///
/// Returns [`ReconcileError::UnresolvableDomain`] if a wanted service needs a
/// new block but no domain can be derived for it.
pub fn plan(
    resolver: &DomainResolver,
    wanted: &[WantedService],
    doc: &LayoutDocument,
) -> Result<ReconcilePlan, ReconcileError> {
    let wanted_types: BTreeSet<&str> = wanted.iter().map(WantedService::service_type).collect();
    let mut satisfied = vec![false; wanted.len()];
    let mut plan = ReconcilePlan::default();

    for service_type in resolver.known_types() {
        let mut existing: Vec<(usize, usize, &Service)> = doc
            .domains()
            .iter()
            .enumerate()
            .flat_map(|(di, domain)| {
                domain
                    .services
                    .iter()
                    .enumerate()
                    .map(move |(si, service)| (di, si, service))
            })
            .filter(|(_, _, service)| service.name() == service_type)
            .collect();
        existing.sort_by_key(|(_, _, service)| service.is_commented());

        for (di, si, service) in existing {
            let target = ServiceRef::new(doc, di, si);

            let found = wanted_types
                .contains(service_type)
                .then(|| {
                    wanted.iter().enumerate().position(|(idx, w)| {
                        !satisfied.get(idx).copied().unwrap_or(true)
                            && w.service_type() == service_type
                            && matches(w.properties(), &service.properties)
                    })
                })
                .flatten();

            match found {
                Some(idx) => {
                    if let Some(slot) = satisfied.get_mut(idx) {
                        *slot = true;
                    }
                    if service.is_commented() {
                        plan.enable.push(target);
                    } else {
                        plan.kept.push(target);
                    }
                }
                None => {
                    if !service.is_commented() {
                        plan.disable.push(target);
                    }
                }
            }
        }
    }

    let mut created: BTreeSet<String> = BTreeSet::new();
    for (w, _) in wanted.iter().zip(&satisfied).filter(|(_, done)| !**done) {
        let domain = resolver
            .resolve(w)
            .ok_or_else(|| ReconcileError::UnresolvableDomain {
                service_type: w.service_type().to_string(),
                host: w.host().to_string(),
            })?;
        let new_domain = doc.domain(&domain).is_none() && created.insert(domain.clone());
        plan.add.push(Addition {
            domain,
            new_domain,
            wanted: w.clone(),
        });
    }

    Ok(plan)
}

/// Apply a plan computed by [`plan`] for the same document.
///
/// # Errors
///
/// Returns [`DocumentError::DuplicateDomain`] if a domain marked as new
/// already exists, which means the plan was computed for another document.
pub fn apply(plan: &ReconcilePlan, doc: &mut LayoutDocument) -> Result<(), DocumentError> {
    for (target, commented) in plan
        .disable
        .iter()
        .map(|t| (t, true))
        .chain(plan.enable.iter().map(|t| (t, false)))
    {
        if let Some(service) = doc
            .domains_mut()
            .get_mut(target.domain_index)
            .and_then(|d| d.services.get_mut(target.service_index))
        {
            service.set_commented(commented);
        }
    }

    for addition in &plan.add {
        if addition.new_domain {
            let mut domain = Domain::new(addition.domain.as_str());
            domain.raw_lines.push(String::new());
            doc.add_domain(domain)?;
        }
        let Some(domain) = doc.domain_mut(&addition.domain) else {
            continue;
        };
        domain.push_service(Service::new(
            addition.wanted.service_type(),
            addition.wanted.properties().clone(),
        ));
    }
    Ok(())
}

/// Reconcile `doc` with `wanted` using the standard domain tables.
///
/// # Examples
///
/// ```
/// use layout_cli::layout::{LayoutDocument, WantedService, reconciler, serializer};
///
/// let mut doc = LayoutDocument::new();
/// let plan = reconciler::reconcile(&[WantedService::new("admin", "h1")], &mut doc).unwrap();
/// assert_eq!(plan.add.len(), 1);
/// assert!(serializer::to_string(&doc).contains("[dCacheDomain/admin]\nhost=h1\n"));
/// ```
///
/// # Errors
///
/// Returns an error if a wanted service cannot be placed; `doc` is left
/// unchanged in that case.
pub fn reconcile(
    wanted: &[WantedService],
    doc: &mut LayoutDocument,
) -> Result<ReconcilePlan, LayoutError> {
    reconcile_with(&DomainResolver::default(), wanted, doc)
}

/// Reconcile `doc` with `wanted` using custom domain tables.
///
/// # Errors
///
/// Returns an error if a wanted service cannot be placed; `doc` is left
/// unchanged in that case.
pub fn reconcile_with(
    resolver: &DomainResolver,
    wanted: &[WantedService],
    doc: &mut LayoutDocument,
) -> Result<ReconcilePlan, LayoutError> {
    let plan = plan(resolver, wanted, doc)?;
    apply(&plan, doc)?;
    Ok(plan)
}
