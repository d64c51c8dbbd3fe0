//! Destination domain names for services that have no block yet.
use super::model::WantedService;

/// Service types that always live in a fixed, well-known domain.
pub const FIXED_DOMAINS: &[(&str, &str)] = &[
    ("admin", "dCacheDomain"),
    ("broadcast", "dCacheDomain"),
    ("topo", "dCacheDomain"),
    ("gplazma", "dCacheDomain"),
    ("httpd", "dCacheDomain"),
    ("loginbroker", "dCacheDomain"),
    ("webadmin", "dCacheDomain"),
    ("pnfsmanager", "nameserver"),
    ("poolmanager", "nameserver"),
    ("dir", "nameserver"),
    ("acl", "nameserver"),
    ("nfsv3", "nameserver"),
    ("cleaner", "nameserver"),
    ("replica", "replica"),
    ("info", "info"),
    ("statistics", "statistics"),
    ("srm-loginbroker", "srm"),
    ("srm", "srm"),
    ("spacemanager", "srm"),
    ("pinmanager", "srm"),
    ("transfermanagers", "srm"),
];

/// Door types that get one domain per host.
pub const HOST_QUALIFIED: &[&str] = &[
    "dcap",
    "gsidcap",
    "gridftp",
    "xrootd",
    "webdav",
    "httpdoor",
    "kerberosdcap",
    "kerberosftp",
];

/// Service type of pools, whose domain is derived from the pool path.
pub const POOL: &str = "pool";

/// Property holding a pool's filesystem path.
pub const POOL_PATH_KEY: &str = "path";

/// Maps service types to destination domain names.
///
/// [`DomainResolver::default`] carries the standard tables; custom tables
/// can be supplied with [`DomainResolver::new`].
#[derive(Debug, Clone, Copy)]
pub struct DomainResolver {
    fixed: &'static [(&'static str, &'static str)],
    host_qualified: &'static [&'static str],
}

impl Default for DomainResolver {
    fn default() -> Self {
        Self::new(FIXED_DOMAINS, HOST_QUALIFIED)
    }
}

impl DomainResolver {
    /// Create a resolver from explicit tables.
    #[must_use]
    pub const fn new(
        fixed: &'static [(&'static str, &'static str)],
        host_qualified: &'static [&'static str],
    ) -> Self {
        Self {
            fixed,
            host_qualified,
        }
    }

    /// Every service type this resolver knows, in table order: fixed types,
    /// host-qualified doors, then `pool`.
    pub fn known_types(&self) -> impl Iterator<Item = &'static str> + use<> {
        let fixed = self.fixed;
        let host_qualified = self.host_qualified;
        fixed
            .iter()
            .map(|(service_type, _)| *service_type)
            .chain(host_qualified.iter().copied())
            .chain(std::iter::once(POOL))
    }

    /// Destination domain for a wanted service, or `None` when no domain can
    /// be derived (unknown type, or a pool without a path).
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_cli::layout::resolver::DomainResolver;
    /// use layout_cli::layout::WantedService;
    ///
    /// let resolver = DomainResolver::default();
    /// let door = WantedService::new("gridftp", "door1.example.org");
    /// assert_eq!(resolver.resolve(&door).as_deref(), Some("gridftp-domain-door1"));
    ///
    /// let pool = WantedService::new("pool", "pool1.example.org").with_property("path", "/data/p1");
    /// assert_eq!(resolver.resolve(&pool).as_deref(), Some("pool-domain-pool1_data_p1"));
    /// ```
    #[must_use]
    pub fn resolve(&self, wanted: &WantedService) -> Option<String> {
        let service_type = wanted.service_type();

        if let Some((_, domain)) = self.fixed.iter().find(|(t, _)| *t == service_type) {
            return Some((*domain).to_string());
        }

        if self.host_qualified.contains(&service_type) {
            return Some(format!("{service_type}-domain-{}", host_id(wanted.host())));
        }

        if service_type == POOL {
            let path = wanted.get(POOL_PATH_KEY)?;
            return Some(format!(
                "pool-domain-{}{}",
                host_id(wanted.host()),
                sanitize_path(path)
            ));
        }

        None
    }
}

/// Short host name: everything before the first `.`.
#[must_use]
pub fn host_id(host: &str) -> &str {
    host.split_once('.').map_or(host, |(short, _)| short)
}

/// Replace `/`, `:` and `@` with `_` so a path can be part of a domain name.
#[must_use]
pub fn sanitize_path(path: &str) -> String {
    path.chars()
        .map(|c| if matches!(c, '/' | ':' | '@') { '_' } else { c })
        .collect()
}
