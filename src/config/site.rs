//! Site configuration: the services each host is expected to run.
//!
//! ```toml
//! [hosts."head.example.org"]
//! services = [
//!   { type = "admin" },
//!   { type = "pool", path = "/data1", size = 2000 },
//! ]
//! ```
use anyhow::{Context as _, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::toml_loader;
use crate::error::ConfigError;
use crate::layout::model::{HOST_KEY, TYPE_KEY};
use crate::layout::properties::{self, Properties};
use crate::layout::resolver::host_id;
use crate::layout::WantedService;

/// Wanted services for every host of a site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    hosts: BTreeMap<String, HostEntry>,
}

/// Services configured for one host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostEntry {
    /// One table of scalar properties per service.
    #[serde(default)]
    pub services: Vec<toml::Table>,
}

impl SiteConfig {
    /// Load the site configuration; a missing file is an empty site.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        toml_loader::load_config(path)
    }

    /// Parse a site configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for a site.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parsing site configuration")
    }

    /// Configured host names, sorted.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Find the entry for `host`: an exact match, else the one entry whose
    /// short name equals the short name of `host`.
    fn entry(&self, host: &str) -> Result<Option<(&str, &HostEntry)>, ConfigError> {
        if let Some((name, entry)) = self.hosts.get_key_value(host) {
            return Ok(Some((name.as_str(), entry)));
        }

        let id = host_id(host);
        let candidates: Vec<(&String, &HostEntry)> = self
            .hosts
            .iter()
            .filter(|(name, _)| host_id(name) == id)
            .collect();
        match candidates.as_slice() {
            [] => Ok(None),
            [(name, entry)] => Ok(Some((name.as_str(), *entry))),
            _ => Err(ConfigError::AmbiguousHost {
                host: host.to_string(),
                candidates: candidates.iter().map(|(name, _)| (*name).clone()).collect(),
            }),
        }
    }

    /// Whether the site declares `host` at all, even with no services.
    ///
    /// A short name shared by several hosts counts as declared;
    /// [`wanted_services`](Self::wanted_services) then reports the ambiguity.
    #[must_use]
    pub fn declares(&self, host: &str) -> bool {
        !matches!(self.entry(host), Ok(None))
    }

    /// Services wanted on `host`, in configuration order.
    ///
    /// Scalar values are converted to strings; `host` defaults to the
    /// configured host name. An undeclared host wants nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_cli::config::SiteConfig;
    ///
    /// let site = SiteConfig::from_toml_str(
    ///     "[hosts.\"pool1.example.org\"]\nservices = [{ type = \"pool\", path = \"/data1\", size = 2000 }]\n",
    /// )
    /// .unwrap();
    /// let wanted = site.wanted_services("pool1").unwrap();
    /// assert_eq!(wanted[0].host(), "pool1.example.org");
    /// assert_eq!(wanted[0].get("size"), Some("2000"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `host` is an ambiguous short name, or an
    /// entry has no `type`, carries an array or table value, or holds a
    /// property that a layout file cannot represent.
    pub fn wanted_services(&self, host: &str) -> Result<Vec<WantedService>, ConfigError> {
        let Some((name, entry)) = self.entry(host)? else {
            return Ok(Vec::new());
        };

        entry
            .services
            .iter()
            .enumerate()
            .map(|(idx, table)| {
                let mut properties = Properties::new();
                for (key, value) in table {
                    let value = scalar(value).ok_or_else(|| ConfigError::NonScalarValue {
                        host: name.to_string(),
                        key: key.clone(),
                    })?;
                    properties.insert(key.clone(), value);
                }
                if !properties.contains_key(TYPE_KEY) {
                    return Err(ConfigError::MissingType {
                        host: name.to_string(),
                        index: idx + 1,
                    });
                }
                properties
                    .entry(HOST_KEY.to_string())
                    .or_insert_with(|| name.to_string());
                if let Some((key, _)) = properties
                    .iter()
                    .find(|(key, value)| !properties::is_writable(key, value))
                {
                    return Err(ConfigError::UnwritableProperty {
                        host: name.to_string(),
                        key: key.clone(),
                    });
                }
                WantedService::from_properties(properties).ok_or_else(|| {
                    ConfigError::MissingType {
                        host: name.to_string(),
                        index: idx + 1,
                    }
                })
            })
            .collect()
    }
}

/// String form of a scalar TOML value.
fn scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
