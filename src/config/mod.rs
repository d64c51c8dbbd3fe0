//! Configuration loading: the site file describing wanted services per host.
pub mod site;
pub mod toml_loader;

pub use site::{HostEntry, SiteConfig};
