//! Layout reconciliation engine.
//!
//! Keeps a host's layout file (domains holding services, written as
//! `[domain]` and `[domain/service]` blocks of `key=value` lines) in line
//! with the services a site configuration wants on that host. Unwanted
//! services are commented out rather than deleted, and everything the engine
//! does not manage is written back untouched.
//!
//! The public API is organised into layers:
//!
//! - **[`layout`]**: parse, reconcile, and serialize layout documents
//! - **[`config`]**: the TOML site configuration listing wanted services
//! - **[`resources`]**: idempotent `check + apply` primitives for the layout file
//! - **[`tasks`]**: named units of work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`reconcile`, `check`, `diff`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod resources;
pub mod tasks;
