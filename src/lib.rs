//! pkgstash - bounded on-disk cache for package artifacts
//!
//! Downloads each package version once and serves repeat requests from a
//! local cache. At startup the cache root is reconciled against retention
//! policy: stray files and older versions are removed, and at most a
//! configured number of packages are kept. Downloads wait for that pass.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod store;
pub mod ui;

pub use error::{StashError, StashResult};
