//! Capability for turning the source URL into a settled document.
//!
//! - `http` — plain HTTP GET of the markup as served.
//! - `browser` — headless renderer that executes client-side scripts before
//!   dumping the DOM.
//!
//! Both enforce `Readiness::timeout` as a hard upper bound and release whatever
//! session they opened before returning, on success and on every failure path.
use clap::ValueEnum;
use rates_common::{Document, Result};
use std::time::Duration;
use strum_macros::Display;

pub mod browser;
pub mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// When a fetched document counts as ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// Extra wait after network activity settles, for client-side rendering races.
    pub settle: Duration,
    /// Hard upper bound for the whole fetch.
    pub timeout: Duration,
}

/// Source of rendered documents.
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url` and return its markup once `readiness` is met.
    fn fetch(&self, url: &str, readiness: &Readiness) -> Result<Document>;
}

/// Fetcher implementation selectable from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum FetcherKind {
    /// Plain HTTP GET.
    #[default]
    Http,
    /// Headless browser DOM dump.
    Browser,
}
