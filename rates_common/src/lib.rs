//!
//! Extraction core shared by the rates server.
//!
//! This crate aggregates:
//! - `error` — unified error type `RatesError` used across the workspace.
//! - `result` — handy `Result<T, RatesError>` alias.
//! - `model` — `QuoteBox`, `Snapshot`, tables and movement markers.
//! - `labels` — the value-block labels searched for in the source.
//! - `document` — rendered markup handed from a fetcher to the extractor.
//! - `text` — whitespace normalisation and numeric token policies.
//! - `extractor` — the pure document-to-snapshot extraction.
#![warn(missing_docs)]
pub mod document;
pub mod error;
pub mod extractor;
pub mod labels;
pub mod model;
pub mod result;
pub mod text;

pub use document::Document;
pub use error::RatesError;
pub use extractor::{Extractor, ExtractorConfig};
pub use result::Result;
pub use model::Snapshot;
