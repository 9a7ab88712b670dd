//! Result type alias shared across the workspace.
//!
//! Functions across the extractor and the server return `Result<T>`, which
//! defaults the error type to the common `RatesError`.
use crate::error::RatesError;

/// Workspace-wide `Result` alias with `RatesError` as the default error.
pub type Result<T, E = RatesError> = std::result::Result<T, E>;
