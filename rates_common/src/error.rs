//! Error types shared by the extractor and the refresh server.
//!
//! The `RatesError` enum unifies the failure cases of one refresh attempt
//! (reaching the source, parsing it, managing the fetch session) together with
//! the plumbing errors around them, so every layer can propagate a single type
//! up to the scheduler boundary where it is recorded in the cache.
use std::io;
use std::time::Duration;

use strum_macros::Display;
use thiserror::Error;

/// Unified error type shared by the workspace.
#[derive(Error, Debug)]
pub enum RatesError {
    /// I/O error originating from the standard library, pipes or child processes.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source could not be reached or rendered (network, HTTP status, renderer exit).
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The source did not produce a document within the hard timeout.
    #[error("Fetch timed out after {}s", .0.as_secs_f64())]
    FetchTimeout(Duration),

    /// Structural failure while parsing a fetched document (not "label not found").
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Failure acquiring or releasing a fetch session.
    #[error("Resource error: {0}")]
    Resource(String),

    /// Channel receive failed (e.g., the producing thread is gone).
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),
}

/// Coarse classification used when logging a failed refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// Reaching or rendering the source failed.
    Fetch,
    /// The document was fetched but could not be parsed.
    Extraction,
    /// The fetch session could not be acquired or released.
    Resource,
    /// Plumbing around the attempt (I/O, channels).
    Internal,
}

impl RatesError {
    /// Classify the error into the refresh failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RatesError::Fetch(_) | RatesError::FetchTimeout(_) => ErrorKind::Fetch,
            RatesError::Extraction(_) => ErrorKind::Extraction,
            RatesError::Resource(_) => ErrorKind::Resource,
            RatesError::Io(_) | RatesError::ChannelRecv(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_bound() {
        let err = RatesError::FetchTimeout(Duration::from_secs(60));
        assert_eq!(err.to_string(), "Fetch timed out after 60s");
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[test]
    fn io_errors_are_internal() {
        let err: RatesError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.kind().to_string(), "internal");
    }

    #[test]
    fn each_failure_maps_to_its_kind() {
        let cases = [
            (RatesError::Fetch("refused".into()), ErrorKind::Fetch),
            (RatesError::Extraction("blank".into()), ErrorKind::Extraction),
            (RatesError::Resource("no renderer".into()), ErrorKind::Resource),
            (RatesError::ChannelRecv("reader gone".into()), ErrorKind::Internal),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }
}
