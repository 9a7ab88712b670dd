//! Latest-outcome cache shared between the refresh scheduler and the read API.
//!
//! The cache holds one immutable `CacheState` behind an `Arc`. A write builds the
//! next state from the previous one and the outcome of a finished refresh attempt,
//! then swaps the pointer under a short write lock; a read clones the pointer under
//! a read lock. Readers therefore always see one committed state as a whole and
//! never wait for a refresh in flight, only for the swap itself.
//!
//! Lifecycle:
//! - starts as `Loading` with nothing in it;
//! - a successful attempt stores its snapshot, clears the error and becomes `Ok`;
//! - a failed attempt records the error, keeps whatever snapshot was there and
//!   becomes `Error`.
use chrono::{DateTime, Utc};
use log::debug;
use rates_common::{RatesError, Snapshot};
use std::sync::{Arc, PoisonError, RwLock};
use strum_macros::Display;

/// Status tag of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// No attempt has completed yet.
    Loading,
    /// The latest attempt succeeded.
    Ok,
    /// The latest attempt failed.
    Error,
}

/// One committed state of the cache.
///
/// `status == Ok` implies `snapshot.is_some()` and `last_error.is_none()`;
/// `status == Error` implies `last_error.is_some()`.
#[derive(Debug, Clone)]
pub struct CacheState {
    /// Status tag.
    pub status: Status,
    /// Snapshot of the latest successful attempt, kept across failures.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Message of the latest attempt when it failed.
    pub last_error: Option<String>,
    /// When the latest attempt completed.
    pub last_updated: Option<DateTime<Utc>>,
    /// When the snapshot in hand was taken.
    pub last_success: Option<DateTime<Utc>>,
    /// Number of committed writes.
    pub generation: u64,
}

impl CacheState {
    /// Initial state at process start.
    pub fn loading() -> Self {
        Self {
            status: Status::Loading,
            snapshot: None,
            last_error: None,
            last_updated: None,
            last_success: None,
            generation: 0,
        }
    }

    /// State following `self` once `outcome` has been recorded at `now`.
    fn next(&self, outcome: Result<Snapshot, RatesError>, now: DateTime<Utc>) -> Self {
        match outcome {
            Ok(snapshot) => Self {
                status: Status::Ok,
                snapshot: Some(Arc::new(snapshot)),
                last_error: None,
                last_updated: Some(now),
                last_success: Some(now),
                generation: self.generation + 1,
            },
            Err(err) => Self {
                status: Status::Error,
                snapshot: self.snapshot.clone(),
                last_error: Some(err.to_string()),
                last_updated: Some(now),
                last_success: self.last_success,
                generation: self.generation + 1,
            },
        }
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::loading()
    }
}

/// Cloneable handle to the shared cache.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    state: Arc<RwLock<Arc<CacheState>>>,
}

impl Cache {
    /// Create a cache in the `Loading` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consistent view of the latest committed state.
    pub fn read(&self) -> Arc<CacheState> {
        // The state is only ever replaced whole, so a poisoned lock still holds a consistent value.
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Record the outcome of a completed attempt and return the committed state.
    pub fn write(&self, outcome: Result<Snapshot, RatesError>) -> Arc<CacheState> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(guard.next(outcome, Utc::now()));
        *guard = Arc::clone(&next);
        debug!(
            "Cache generation {} committed with status {}",
            next.generation, next.status
        );
        next
    }
}
