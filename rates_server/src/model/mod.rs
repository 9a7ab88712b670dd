//! Server-side state and its HTTP views.
//!
//! - `cache` — the shared `Cache` and its committed `CacheState`.
//! - `response` — JSON bodies mapped from a `CacheState`, and the stale-data policy.

pub mod cache;
pub mod response;
