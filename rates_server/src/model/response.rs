//! JSON views of the cache served by the read API.
//!
//! Every body carries a `status` discriminator:
//! - `loading` — no attempt has completed yet, retry shortly;
//! - `ok` — `data` holds the latest snapshot;
//! - `stale` — the latest attempt failed but an older snapshot is served with the error;
//! - `error` — the latest attempt failed and nothing (or, under the `report`
//!   policy, nothing older) is served.
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rates_common::Snapshot;
use rates_common::model::TableEntry;
use serde::Serialize;
use strum_macros::Display;

use crate::model::cache::{CacheState, Status};

/// What to answer while the latest attempt failed but an older snapshot exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum StalePolicy {
    /// Serve the older snapshot, flagged `stale`, together with the error.
    #[default]
    Serve,
    /// Report the error only.
    Report,
}

/// Body of `GET /data`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DataResponse<'a> {
    /// No attempt has completed yet.
    Loading,
    /// Fresh data.
    Ok {
        /// When the snapshot was taken.
        last_update: Option<DateTime<Utc>>,
        /// The snapshot.
        data: &'a Snapshot,
    },
    /// Older data served after a failed attempt.
    Stale {
        /// Message of the failed attempt.
        error: &'a str,
        /// When the served snapshot was taken.
        last_update: Option<DateTime<Utc>>,
        /// The older snapshot.
        data: &'a Snapshot,
    },
    /// No data to serve.
    Error {
        /// Message of the failed attempt.
        error: &'a str,
    },
}

impl<'a> DataResponse<'a> {
    /// Map a committed cache state to a response body under `policy`.
    pub fn from_state(state: &'a CacheState, policy: StalePolicy) -> Self {
        let error = state.last_error.as_deref().unwrap_or("unknown error");
        match (state.status, state.snapshot.as_deref()) {
            (Status::Loading, _) => DataResponse::Loading,
            (Status::Ok, Some(data)) => DataResponse::Ok {
                last_update: state.last_success,
                data,
            },
            (Status::Ok, None) => DataResponse::Error { error },
            (Status::Error, Some(data)) if policy == StalePolicy::Serve => DataResponse::Stale {
                error,
                last_update: state.last_success,
                data,
            },
            (Status::Error, _) => DataResponse::Error { error },
        }
    }
}

/// Body of `GET /tables`: the same discriminator with the table list only.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TablesResponse<'a> {
    /// No attempt has completed yet.
    Loading,
    /// Tables of the latest snapshot.
    Ok {
        /// When the snapshot was taken.
        last_update: Option<DateTime<Utc>>,
        /// Tables in document order.
        tables: &'a [TableEntry],
    },
    /// Tables of an older snapshot served after a failed attempt.
    Stale {
        /// Message of the failed attempt.
        error: &'a str,
        /// When the served snapshot was taken.
        last_update: Option<DateTime<Utc>>,
        /// Tables in document order.
        tables: &'a [TableEntry],
    },
    /// No data to serve.
    Error {
        /// Message of the failed attempt.
        error: &'a str,
    },
}

impl<'a> From<DataResponse<'a>> for TablesResponse<'a> {
    fn from(response: DataResponse<'a>) -> Self {
        match response {
            DataResponse::Loading => TablesResponse::Loading,
            DataResponse::Ok { last_update, data } => TablesResponse::Ok {
                last_update,
                tables: &data.tables,
            },
            DataResponse::Stale {
                error,
                last_update,
                data,
            } => TablesResponse::Stale {
                error,
                last_update,
                tables: &data.tables,
            },
            DataResponse::Error { error } => TablesResponse::Error { error },
        }
    }
}
