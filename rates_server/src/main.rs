//! Rates refresh server.
//!
//! This binary keeps the latest rates extracted from one remote page and serves
//! them over HTTP. It wires together four building blocks:
//!
//! - `DocumentFetcher` — turns the source URL into a settled document, either by
//!   a plain HTTP GET or by dumping the DOM of a headless renderer.
//! - `Extractor` (from `rates_common`) — turns the document into a `Snapshot`
//!   of quote boxes, classified tables and movement markers.
//! - `RefreshScheduler` — runs fetch + extract on a cadence with a single-flight
//!   guard and commits each outcome to the cache.
//! - `Cache` + read API — the cache holds the latest committed state; actix-web
//!   handlers read it without ever waiting for a refresh.
//!
//! Concurrency and shutdown:
//! - The scheduler runs on its own thread (and worker threads under the fixed
//!   cadence); the HTTP server runs on the actix system of the main thread.
//! - When the server returns (SIGINT/SIGTERM), the scheduler is signalled through
//!   a crossbeam channel and joined, including the attempt in flight.
//! - Refresh failures are recorded in the cache and logged; they never end the
//!   process.
#![warn(missing_docs)]
use crate::api::ApiState;
use crate::args::Args;
use crate::fetcher::{BrowserFetcher, DocumentFetcher, FetcherKind, HttpFetcher};
use crate::model::cache::Cache;
use crate::scheduler::RefreshScheduler;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use log::{error, info};
use rates_common::{Extractor, RatesError, Result};
use std::sync::Arc;

mod api;
mod args;
mod fetcher;
pub mod model;
mod scheduler;

fn main() -> Result<(), RatesError> {
    init_logger();
    let args = Args::parse();
    info!(
        "Starting rates server for {} ({} fetcher, stale data: {})",
        args.url, args.fetcher, args.stale
    );

    let fetcher: Box<dyn DocumentFetcher> = match args.fetcher {
        FetcherKind::Http => Box::new(HttpFetcher::new()),
        FetcherKind::Browser => {
            let browser = BrowserFetcher::new(&args.browser_path);
            if args.browser_flags.is_empty() {
                Box::new(browser)
            } else {
                Box::new(browser.with_flags(args.browser_flags.clone()))
            }
        }
    };
    let extractor = Extractor::new(args.extractor_config())?;
    let cache = Cache::new();

    let scheduler = Arc::new(RefreshScheduler::new(
        fetcher,
        extractor,
        cache.clone(),
        args.target(),
    ));
    let handle = scheduler.start(args.cadence, args.interval())?;

    let state = ApiState {
        cache,
        stale_policy: args.stale,
    };
    let bind = (args.bind.clone(), args.port);
    info!("HTTP API listening on {}:{}", bind.0, bind.1);
    let served = actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .app_data(web::Data::new(state.clone()))
                .configure(api::routes)
        })
        .bind(bind)?
        .run()
        .await
    });

    info!("HTTP API stopped, stopping refresh scheduler");
    if let Err(e) = handle.stop() {
        error!("Scheduler shutdown error: {}", e);
    }
    served?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
