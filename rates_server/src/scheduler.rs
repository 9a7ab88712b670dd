//! Refresh scheduler.
//!
//! `RefreshScheduler::tick` runs one refresh attempt: fetch the source, extract a
//! snapshot and commit the outcome to the cache. At most one attempt runs at a
//! time; a tick arriving while an attempt is in flight returns
//! `TickOutcome::Skipped` without touching the cache. Skipped ticks are dropped,
//! never queued, so a hanging source cannot build up a backlog.
//!
//! Cadence is chosen at start:
//! - `Cadence::Fixed` — a ticker fires every period on the scheduler thread and
//!   each firing runs on a worker thread; firings that land while an attempt is
//!   in flight are dropped. Suits attempts that may outlast the period.
//! - `Cadence::Sequential` — the next attempt starts one full period after the
//!   previous one finished, guaranteeing an idle gap between attempts.
//!
//! Both run the first attempt immediately. Failures are recorded in the cache
//! and never stop the loop. `SchedulerHandle::stop` ends the loop and waits for
//! the attempt in flight, if any.
use crate::fetcher::{DocumentFetcher, Readiness};
use crate::model::cache::Cache;
use clap::ValueEnum;
use crossbeam_channel::{Receiver, Sender, after, bounded, select, tick};
use log::{debug, error, info};
use rates_common::{Extractor, RatesError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use strum_macros::Display;

/// How refresh attempts are spaced in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase")]
pub enum Cadence {
    /// Fire on a fixed period; overlapping firings are dropped.
    #[default]
    Fixed,
    /// Wait a fixed delay after each attempt completes.
    Sequential,
}

/// Result of one `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// An attempt was already in flight; nothing was done.
    Skipped,
    /// A new snapshot was committed.
    Refreshed,
    /// The attempt failed and the error was committed.
    Failed,
}

/// Where and how to fetch the source.
#[derive(Debug, Clone)]
pub struct Target {
    /// Source URL, fixed per deployment.
    pub url: String,
    /// Readiness policy handed to the fetcher.
    pub readiness: Readiness,
}

/// Drives refresh attempts and owns the single-flight guard.
pub struct RefreshScheduler {
    fetcher: Box<dyn DocumentFetcher>,
    extractor: Extractor,
    cache: Cache,
    target: Target,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of an attempt.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Running scheduler loop.
pub struct SchedulerHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for it, including the attempt in flight.
    pub fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(());
        self.join
            .join()
            .map_err(|_| RatesError::Resource("refresh scheduler thread panicked".into()))
    }
}

impl RefreshScheduler {
    /// Scheduler writing the outcomes of `fetcher` + `extractor` on `target` into `cache`.
    pub fn new(
        fetcher: Box<dyn DocumentFetcher>,
        extractor: Extractor,
        cache: Cache,
        target: Target,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            cache,
            target,
            in_flight: AtomicBool::new(false),
        }
    }

    /// `true` while an attempt is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Set the in-flight flag; `false` if an attempt already holds it.
    fn claim(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Run one refresh attempt unless one is already in flight.
    pub fn tick(&self) -> TickOutcome {
        if !self.claim() {
            debug!("Refresh already in flight, tick dropped");
            return TickOutcome::Skipped;
        }
        self.attempt()
    }

    /// One attempt under a claim taken by the caller.
    fn attempt(&self) -> TickOutcome {
        // Released only after the cache write, so attempts commit in completion order.
        let _in_flight = InFlight(&self.in_flight);

        let started = Instant::now();
        info!("Refreshing {}", self.target.url);
        let outcome = self
            .fetcher
            .fetch(&self.target.url, &self.target.readiness)
            .and_then(|document| self.extractor.extract(&document));

        let tick_outcome = match &outcome {
            Ok(snapshot) => {
                info!(
                    "Refresh done in {:.1?}: {} boxes, {} tables, {} movement markers",
                    started.elapsed(),
                    snapshot.boxes_found(),
                    snapshot.tables.len(),
                    snapshot.movement.len()
                );
                TickOutcome::Refreshed
            }
            Err(e) => {
                error!(
                    "Refresh failed after {:.1?} ({} error): {}",
                    started.elapsed(),
                    e.kind(),
                    e
                );
                TickOutcome::Failed
            }
        };
        self.cache.write(outcome);
        tick_outcome
    }

    /// Start the refresh loop on its own thread.
    pub fn start(self: Arc<Self>, cadence: Cadence, interval: Duration) -> Result<SchedulerHandle> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let join = thread::Builder::new()
            .name("refresh-scheduler".into())
            .spawn(move || {
                info!(
                    "Refresh scheduler started: {} cadence, every {:?}",
                    cadence, interval
                );
                match cadence {
                    Cadence::Fixed => self.run_fixed(interval, stop_rx),
                    Cadence::Sequential => self.run_sequential(interval, stop_rx),
                }
                info!("Refresh scheduler stopped");
            })?;
        Ok(SchedulerHandle { stop_tx, join })
    }

    fn run_fixed(self: Arc<Self>, period: Duration, stop_rx: Receiver<()>) {
        let ticker = tick(period);
        let mut worker = self.spawn_attempt();
        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => {
                    if let Some(next) = self.spawn_attempt() {
                        worker = Some(next);
                    }
                },
            }
        }
        if let Some(worker) = worker {
            if worker.join().is_err() {
                error!("Refresh worker panicked");
            }
        }
    }

    /// Claim the guard and run the attempt on a worker thread.
    ///
    /// The claim is taken here, before spawning, so the returned handle is
    /// always the one of the attempt in flight.
    fn spawn_attempt(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.claim() {
            debug!("Previous refresh still in flight, tick dropped");
            return None;
        }
        let scheduler = Arc::clone(self);
        match thread::Builder::new()
            .name("refresh-worker".into())
            .spawn(move || {
                scheduler.attempt();
            }) {
            Ok(handle) => Some(handle),
            Err(e) => {
                self.in_flight.store(false, Ordering::Release);
                error!("Cannot spawn refresh worker: {}", e);
                None
            }
        }
    }

    fn run_sequential(&self, delay: Duration, stop_rx: Receiver<()>) {
        loop {
            self.tick();
            select! {
                recv(stop_rx) -> _ => break,
                recv(after(delay)) -> _ => {},
            }
        }
    }
}
