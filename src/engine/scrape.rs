// src/engine/scrape.rs

//! Batch scrape engine.
//!
//! Takes one finite batch of site configurations, runs each as a job
//! (fetch-with-retry, then extract) on a bounded worker pool, and
//! aggregates whatever the jobs produce. A failed job is logged and
//! dropped from the aggregate; it never takes its siblings or the
//! batch down with it.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::sync::{Mutex, Semaphore};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::engine::retry::fetch_with_retry;
use crate::error::{AppError, Result};
use crate::models::{EngineConfig, Event, SiteConfig};
use crate::services::{Renderer, extract_events};

/// Summary of one engine run.
#[derive(Debug, Default)]
pub struct EngineOutcome {
    /// Everything extracted before completion or cancellation
    pub events: Vec<Event>,
    /// Jobs dispatched
    pub job_total: usize,
    /// Jobs that ended in an error
    pub job_failures: usize,
    /// True when the caller's cancellation cut the run short
    pub cancelled: bool,
}

/// Concurrent scrape engine over a batch of site configurations.
///
/// Generic over the renderer so tests can drive it with stubs.
pub struct ScrapeEngine<R: Renderer> {
    renderer: R,
    config: EngineConfig,
}

impl<R: Renderer> ScrapeEngine<R> {
    /// Create an engine with the given renderer and settings.
    pub fn new(renderer: R, config: EngineConfig) -> Self {
        Self { renderer, config }
    }

    /// Scrape every site in the batch and aggregate the results.
    ///
    /// Worker count defaults to the batch size; the semaphore keeps
    /// in-flight renderer calls at or below the configured ceiling
    /// even when the pool is larger. Cancellation stops new work,
    /// interrupts backoff waits, and makes this return promptly with
    /// whatever was already collected.
    pub async fn run(&self, sites: &[SiteConfig], cancel: &CancellationToken) -> EngineOutcome {
        let mut outcome = EngineOutcome {
            job_total: sites.len(),
            ..EngineOutcome::default()
        };

        if sites.is_empty() {
            return outcome;
        }

        let workers = self.config.workers_for(sites.len());
        let ceiling = self.config.fetch_ceiling(workers);
        let fetch_gate = Arc::new(Semaphore::new(ceiling));
        let spacing = Duration::from_millis(self.config.request_delay_ms);
        let next_start = Arc::new(Mutex::new(Instant::now()));

        log::info!(
            "Dispatching {} jobs across {} workers (fetch ceiling {})",
            sites.len(),
            workers,
            ceiling
        );

        let mut results = stream::iter(sites.iter().enumerate())
            .map(|(index, site)| {
                let fetch_gate = Arc::clone(&fetch_gate);
                let next_start = Arc::clone(&next_start);
                async move {
                    let result = self
                        .run_job(site, fetch_gate, next_start, spacing, cancel)
                        .await;
                    (index, site, result)
                }
            })
            .buffer_unordered(workers);

        // Drain one result per job, or bail out early on cancellation.
        // Dropping the stream on the cancel branch also drops every
        // in-flight job future, so no worker outlives this call.
        loop {
            let next = tokio::select! {
                next = results.next() => next,
                () = cancel.cancelled() => {
                    log::warn!("Cancellation received, stopping the scrape batch");
                    outcome.cancelled = true;
                    break;
                }
            };

            match next {
                Some((index, site, Ok(events))) => {
                    log::info!(
                        "Job {index} ({}) extracted {} events",
                        site.url_to_visit,
                        events.len()
                    );
                    outcome.events.extend(events);
                }
                Some((index, site, Err(error))) if error.is_cancelled() => {
                    outcome.job_failures += 1;
                    outcome.cancelled = true;
                    log::warn!("Job {index} ({}) cancelled", site.url_to_visit);
                }
                Some((index, site, Err(error))) => {
                    outcome.job_failures += 1;
                    log::error!("Job {index} ({}) failed: {error}", site.url_to_visit);
                }
                None => break,
            }
        }

        log::info!(
            "Batch finished: {} events, {}/{} jobs failed{}",
            outcome.events.len(),
            outcome.job_failures,
            outcome.job_total,
            if outcome.cancelled { " (cancelled)" } else { "" }
        );

        outcome
    }

    /// Run a single job: fetch rendered HTML with retries, then
    /// extract events from it.
    async fn run_job(
        &self,
        site: &SiteConfig,
        fetch_gate: Arc<Semaphore>,
        next_start: Arc<Mutex<Instant>>,
        spacing: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<Event>> {
        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        log::info!("Visiting {}", site.url_to_visit);

        let html = fetch_with_retry(self.config.max_retries, cancel, || {
            let fetch_gate = Arc::clone(&fetch_gate);
            let next_start = Arc::clone(&next_start);
            async move {
                // The permit covers one renderer call; backoff waits
                // between attempts happen without it.
                let _permit = tokio::select! {
                    permit = fetch_gate.acquire() => {
                        permit.map_err(|_| AppError::Cancelled)?
                    }
                    () = cancel.cancelled() => return Err(AppError::Cancelled),
                };

                pace(&next_start, spacing, cancel).await?;

                self.renderer
                    .render(&site.url_to_visit, &site.ancestor_selector)
                    .await
            }
        })
        .await?;

        extract_events(&html, site)
    }
}

/// Enforce the minimum spacing between fetch starts. Each caller
/// claims the next free start slot, then sleeps until it comes up;
/// the sleep races the cancellation token.
async fn pace(
    next_start: &Mutex<Instant>,
    spacing: Duration,
    cancel: &CancellationToken,
) -> Result<()> {
    if spacing.is_zero() {
        return Ok(());
    }

    let start_at = {
        let mut next = next_start.lock().await;
        let slot = (*next).max(Instant::now());
        *next = slot + spacing;
        slot
    };

    tokio::select! {
        () = tokio::time::sleep_until(start_at) => Ok(()),
        () = cancel.cancelled() => Err(AppError::Cancelled),
    }
}
