//! Job query façade.
//!
//! ARCHITECTURAL RULE: no other module talks to the jobs API directly.
//! All backend traffic goes through `JobClient`, which owns the response
//! cache, the retry policy and the observable session state.
//!
//! Read operations are cached (job lists 5 minutes, stats 2 minutes) and
//! coalesced: concurrent calls with the same parameters share one upstream
//! request. Mutations are never cached, never retried and never coalesced;
//! on success they invalidate every job-list and stats cache entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

pub mod filter;
pub mod models;
pub mod paginate;
pub mod state;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::errors::ApiError;
use models::{ClearReport, Job, JobSearchFilters, JobStats, ScrapeQuery, ScrapeReport};
use state::{Operation, StateHub};

const JOBS_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const STATS_CACHE_TTL: Duration = Duration::from_secs(2 * 60);
/// Extra attempts after the first, listing reads only.
const LIST_RETRIES: u32 = 2;
const STATS_RETRIES: u32 = 1;

type InflightMap<T> = Mutex<HashMap<String, broadcast::Sender<Result<T, ApiError>>>>;

struct Inner {
    http: Client,
    config: Config,
    cache: Mutex<ResponseCache>,
    state: StateHub,
    inflight_jobs: InflightMap<Vec<Job>>,
    inflight_stats: InflightMap<JobStats>,
}

/// The jobs API client. Cheap to clone; clones share cache, state and
/// in-flight bookkeeping.
#[derive(Clone)]
pub struct JobClient {
    inner: Arc<Inner>,
}

impl JobClient {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                config,
                cache: Mutex::new(ResponseCache::new()),
                state: StateHub::new(),
                inflight_jobs: Mutex::new(HashMap::new()),
                inflight_stats: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The observable session state: loading flags, errors, current list
    /// and stats.
    pub fn state(&self) -> &StateHub {
        &self.inner.state
    }

    /// Fetches jobs matching `filters`.
    ///
    /// A fresh result republishes the current list and lands in the cache;
    /// a cache hit republishes without touching the network or the loading
    /// flag. Transient failures are retried immediately up to two times.
    pub async fn get_jobs(&self, filters: &JobSearchFilters) -> Result<Vec<Job>, ApiError> {
        let inner = &self.inner;
        let key = filters.cache_key();

        if let Some(jobs) = lock(&inner.cache).get::<Vec<Job>>(&key) {
            inner.state.publish_jobs(jobs.clone());
            return Ok(jobs);
        }

        match join_or_lead(&inner.inflight_jobs, &key) {
            Flight::Join(rx) => {
                debug!(key, "joining in-flight jobs request");
                await_shared(rx).await
            }
            Flight::Lead(tx) => {
                inner.state.set_loading(Operation::GetJobs, true);
                inner.state.clear_error(Operation::GetJobs);

                let rx = tx.subscribe();
                let task_inner = Arc::clone(inner);
                let task_key = key;
                let params = filters.query_params();
                tokio::spawn(async move {
                    let url = format!("{}/jobs", task_inner.config.api_base_url);
                    let result: Result<Vec<Job>, ApiError> = request_with_retry(
                        Operation::GetJobs,
                        LIST_RETRIES,
                        task_inner.config.timeouts.list,
                        || task_inner.http.get(&url).query(&params),
                    )
                    .await;

                    match &result {
                        Ok(jobs) => {
                            lock(&task_inner.cache).set(&task_key, jobs, JOBS_CACHE_TTL);
                            task_inner.state.publish_jobs(jobs.clone());
                            task_inner.state.set_loading(Operation::GetJobs, false);
                        }
                        Err(err) => {
                            error!(operation = %Operation::GetJobs, error = %err, "request failed");
                            task_inner.state.set_error(Operation::GetJobs, err.to_string());
                            task_inner.state.set_loading(Operation::GetJobs, false);
                        }
                    }

                    // Remove the in-flight slot before fanning out, so a
                    // caller that arrives after the send starts a new fetch
                    // instead of subscribing to a dead channel.
                    lock(&task_inner.inflight_jobs).remove(&task_key);
                    let _ = tx.send(result); // all subscribers gone is fine
                });

                await_shared(rx).await
            }
        }
    }

    /// Fetches aggregate job statistics. Cached for two minutes; one retry.
    pub async fn get_stats(&self) -> Result<JobStats, ApiError> {
        let inner = &self.inner;
        let key = stats_cache_key();

        if let Some(stats) = lock(&inner.cache).get::<JobStats>(&key) {
            inner.state.publish_stats(stats.clone());
            return Ok(stats);
        }

        match join_or_lead(&inner.inflight_stats, &key) {
            Flight::Join(rx) => {
                debug!(key, "joining in-flight stats request");
                await_shared(rx).await
            }
            Flight::Lead(tx) => {
                inner.state.set_loading(Operation::GetStats, true);
                inner.state.clear_error(Operation::GetStats);

                let rx = tx.subscribe();
                let task_inner = Arc::clone(inner);
                let task_key = key;
                tokio::spawn(async move {
                    let url = format!("{}/stats", task_inner.config.api_base_url);
                    let result: Result<JobStats, ApiError> = request_with_retry(
                        Operation::GetStats,
                        STATS_RETRIES,
                        task_inner.config.timeouts.stats,
                        || task_inner.http.get(&url),
                    )
                    .await;

                    match &result {
                        Ok(stats) => {
                            lock(&task_inner.cache).set(&task_key, stats, STATS_CACHE_TTL);
                            task_inner.state.publish_stats(stats.clone());
                            task_inner.state.set_loading(Operation::GetStats, false);
                        }
                        Err(err) => {
                            error!(operation = %Operation::GetStats, error = %err, "request failed");
                            task_inner.state.set_error(Operation::GetStats, err.to_string());
                            task_inner.state.set_loading(Operation::GetStats, false);
                        }
                    }

                    lock(&task_inner.inflight_stats).remove(&task_key);
                    let _ = tx.send(result);
                });

                await_shared(rx).await
            }
        }
    }

    /// Triggers a backend scrape for `query` in `location`. Not retried; a
    /// successful scrape invalidates all cached lists and stats.
    pub async fn scrape_jobs(
        &self,
        query: &str,
        location: &str,
        limit: u32,
    ) -> Result<ScrapeReport, ApiError> {
        let inner = &self.inner;
        inner.state.set_loading(Operation::ScrapeJobs, true);
        inner.state.clear_error(Operation::ScrapeJobs);

        let url = format!("{}/scrape", inner.config.api_base_url);
        let params = [
            ("query", query.to_string()),
            ("location", location.to_string()),
            ("limit", limit.to_string()),
        ];
        let result: Result<ScrapeReport, ApiError> = request_with_retry(
            Operation::ScrapeJobs,
            0,
            inner.config.timeouts.scrape,
            || inner.http.post(&url).query(&params),
        )
        .await;

        self.finish_mutation(Operation::ScrapeJobs, result)
    }

    /// Keyword-targeted scrape across selected sites. Runs longer than the
    /// plain scrape, so it gets the widest timeout. Not retried.
    pub async fn scrape_jobs_efficient(
        &self,
        query: &str,
        location: &str,
        keywords: &[String],
        max_jobs: u32,
        sites: &[String],
    ) -> Result<ScrapeReport, ApiError> {
        let inner = &self.inner;
        inner.state.set_loading(Operation::ScrapeJobsEfficient, true);
        inner.state.clear_error(Operation::ScrapeJobsEfficient);

        let url = format!("{}/scrape-efficient", inner.config.api_base_url);
        let params = [
            ("query", query.to_string()),
            ("location", location.to_string()),
            ("keywords", keywords.join(",")),
            ("max_jobs", max_jobs.to_string()),
            ("sites", sites.join(",")),
        ];
        let result: Result<ScrapeReport, ApiError> = request_with_retry(
            Operation::ScrapeJobsEfficient,
            0,
            inner.config.timeouts.scrape_efficient,
            || inner.http.post(&url).query(&params),
        )
        .await;

        self.finish_mutation(Operation::ScrapeJobsEfficient, result)
    }

    /// Deletes backend mock data. Not retried; invalidates read caches on
    /// success.
    pub async fn clear_mock_data(&self) -> Result<ClearReport, ApiError> {
        let inner = &self.inner;
        inner.state.set_loading(Operation::ClearMockData, true);
        inner.state.clear_error(Operation::ClearMockData);

        let url = format!("{}/jobs/mock", inner.config.api_base_url);
        let result: Result<ClearReport, ApiError> = request_with_retry(
            Operation::ClearMockData,
            0,
            inner.config.timeouts.mutation,
            || inner.http.delete(&url),
        )
        .await;

        self.finish_mutation(Operation::ClearMockData, result)
    }

    /// Runs several scrapes sequentially so the backend is never hammered in
    /// parallel. A failed query does not stop the rest; each query's outcome
    /// is returned in order.
    pub async fn scrape_batch(
        &self,
        queries: &[ScrapeQuery],
        limit: u32,
    ) -> Vec<Result<ScrapeReport, ApiError>> {
        let mut results = Vec::with_capacity(queries.len());
        for q in queries {
            let result = self.scrape_jobs(&q.query, &q.location, limit).await;
            if let Err(err) = &result {
                warn!(query = %q.query, error = %err, "batch scrape query failed");
            }
            results.push(result);
        }
        results
    }

    /// Re-runs `get_jobs` on a fixed interval (first run immediate). The
    /// cache still applies, so a tick inside the TTL republishes without a
    /// network call. Abort the returned handle to stop.
    pub fn spawn_auto_refresh(
        &self,
        filters: JobSearchFilters,
        interval: Duration,
    ) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(err) = client.get_jobs(&filters).await {
                    warn!(error = %err, "auto refresh failed");
                }
            }
        })
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        lock(&self.inner.cache).clear();
    }

    fn finish_mutation<T>(&self, op: Operation, result: Result<T, ApiError>) -> Result<T, ApiError> {
        let inner = &self.inner;
        match result {
            Ok(value) => {
                inner.state.set_loading(op, false);
                self.invalidate_read_caches();
                Ok(value)
            }
            Err(err) => {
                error!(operation = %op, error = %err, "request failed");
                inner.state.set_error(op, err.to_string());
                inner.state.set_loading(op, false);
                Err(err)
            }
        }
    }

    fn invalidate_read_caches(&self) {
        let mut cache = lock(&self.inner.cache);
        let removed = cache.invalidate_prefix(&format!("{}_", Operation::GetJobs.name()))
            + cache.invalidate_prefix(&format!("{}_", Operation::GetStats.name()));
        debug!(removed, "read caches invalidated after mutation");
    }
}

fn stats_cache_key() -> String {
    format!("{}_{{}}", Operation::GetStats.name())
}

// ────────────────────────────────────────────────────────────────────────────
// Request plumbing
// ────────────────────────────────────────────────────────────────────────────

/// Issues the request up to `1 + retries` times. Only transient failures
/// (timeouts, connect errors, 429, 5xx) are retried, immediately and without
/// backoff; everything else returns on the first attempt.
async fn request_with_retry<T: DeserializeOwned>(
    op: Operation,
    retries: u32,
    timeout: Duration,
    build: impl Fn() -> reqwest::RequestBuilder,
) -> Result<T, ApiError> {
    let mut last_error: Option<ApiError> = None;

    for attempt in 0..=retries {
        if attempt > 0 {
            warn!(operation = %op, attempt, "retrying after transient failure");
        }

        let err = match execute::<T>(build().timeout(timeout)).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !err.is_transient() {
            return Err(err);
        }
        last_error = Some(err);
    }

    Err(last_error.unwrap_or(ApiError::Unreachable))
}

async fn execute<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        return Err(crate::errors::classify_error_response(response).await);
    }

    response.json::<T>().await.map_err(ApiError::from)
}

// ────────────────────────────────────────────────────────────────────────────
// In-flight coalescing
// ────────────────────────────────────────────────────────────────────────────

enum Flight<T> {
    /// This caller owns the fetch; everyone else joins it.
    Lead(broadcast::Sender<Result<T, ApiError>>),
    Join(broadcast::Receiver<Result<T, ApiError>>),
}

fn join_or_lead<T: Clone>(map: &InflightMap<T>, key: &str) -> Flight<T> {
    let mut inflight = lock(map);
    match inflight.get(key) {
        Some(tx) => Flight::Join(tx.subscribe()),
        None => {
            let (tx, _) = broadcast::channel(1);
            inflight.insert(key.to_string(), tx.clone());
            Flight::Lead(tx)
        }
    }
}

async fn await_shared<T: Clone>(
    mut rx: broadcast::Receiver<Result<T, ApiError>>,
) -> Result<T, ApiError> {
    match rx.recv().await {
        Ok(result) => result,
        // The producer sends exactly one result; a closed channel means its
        // task was torn down before completing.
        Err(_) => Err(ApiError::Unreachable),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned map still holds coherent data; keep serving it.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
