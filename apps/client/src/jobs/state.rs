//! Observable session state for the jobs façade.
//!
//! Everything consumers can watch lives here: per-operation loading flags,
//! per-operation error messages, the current job list and the current stats.
//! State is published over `tokio::sync::watch`, so a subscriber created
//! after a value was published still observes that value immediately.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::watch;

use crate::jobs::models::{Job, JobStats};

/// The closed set of façade operations. Loading flags, error slots and cache
/// key prefixes are keyed by this enum, never by free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetJobs,
    ScrapeJobs,
    ScrapeJobsEfficient,
    GetStats,
    ClearMockData,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetJobs => "get_jobs",
            Operation::ScrapeJobs => "scrape_jobs",
            Operation::ScrapeJobsEfficient => "scrape_jobs_efficient",
            Operation::GetStats => "get_stats",
            Operation::ClearMockData => "clear_mock_data",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type LoadingState = HashMap<Operation, bool>;
pub type ErrorState = HashMap<Operation, String>;

/// Shared observable state, injected into the façade at construction.
/// There is deliberately no global instance; owners decide the sharing scope.
pub struct StateHub {
    loading_tx: watch::Sender<LoadingState>,
    errors_tx: watch::Sender<ErrorState>,
    jobs_tx: watch::Sender<Vec<Job>>,
    stats_tx: watch::Sender<Option<JobStats>>,
}

impl Default for StateHub {
    fn default() -> Self {
        Self::new()
    }
}

impl StateHub {
    pub fn new() -> Self {
        let (loading_tx, _) = watch::channel(LoadingState::new());
        let (errors_tx, _) = watch::channel(ErrorState::new());
        let (jobs_tx, _) = watch::channel(Vec::new());
        let (stats_tx, _) = watch::channel(None);
        Self {
            loading_tx,
            errors_tx,
            jobs_tx,
            stats_tx,
        }
    }

    /// Flip an operation's loading flag.
    pub fn set_loading(&self, op: Operation, loading: bool) {
        self.loading_tx.send_modify(|state| {
            state.insert(op, loading);
        });
    }

    pub fn is_loading(&self, op: Operation) -> bool {
        self.loading_tx.borrow().get(&op).copied().unwrap_or(false)
    }

    /// Record an operation's terminal error. It stays visible until cleared
    /// or until the next attempt starts.
    pub fn set_error(&self, op: Operation, message: impl Into<String>) {
        let message = message.into();
        self.errors_tx.send_modify(|state| {
            state.insert(op, message.clone());
        });
    }

    pub fn clear_error(&self, op: Operation) {
        self.errors_tx.send_modify(|state| {
            state.remove(&op);
        });
    }

    pub fn error(&self, op: Operation) -> Option<String> {
        self.errors_tx.borrow().get(&op).cloned()
    }

    /// Replace the published job list.
    pub fn publish_jobs(&self, jobs: Vec<Job>) {
        self.jobs_tx.send_replace(jobs);
    }

    pub fn current_jobs(&self) -> Vec<Job> {
        self.jobs_tx.borrow().clone()
    }

    pub fn publish_stats(&self, stats: JobStats) {
        self.stats_tx.send_replace(Some(stats));
    }

    pub fn current_stats(&self) -> Option<JobStats> {
        self.stats_tx.borrow().clone()
    }

    /// Subscribe to loading-state changes. The receiver starts at the
    /// current value.
    pub fn watch_loading(&self) -> watch::Receiver<LoadingState> {
        self.loading_tx.subscribe()
    }

    pub fn watch_errors(&self) -> watch::Receiver<ErrorState> {
        self.errors_tx.subscribe()
    }

    pub fn watch_jobs(&self) -> watch::Receiver<Vec<Job>> {
        self.jobs_tx.subscribe()
    }

    pub fn watch_stats(&self) -> watch::Receiver<Option<JobStats>> {
        self.stats_tx.subscribe()
    }
}
