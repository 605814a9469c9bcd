// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Point-in-time view of the pool counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub submitted: usize,
    pub dequeued: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Processed items whose result was abandoned on cancellation
    pub dropped: usize,
    pub executors_started: usize,
    pub executors_terminated: usize,
    /// Items processed per executor id
    pub processed_by_executor: BTreeMap<usize, usize>,
}

impl PoolStats {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Items whose result reached the result queue
    pub fn published(&self) -> usize {
        self.processed().saturating_sub(self.dropped)
    }

    /// Items taken off the work queue that never produced a published result
    pub fn in_flight(&self) -> usize {
        self.dequeued.saturating_sub(self.published())
    }
}

/// Counter object injected into every executor and producer
pub trait StatsRecorder: Clone + Send + Sync + 'static {
    fn record_submitted(&self);
    fn record_dequeued(&self, worker_id: usize);
    fn record_success(&self, worker_id: usize);

    /// Returns the total number of failed items after recording this one
    fn record_failure(&self, worker_id: usize) -> usize;

    /// A processed item whose result could not be published
    fn record_dropped(&self, worker_id: usize);

    fn record_started(&self, worker_id: usize);
    fn record_terminated(&self, worker_id: usize);
    fn snapshot(&self) -> PoolStats;
}

/// Local in-memory stats using Arc<Mutex<PoolStats>>
#[derive(Clone, Default)]
pub struct LocalStats {
    inner: Arc<Mutex<PoolStats>>,
}

impl LocalStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PoolStats> {
        // Counters stay meaningful even if a holder panicked mid-update
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatsRecorder for LocalStats {
    fn record_submitted(&self) {
        self.lock().submitted += 1;
    }

    fn record_dequeued(&self, _worker_id: usize) {
        self.lock().dequeued += 1;
    }

    fn record_success(&self, worker_id: usize) {
        let mut stats = self.lock();
        stats.succeeded += 1;
        *stats.processed_by_executor.entry(worker_id).or_default() += 1;
    }

    fn record_failure(&self, worker_id: usize) -> usize {
        let mut stats = self.lock();
        stats.failed += 1;
        *stats.processed_by_executor.entry(worker_id).or_default() += 1;
        stats.failed
    }

    fn record_dropped(&self, _worker_id: usize) {
        self.lock().dropped += 1;
    }

    fn record_started(&self, _worker_id: usize) {
        self.lock().executors_started += 1;
    }

    fn record_terminated(&self, _worker_id: usize) {
        self.lock().executors_terminated += 1;
    }

    fn snapshot(&self) -> PoolStats {
        self.lock().clone()
    }
}
