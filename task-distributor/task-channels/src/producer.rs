// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_shutdown_signal::TokenShutdownSignal;
use crate::channel_work_sender::ChannelWorkSender;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use task_distributor_core::error::DistributorError;
use task_distributor_core::shutdown_signal::ShutdownSignal;
use task_distributor_core::stats::{LocalStats, StatsRecorder};
use task_distributor_core::work_item::WorkItem;
use task_distributor_core::work_sender::WorkSender;
use tracing::{debug, trace};

/// Cloneable handle for feeding the work queue
///
/// Dropping the last handle without calling `close_input` also closes the queue.
pub struct Producer<T> {
    work_tx: ChannelWorkSender<WorkItem<T>>,
    next_seq: Arc<AtomicU64>,
    stats: LocalStats,
    shutdown_signal: TokenShutdownSignal,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            work_tx: self.work_tx.clone(),
            next_seq: self.next_seq.clone(),
            stats: self.stats.clone(),
            shutdown_signal: self.shutdown_signal.clone(),
        }
    }
}

impl<T: Send + 'static> Producer<T> {
    pub(crate) fn new(
        work_tx: ChannelWorkSender<WorkItem<T>>,
        stats: LocalStats,
        shutdown_signal: TokenShutdownSignal,
    ) -> Self {
        Self {
            work_tx,
            next_seq: Arc::new(AtomicU64::new(0)),
            stats,
            shutdown_signal,
        }
    }

    /// Enqueue one item and return its sequence number
    /// Suspends while the work queue is full
    pub async fn submit(&self, item: T) -> Result<u64, DistributorError> {
        if self.work_tx.is_closed() {
            return Err(DistributorError::SubmitAfterClose);
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        tokio::select! {
            biased;
            _ = self.shutdown_signal.cancelled() => Err(DistributorError::Cancelled),
            sent = self.work_tx.send(WorkItem::new(seq, item)) => {
                sent?;
                self.stats.record_submitted();
                trace!(seq, "work item submitted");
                Ok(seq)
            }
        }
    }

    /// Signal that no further items will be submitted
    pub fn close_input(&self) -> Result<(), DistributorError> {
        self.work_tx.close()?;
        debug!(
            submitted = self.stats.snapshot().submitted,
            "work queue closed"
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.work_tx.is_closed()
    }
}
