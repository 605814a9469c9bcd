// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;

/// Why a result could not be enqueued without suspending
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrySendError<R> {
    /// The queue is at capacity; the result is handed back
    Full(R),
    /// The collector is gone
    Closed,
}

/// Trait for pushing results to the collector
#[async_trait]
pub trait ResultSender<R>: Clone + Send + Sync + 'static {
    /// Send a result, suspending while the result queue is full
    /// Returns true if the result was enqueued, false if the collector is gone
    async fn send(&self, result: R) -> bool;

    /// Enqueue a result only if there is room right now
    fn try_send(&self, result: R) -> Result<(), TrySendError<R>>;
}
