// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::DistributorError;
use async_trait::async_trait;

/// Trait for the producer side of the work queue
/// Different implementations for channels, sockets, etc.
#[async_trait]
pub trait WorkSender<A>: Clone + Send + Sync + 'static {
    /// Enqueue one item, suspending while the queue is full
    /// Fails with `SubmitAfterClose` once the queue has been closed
    async fn send(&self, item: A) -> Result<(), DistributorError>;

    /// Close the queue so receivers terminate once it is empty
    /// Closing is irreversible; a second call fails with `InputAlreadyClosed`
    fn close(&self) -> Result<(), DistributorError>;

    fn is_closed(&self) -> bool;
}
