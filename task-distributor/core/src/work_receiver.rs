// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;

/// Trait for receiving work items asynchronously
/// Every clone pulls from the same queue and each item is delivered to exactly one clone
#[async_trait]
pub trait WorkReceiver<A>: Clone + Send + 'static {
    /// Receive the next item
    /// Returns None once the queue is closed and empty
    async fn recv(&mut self) -> Option<A>;
}
