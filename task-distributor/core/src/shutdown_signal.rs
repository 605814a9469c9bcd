// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;

/// Trait for shutdown signaling
/// Observed by producers and executors at every suspension point
pub trait ShutdownSignal: Clone + Send + Sync + 'static {
    fn is_cancelled(&self) -> bool;

    /// Request shutdown of every holder of this signal
    fn cancel(&self);

    /// Resolves once shutdown has been requested
    fn cancelled(&self) -> impl Future<Output = ()> + Send;
}
