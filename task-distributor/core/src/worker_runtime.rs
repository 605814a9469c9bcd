// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::future::Future;

/// Defines a unit of work that can be executed
#[async_trait]
pub trait Runnable: Send + 'static {
    type Output;
    async fn run(self) -> Self::Output;
}

/// Trait for abstracting executor runtime (tasks, threads)
pub trait WorkerRuntime<Task>: Send + Sync + 'static {
    type Handle: Send;
    type Error: std::fmt::Display + Send;

    /// Spawn an executor task/thread
    fn spawn(id: usize, task: Task) -> Self::Handle;

    /// Wait for the executor to complete
    fn join(handle: Self::Handle) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
