// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;

/// Completion message: Ok(worker_id) for a clean exit, Err for a failed one
pub type CompletionMessage = Result<usize, ()>;

/// Token handed to one executor to report its termination
pub trait CompletionToken: Clone + Send + Sync + 'static {
    /// Report termination without suspending
    /// Returns true if the signal was delivered
    fn complete(&self, message: CompletionMessage) -> bool;
}

/// Trait for abstracting the completion barrier (wait-group)
pub trait CompletionSignaling: Send {
    /// The token type passed to executors for signaling completion
    type Token: CompletionToken;

    /// Setup completion signaling for N executors
    fn setup(num_workers: usize) -> Self;

    /// Get the completion token for a specific executor
    fn get_token(&self, worker_id: usize) -> Self::Token;

    /// Wait for the next executor to terminate
    /// Returns Ok(worker_id) on clean exit, Err(worker_id) on failure
    /// Returns None if all executors are done
    fn wait_next(&mut self) -> impl Future<Output = Option<Result<usize, usize>>> + Send;
}
