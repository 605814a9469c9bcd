// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;
use task_distributor_core::shutdown_signal::ShutdownSignal;
use tokio_util::sync::CancellationToken;

/// Tokio CancellationToken-based shutdown signal
/// Works for executors on tokio tasks and on dedicated threads alike
#[derive(Clone, Default)]
pub struct TokenShutdownSignal {
    token: CancellationToken,
}

impl TokenShutdownSignal {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl ShutdownSignal for TokenShutdownSignal {
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    fn cancel(&self) {
        self.token.cancel();
    }

    fn cancelled(&self) -> impl Future<Output = ()> + Send {
        self.token.cancelled()
    }
}
