// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::thread::{self, JoinHandle};
use task_distributor_core::utils::panic_message;
use task_distributor_core::worker_runtime::{Runnable, WorkerRuntime};
use tracing::error;

type ThreadError = Box<dyn std::error::Error + Send + Sync>;

/// Thread-based runtime
/// Each executor gets its own OS thread driving a current-thread tokio runtime
#[derive(Clone, Copy)]
pub struct ThreadRuntime;

impl<T> WorkerRuntime<T> for ThreadRuntime
where
    T: Runnable<Output = ()>,
{
    /// None when the thread could not be spawned; the task was dropped and reported failure
    type Handle = Option<JoinHandle<()>>;
    type Error = ThreadError;

    fn spawn(id: usize, task: T) -> Self::Handle {
        let spawned = thread::Builder::new()
            .name(format!("task-executor-{}", id))
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(task.run()),
                    Err(e) => {
                        error!(worker_id = id, error = %e, "failed to build executor runtime");
                        drop(task);
                    }
                }
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(worker_id = id, error = %e, "failed to spawn executor thread");
                None
            }
        }
    }

    async fn join(handle: Self::Handle) -> Result<(), Self::Error> {
        let handle =
            handle.ok_or_else(|| -> ThreadError { "executor thread was never started".into() })?;

        tokio::task::spawn_blocking(move || {
            handle.join().map_err(|e| -> ThreadError {
                format!("Thread join error: {}", panic_message(e.as_ref())).into()
            })
        })
        .await
        .map_err(|e| -> ThreadError { format!("Tokio join error: {}", e).into() })?
    }
}
