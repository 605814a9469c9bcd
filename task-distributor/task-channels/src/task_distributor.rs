// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_completion_signaling::ChannelCompletionSignaling;
use crate::channel_result_sender::ChannelResultSender;
use crate::channel_shutdown_signal::TokenShutdownSignal;
use crate::channel_work_sender::ChannelWorkSender;
use crate::producer::Producer;
use crate::tokio_runtime::TokioRuntime;
use crate::types::{ChannelExecutor, ResultQueueSender, WorkQueueReceiver};
use std::sync::Arc;
use task_distributor_core::completion_signaling::CompletionSignaling;
use task_distributor_core::config::DistributorConfig;
use task_distributor_core::error::{DistributorError, DrainError, FailureCause, PoolFailure};
use task_distributor_core::executor::{ExecutorSettings, ExecutorTask};
use task_distributor_core::shutdown_signal::ShutdownSignal;
use task_distributor_core::stats::{LocalStats, StatsRecorder};
use task_distributor_core::task_job::TaskJob;
use task_distributor_core::work_item::ResultItem;
use task_distributor_core::worker_runtime::WorkerRuntime;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

/// Executors spawned by `run`, waiting to be drained
struct RunningPool<H> {
    pool_size: usize,
    signaling: ChannelCompletionSignaling,
    handles: Vec<H>,
}

/// Fan-out/fan-in distributor over tokio channels
/// Generic over the job and the executor runtime (tokio tasks by default)
pub struct TaskDistributor<J, R = TokioRuntime>
where
    J: TaskJob,
    R: WorkerRuntime<ChannelExecutor<J>>,
{
    job: Arc<J>,
    config: DistributorConfig,
    producer: Producer<J::Item>,
    work_rx: Option<WorkQueueReceiver<J>>,
    result_tx: ResultQueueSender<J>,
    result_rx: Receiver<ResultItem<J::Output>>,
    pool: Option<RunningPool<R::Handle>>,
    stats: LocalStats,
    shutdown_signal: TokenShutdownSignal,
}

impl<J, R> TaskDistributor<J, R>
where
    J: TaskJob,
    R: WorkerRuntime<ChannelExecutor<J>>,
{
    pub fn new(job: J, config: DistributorConfig) -> Result<Self, DistributorError> {
        Self::with_parts(Arc::new(job), config, TokenShutdownSignal::default())
    }

    /// Build a distributor around a job that was initialized elsewhere
    pub fn with_parts(
        job: Arc<J>,
        config: DistributorConfig,
        shutdown_signal: TokenShutdownSignal,
    ) -> Result<Self, DistributorError> {
        config.validate()?;

        let stats = LocalStats::new();
        let (work_tx, work_rx) = ChannelWorkSender::create_pair(config.work_queue_capacity);
        let (result_tx, result_rx) = ChannelResultSender::create_pair(config.result_queue_capacity);
        let producer = Producer::new(work_tx, stats.clone(), shutdown_signal.clone());

        Ok(Self {
            job,
            config,
            producer,
            work_rx: Some(work_rx),
            result_tx,
            result_rx,
            pool: None,
            stats,
            shutdown_signal,
        })
    }

    pub fn stats(&self) -> &LocalStats {
        &self.stats
    }

    pub fn shutdown_signal(&self) -> &TokenShutdownSignal {
        &self.shutdown_signal
    }

    pub fn is_running(&self) -> bool {
        self.pool.is_some()
    }

    /// A handle for submitting from another task while this distributor drains
    pub fn producer(&self) -> Producer<J::Item> {
        self.producer.clone()
    }

    pub async fn submit(&self, item: J::Item) -> Result<u64, DistributorError> {
        self.producer.submit(item).await
    }

    pub fn close_input(&self) -> Result<(), DistributorError> {
        self.producer.close_input()
    }

    /// Start the configured number of executors
    pub fn start(&mut self) -> Result<(), DistributorError> {
        self.run(self.config.pool_size)
    }

    /// Start `pool_size` executors pulling from the work queue
    pub fn run(&mut self, pool_size: usize) -> Result<(), DistributorError> {
        if pool_size == 0 {
            return Err(DistributorError::InvalidPoolSize(pool_size));
        }
        let work_rx = self.work_rx.take().ok_or(DistributorError::AlreadyRunning)?;

        let signaling = ChannelCompletionSignaling::setup(pool_size);
        let settings = ExecutorSettings {
            item_timeout: self.config.item_timeout(),
            failure_limit: self.config.failure_limit(),
        };

        let handles = (0..pool_size)
            .map(|worker_id| {
                let task = ExecutorTask::new(
                    worker_id,
                    self.job.clone(),
                    work_rx.clone(),
                    self.result_tx.clone(),
                    signaling.get_token(worker_id),
                    self.shutdown_signal.clone(),
                    self.stats.clone(),
                    settings,
                );
                R::spawn(worker_id, task)
            })
            .collect();

        info!(pool_size, "executor pool started");
        self.pool = Some(RunningPool {
            pool_size,
            signaling,
            handles,
        });
        Ok(())
    }

    /// Collect every result once all executors have terminated
    ///
    /// Results are consumed while waiting, so a full result queue never stalls
    /// the pool. The result queue is closed only after every executor has been
    /// joined. Returns a single `PoolFailure` carrying the partial results if
    /// the pool was cancelled or an executor failed.
    pub async fn drain(self) -> Result<Vec<ResultItem<J::Output>>, DrainError<J::Output>> {
        let TaskDistributor {
            config,
            producer,
            result_tx,
            mut result_rx,
            pool,
            stats,
            shutdown_signal,
            ..
        } = self;

        let Some(RunningPool {
            pool_size,
            mut signaling,
            handles,
        }) = pool
        else {
            return Err(DistributorError::NotRunning.into());
        };

        // Our handle must not keep the input open once nobody else can submit
        drop(producer);

        let mut results = Vec::new();
        let mut terminated = 0;
        let mut failed_executors = Vec::new();
        let mut stopped_for_failed_executor = false;

        while terminated < pool_size {
            tokio::select! {
                Some(result) = result_rx.recv() => results.push(result),
                next = signaling.wait_next() => match next {
                    Some(Ok(worker_id)) => {
                        terminated += 1;
                        debug!(worker_id, terminated, pool_size, "executor finished");
                    }
                    Some(Err(worker_id)) => {
                        terminated += 1;
                        failed_executors.push(worker_id);
                        if !shutdown_signal.is_cancelled() {
                            warn!(worker_id, "executor failed, stopping the pool");
                            stopped_for_failed_executor = true;
                            shutdown_signal.cancel();
                        }
                    }
                    None => break,
                },
            }
        }

        let mut join_errors = Vec::new();
        for (worker_id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = R::join(handle).await {
                error!(worker_id, error = %e, "executor join failed");
                join_errors.push(format!("executor {}: {}", worker_id, e));
            }
        }

        // Every executor is gone; closing our sender closes the result queue
        drop(result_tx);
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }

        let snapshot = stats.snapshot();
        if failed_executors.is_empty() && join_errors.is_empty() {
            info!(
                results = results.len(),
                succeeded = snapshot.succeeded,
                failed = snapshot.failed,
                "executor pool drained"
            );
            return Ok(results);
        }

        failed_executors.sort_unstable();
        let cause = match config.failure_limit() {
            Some(limit) if snapshot.failed >= limit => FailureCause::FailureBudgetExceeded {
                failed: snapshot.failed,
                limit,
            },
            _ if shutdown_signal.is_cancelled() && !stopped_for_failed_executor => {
                FailureCause::Cancelled
            }
            _ => FailureCause::ExecutorsFailed,
        };

        error!(
            %cause,
            failed_executors = failed_executors.len(),
            partial_results = results.len(),
            in_flight = snapshot.in_flight(),
            dropped = snapshot.dropped,
            "executor pool failed"
        );

        Err(DrainError::Pool(PoolFailure {
            cause,
            failed_executors,
            join_errors,
            partial_results: results,
            stats: snapshot,
        }))
    }
}
