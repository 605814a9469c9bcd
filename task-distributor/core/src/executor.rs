// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::completion_signaling::CompletionToken;
use crate::executor_state::ExecutorState;
use crate::result_sender::{ResultSender, TrySendError};
use crate::shutdown_signal::ShutdownSignal;
use crate::stats::StatsRecorder;
use crate::task_job::TaskJob;
use crate::utils::panic_message;
use crate::work_item::{FailureKind, ItemFailure, ItemOutcome, ResultItem, WorkItem};
use crate::work_receiver::WorkReceiver;
use crate::worker_runtime::Runnable;
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// Per-executor limits taken from the distributor configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutorSettings {
    pub item_timeout: Option<Duration>,
    pub failure_limit: Option<usize>,
}

/// Reports termination exactly once, on every exit path of an executor
///
/// A guard that is dropped without `mark_clean_exit` (cancellation, a closed
/// result queue, a panic unwinding through the executor, or a task that was
/// never polled) reports a failed exit.
pub struct CompletionGuard<CT: CompletionToken, ST: StatsRecorder> {
    worker_id: usize,
    token: CT,
    stats: ST,
    clean_exit: bool,
}

impl<CT: CompletionToken, ST: StatsRecorder> CompletionGuard<CT, ST> {
    pub fn new(worker_id: usize, token: CT, stats: ST) -> Self {
        Self {
            worker_id,
            token,
            stats,
            clean_exit: false,
        }
    }

    pub fn mark_clean_exit(&mut self) {
        self.clean_exit = true;
    }
}

impl<CT: CompletionToken, ST: StatsRecorder> Drop for CompletionGuard<CT, ST> {
    fn drop(&mut self) {
        // Stats first: the barrier must never observe a termination the counters miss
        self.stats.record_terminated(self.worker_id);

        let message = if self.clean_exit {
            Ok(self.worker_id)
        } else {
            Err(())
        };
        if !self.token.complete(message) {
            warn!(
                worker_id = self.worker_id,
                "completion signal could not be delivered"
            );
        }
    }
}

/// One executor of the pool
/// Generic over job, work queue, result queue, completion token, shutdown and stats
pub struct ExecutorTask<J, WR, RS, CT, SD, ST>
where
    J: TaskJob,
    WR: WorkReceiver<WorkItem<J::Item>>,
    RS: ResultSender<ResultItem<J::Output>>,
    CT: CompletionToken,
    SD: ShutdownSignal,
    ST: StatsRecorder,
{
    id: usize,
    job: Arc<J>,
    work_rx: WR,
    result_tx: RS,
    shutdown_signal: SD,
    stats: ST,
    settings: ExecutorSettings,
    guard: CompletionGuard<CT, ST>,
}

impl<J, WR, RS, CT, SD, ST> ExecutorTask<J, WR, RS, CT, SD, ST>
where
    J: TaskJob,
    WR: WorkReceiver<WorkItem<J::Item>>,
    RS: ResultSender<ResultItem<J::Output>>,
    CT: CompletionToken,
    SD: ShutdownSignal,
    ST: StatsRecorder,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        job: Arc<J>,
        work_rx: WR,
        result_tx: RS,
        completion: CT,
        shutdown_signal: SD,
        stats: ST,
        settings: ExecutorSettings,
    ) -> Self {
        let guard = CompletionGuard::new(id, completion, stats.clone());
        Self {
            id,
            job,
            work_rx,
            result_tx,
            shutdown_signal,
            stats,
            settings,
            guard,
        }
    }
}

#[async_trait]
impl<J, WR, RS, CT, SD, ST> Runnable for ExecutorTask<J, WR, RS, CT, SD, ST>
where
    J: TaskJob,
    WR: WorkReceiver<WorkItem<J::Item>>,
    RS: ResultSender<ResultItem<J::Output>>,
    CT: CompletionToken,
    SD: ShutdownSignal,
    ST: StatsRecorder,
{
    type Output = ();

    async fn run(self) {
        let ExecutorTask {
            id,
            job,
            mut work_rx,
            result_tx,
            shutdown_signal,
            stats,
            settings,
            mut guard,
        } = self;

        stats.record_started(id);
        debug!(worker_id = id, "executor started");
        let mut state = ExecutorState::Idle;

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown_signal.cancelled() => {
                    debug!(worker_id = id, "executor cancelled while waiting for work");
                    advance(id, state, ExecutorState::Terminated);
                    return;
                }
                item = work_rx.recv() => item,
            };

            let Some(item) = next else {
                break;
            };

            stats.record_dequeued(id);
            state = advance(id, state, ExecutorState::Processing);

            let outcome = process_item(job.as_ref(), &item.payload, settings.item_timeout).await;
            let failed_total = match &outcome {
                ItemOutcome::Success(_) => {
                    stats.record_success(id);
                    None
                }
                ItemOutcome::Failure(failure) => {
                    warn!(worker_id = id, seq = item.seq, %failure, "item failed");
                    Some(stats.record_failure(id))
                }
            };

            let result = ResultItem {
                seq: item.seq,
                worker_id: id,
                outcome,
            };

            // A finished result is published whenever the queue has room, cancelled or not
            let sent = match result_tx.try_send(result) {
                Ok(()) => true,
                Err(TrySendError::Closed) => false,
                Err(TrySendError::Full(result)) => tokio::select! {
                    biased;
                    sent = result_tx.send(result) => sent,
                    _ = shutdown_signal.cancelled() => {
                        stats.record_dropped(id);
                        warn!(worker_id = id, seq = item.seq, "executor cancelled on a full result queue, result dropped");
                        return;
                    }
                },
            };
            if !sent {
                stats.record_dropped(id);
                error!(worker_id = id, seq = item.seq, "result queue closed, executor stopping");
                return;
            }

            if let (Some(failed), Some(limit)) = (failed_total, settings.failure_limit) {
                if failed >= limit && !shutdown_signal.is_cancelled() {
                    error!(
                        worker_id = id,
                        failed, limit, "item failure limit reached, stopping the pool"
                    );
                    shutdown_signal.cancel();
                }
            }

            state = advance(id, state, ExecutorState::Idle);
        }

        advance(id, state, ExecutorState::Terminated);
        debug!(worker_id = id, "work queue closed and empty, executor terminated");
        guard.mark_clean_exit();
    }
}

fn advance(worker_id: usize, state: ExecutorState, next: ExecutorState) -> ExecutorState {
    debug_assert!(
        state.can_transition_to(next),
        "executor {} cannot move from {} to {}",
        worker_id,
        state,
        next
    );
    trace!(worker_id, from = %state, to = %next, "executor state change");
    next
}

/// Run the job on one item, turning errors, panics and timeouts into tagged failures
pub async fn process_item<J: TaskJob>(
    job: &J,
    item: &J::Item,
    timeout: Option<Duration>,
) -> ItemOutcome<J::Output> {
    let guarded = AssertUnwindSafe(job.process(item)).catch_unwind();

    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(result) => result,
            Err(_) => {
                return ItemOutcome::Failure(ItemFailure::new(
                    FailureKind::Timeout,
                    format!("exceeded {}ms", limit.as_millis()),
                ))
            }
        },
        None => guarded.await,
    };

    match result {
        Ok(Ok(output)) => ItemOutcome::Success(output),
        Ok(Err(error)) => {
            ItemOutcome::Failure(ItemFailure::new(FailureKind::Error, error.to_string()))
        }
        Err(payload) => ItemOutcome::Failure(ItemFailure::new(
            FailureKind::Panic,
            panic_message(payload.as_ref()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LocalStats;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    struct HalvingJob;

    #[async_trait]
    impl TaskJob for HalvingJob {
        type Item = i64;
        type Output = i64;
        type Error = String;

        async fn process(&self, item: &i64) -> Result<i64, String> {
            match *item {
                i if i < 0 => panic!("negative input {}", i),
                i if i % 2 == 1 => Err(format!("{} is odd", i)),
                0 => {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    Ok(0)
                }
                i => Ok(i / 2),
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingToken {
        messages: Arc<Mutex<Vec<Result<usize, ()>>>>,
    }

    impl CompletionToken for RecordingToken {
        fn complete(&self, message: Result<usize, ()>) -> bool {
            self.messages.lock().unwrap().push(message);
            true
        }
    }

    #[derive(Clone, Default)]
    struct FlagSignal {
        flag: Arc<AtomicBool>,
    }

    impl ShutdownSignal for FlagSignal {
        fn is_cancelled(&self) -> bool {
            self.flag.load(Ordering::SeqCst)
        }

        fn cancel(&self) {
            self.flag.store(true, Ordering::SeqCst);
        }

        fn cancelled(&self) -> impl Future<Output = ()> + Send {
            let cancelled = self.is_cancelled();
            async move {
                if !cancelled {
                    std::future::pending::<()>().await;
                }
            }
        }
    }

    /// Echoes the item after cancelling the pool mid-item
    struct CancellingJob {
        signal: FlagSignal,
    }

    #[async_trait]
    impl TaskJob for CancellingJob {
        type Item = i64;
        type Output = i64;
        type Error = String;

        async fn process(&self, item: &i64) -> Result<i64, String> {
            self.signal.cancel();
            Ok(*item)
        }
    }

    #[derive(Clone)]
    struct QueueReceiver {
        items: Arc<Mutex<VecDeque<WorkItem<i64>>>>,
    }

    impl QueueReceiver {
        fn with_items(payloads: &[i64]) -> Self {
            let items = payloads
                .iter()
                .enumerate()
                .map(|(seq, payload)| WorkItem::new(seq as u64, *payload))
                .collect();
            Self {
                items: Arc::new(Mutex::new(items)),
            }
        }
    }

    #[async_trait]
    impl WorkReceiver<WorkItem<i64>> for QueueReceiver {
        async fn recv(&mut self) -> Option<WorkItem<i64>> {
            self.items.lock().unwrap().pop_front()
        }
    }

    #[derive(Clone, Default)]
    struct CollectingSender {
        results: Arc<Mutex<Vec<ResultItem<i64>>>>,
    }

    #[async_trait]
    impl ResultSender<ResultItem<i64>> for CollectingSender {
        async fn send(&self, result: ResultItem<i64>) -> bool {
            self.results.lock().unwrap().push(result);
            true
        }

        fn try_send(&self, result: ResultItem<i64>) -> Result<(), TrySendError<ResultItem<i64>>> {
            self.results.lock().unwrap().push(result);
            Ok(())
        }
    }

    /// A result queue that never frees up
    #[derive(Clone)]
    struct FullSender;

    #[async_trait]
    impl ResultSender<ResultItem<i64>> for FullSender {
        async fn send(&self, _result: ResultItem<i64>) -> bool {
            std::future::pending::<bool>().await
        }

        fn try_send(&self, result: ResultItem<i64>) -> Result<(), TrySendError<ResultItem<i64>>> {
            Err(TrySendError::Full(result))
        }
    }

    #[tokio::test]
    async fn test_process_item_tags_every_outcome() {
        let job = HalvingJob;
        assert_eq!(process_item(&job, &8, None).await, ItemOutcome::Success(4));

        let failed = process_item(&job, &3, None).await;
        assert_eq!(failed.failure().map(|f| f.kind), Some(FailureKind::Error));
        assert_eq!(failed.failure().unwrap().message, "3 is odd");

        let panicked = process_item(&job, &-1, None).await;
        assert_eq!(panicked.failure().map(|f| f.kind), Some(FailureKind::Panic));
        assert_eq!(panicked.failure().unwrap().message, "negative input -1");

        let timed_out = process_item(&job, &0, Some(Duration::from_millis(20))).await;
        assert_eq!(
            timed_out.failure().map(|f| f.kind),
            Some(FailureKind::Timeout)
        );
    }

    #[tokio::test]
    async fn test_result_finished_after_cancellation_is_published() {
        let signal = FlagSignal::default();
        let job = Arc::new(CancellingJob {
            signal: signal.clone(),
        });
        let sender = CollectingSender::default();
        let token = RecordingToken::default();
        let stats = LocalStats::new();

        let task = ExecutorTask::new(
            0,
            job,
            QueueReceiver::with_items(&[5, 6]),
            sender.clone(),
            token.clone(),
            signal,
            stats.clone(),
            ExecutorSettings::default(),
        );
        task.run().await;

        let results = sender.results.lock().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].seq, 0);
        assert_eq!(results[0].output(), Some(&5));
        assert_eq!(*token.messages.lock().unwrap(), vec![Err(())]);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.dequeued, 1);
        assert_eq!(snapshot.dropped, 0);
        assert_eq!(snapshot.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_result_abandoned_on_full_queue_is_counted() {
        let signal = FlagSignal::default();
        let job = Arc::new(CancellingJob {
            signal: signal.clone(),
        });
        let token = RecordingToken::default();
        let stats = LocalStats::new();

        let task = ExecutorTask::new(
            3,
            job,
            QueueReceiver::with_items(&[9]),
            FullSender,
            token.clone(),
            signal,
            stats.clone(),
            ExecutorSettings::default(),
        );
        task.run().await;

        assert_eq!(*token.messages.lock().unwrap(), vec![Err(())]);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.succeeded, 1);
        assert_eq!(snapshot.dropped, 1);
        assert_eq!(snapshot.published(), 0);
        assert_eq!(snapshot.in_flight(), 1);
        assert_eq!(snapshot.executors_terminated, 1);
    }

    #[test]
    fn test_guard_reports_failure_unless_marked_clean() {
        let token = RecordingToken::default();
        let stats = LocalStats::new();

        drop(CompletionGuard::new(3, token.clone(), stats.clone()));
        let mut clean = CompletionGuard::new(4, token.clone(), stats.clone());
        clean.mark_clean_exit();
        drop(clean);

        assert_eq!(*token.messages.lock().unwrap(), vec![Err(()), Ok(4)]);
        assert_eq!(stats.snapshot().executors_terminated, 2);
    }

    #[test]
    fn test_guard_reports_failure_when_unwinding() {
        let token = RecordingToken::default();
        let stats = LocalStats::new();

        let guard_token = token.clone();
        let guard_stats = stats.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = CompletionGuard::new(9, guard_token, guard_stats);
            panic!("executor crashed");
        });

        assert!(result.is_err());
        assert_eq!(*token.messages.lock().unwrap(), vec![Err(())]);
        assert_eq!(stats.snapshot().executors_terminated, 1);
    }
}
