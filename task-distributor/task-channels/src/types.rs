// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_completion_signaling::ChannelCompletionToken;
use crate::channel_result_sender::ChannelResultSender;
use crate::channel_shutdown_signal::TokenShutdownSignal;
use crate::channel_work_receiver::ChannelWorkReceiver;
use task_distributor_core::executor::ExecutorTask;
use task_distributor_core::stats::LocalStats;
use task_distributor_core::task_job::TaskJob;
use task_distributor_core::work_item::{ResultItem, WorkItem};

pub type WorkQueueReceiver<J> = ChannelWorkReceiver<WorkItem<<J as TaskJob>::Item>>;

pub type ResultQueueSender<J> = ChannelResultSender<ResultItem<<J as TaskJob>::Output>>;

/// Executor wired to the tokio channel implementations
pub type ChannelExecutor<J> = ExecutorTask<
    J,
    WorkQueueReceiver<J>,
    ResultQueueSender<J>,
    ChannelCompletionToken,
    TokenShutdownSignal,
    LocalStats,
>;
