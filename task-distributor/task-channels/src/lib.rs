// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod channel_completion_signaling;
pub mod channel_result_sender;
pub mod channel_shutdown_signal;
pub mod channel_work_receiver;
pub mod channel_work_sender;
pub mod config;
pub mod producer;
pub mod task_distributor;
pub mod thread_runtime;
pub mod tokio_runtime;
pub mod types;

pub use channel_shutdown_signal::TokenShutdownSignal;
pub use producer::Producer;
pub use task_distributor::TaskDistributor;
pub use thread_runtime::ThreadRuntime;
pub use tokio_runtime::TokioRuntime;
