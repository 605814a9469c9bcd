// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod completion_signaling;
pub mod config;
pub mod error;
pub mod executor;
pub mod executor_state;
pub mod result_sender;
pub mod shutdown_signal;
pub mod stats;
pub mod task_job;
pub mod utils;
pub mod work_item;
pub mod work_receiver;
pub mod work_sender;
pub mod worker_runtime;
