// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stats::PoolStats;
use crate::work_item::ResultItem;
use std::fmt;
use thiserror::Error;

/// Lifecycle errors returned directly to the caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributorError {
    #[error("cannot submit work: input queue is already closed")]
    SubmitAfterClose,

    #[error("input queue was already closed")]
    InputAlreadyClosed,

    #[error("executor pool is already running")]
    AlreadyRunning,

    #[error("executor pool was never started")]
    NotRunning,

    #[error("invalid pool size {0} (must be > 0)")]
    InvalidPoolSize(usize),

    #[error("operation cancelled by shutdown signal")]
    Cancelled,

    #[error("work queue disconnected: no executor can receive work")]
    QueueDisconnected,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid pool size: {value} (must be > 0)")]
    InvalidPoolSize { value: usize },

    #[error("invalid {queue} queue capacity: {value} (must be > 0)")]
    InvalidQueueCapacity { queue: &'static str, value: usize },

    #[error("invalid probability for {field}: {value} (must be 0-100)")]
    InvalidProbability { field: &'static str, value: u32 },
}

/// What brought the whole pool down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The shutdown signal fired before all work was processed
    Cancelled,
    /// Too many items failed and the pool was stopped
    FailureBudgetExceeded { failed: usize, limit: usize },
    /// One or more executors did not exit cleanly
    ExecutorsFailed,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Cancelled => write!(f, "pool cancelled"),
            FailureCause::FailureBudgetExceeded { failed, limit } => {
                write!(f, "{} item failures reached the limit of {}", failed, limit)
            }
            FailureCause::ExecutorsFailed => write!(f, "executors failed"),
        }
    }
}

/// Single aggregated failure for the whole pool
/// Results produced before the failure are kept in `partial_results`
#[derive(Debug)]
pub struct PoolFailure<O> {
    pub cause: FailureCause,
    pub failed_executors: Vec<usize>,
    pub join_errors: Vec<String>,
    pub partial_results: Vec<ResultItem<O>>,
    pub stats: PoolStats,
}

impl<O> fmt::Display for PoolFailure<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task pool failed ({}): {} executor(s) failed, {} partial result(s) kept",
            self.cause,
            self.failed_executors.len(),
            self.partial_results.len()
        )?;
        if !self.join_errors.is_empty() {
            write!(f, ", join errors: [{}]", self.join_errors.join("; "))?;
        }
        Ok(())
    }
}

impl<O: fmt::Debug> std::error::Error for PoolFailure<O> {}

/// Error returned by `drain`
#[derive(Debug)]
pub enum DrainError<O> {
    Distributor(DistributorError),
    Pool(PoolFailure<O>),
}

impl<O> DrainError<O> {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            DrainError::Pool(PoolFailure {
                cause: FailureCause::Cancelled,
                ..
            })
        )
    }

    /// Results already produced before the failure, if any
    pub fn into_partial_results(self) -> Vec<ResultItem<O>> {
        match self {
            DrainError::Distributor(_) => Vec::new(),
            DrainError::Pool(failure) => failure.partial_results,
        }
    }
}

impl<O> From<DistributorError> for DrainError<O> {
    fn from(error: DistributorError) -> Self {
        DrainError::Distributor(error)
    }
}

impl<O> fmt::Display for DrainError<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrainError::Distributor(error) => write!(f, "{}", error),
            DrainError::Pool(failure) => write!(f, "{}", failure),
        }
    }
}

impl<O: fmt::Debug> std::error::Error for DrainError<O> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrainError::Distributor(error) => Some(error),
            DrainError::Pool(_) => None,
        }
    }
}
