// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of work handed to the distributor
/// `seq` is assigned at submission time and is unique per distributor
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkItem<T> {
    pub seq: u64,
    pub payload: T,
}

impl<T> WorkItem<T> {
    pub fn new(seq: u64, payload: T) -> Self {
        Self { seq, payload }
    }
}

/// Why a single item could not be processed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The job returned an error
    Error,
    /// The job panicked while processing the item
    Panic,
    /// The job exceeded the per-item timeout
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Error => write!(f, "error"),
            FailureKind::Panic => write!(f, "panic"),
            FailureKind::Timeout => write!(f, "timeout"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ItemFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Tagged outcome of processing one item
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<O> {
    Success(O),
    Failure(ItemFailure),
}

impl<O> ItemOutcome<O> {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }

    pub fn output(&self) -> Option<&O> {
        match self {
            ItemOutcome::Success(output) => Some(output),
            ItemOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ItemFailure> {
        match self {
            ItemOutcome::Success(_) => None,
            ItemOutcome::Failure(failure) => Some(failure),
        }
    }
}

/// Output produced by an executor for one work item
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultItem<O> {
    /// Sequence number of the originating work item
    pub seq: u64,
    /// Executor that processed the item
    pub worker_id: usize,
    pub outcome: ItemOutcome<O>,
}

impl<O> ResultItem<O> {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn output(&self) -> Option<&O> {
        self.outcome.output()
    }
}
