// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use task_distributor_core::task_job::TaskJob;
use thiserror::Error;

/// Doubles every work item
#[derive(Debug, Clone, Copy, Default)]
pub struct DoublingJob;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DoublingError {
    #[error("doubling {0} overflows i64")]
    Overflow(i64),
}

impl DoublingJob {
    pub fn double(value: i64) -> Result<i64, DoublingError> {
        value.checked_mul(2).ok_or(DoublingError::Overflow(value))
    }
}

#[async_trait]
impl TaskJob for DoublingJob {
    type Item = i64;
    type Output = i64;
    type Error = DoublingError;

    async fn process(&self, item: &i64) -> Result<i64, DoublingError> {
        Self::double(*item)
    }
}
