// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DistributorConfig {
    /// Number of concurrent executors
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Capacity of the work queue before `submit` applies backpressure
    #[serde(default = "default_queue_capacity")]
    pub work_queue_capacity: usize,
    /// Capacity of the result queue before executors block on output
    #[serde(default = "default_queue_capacity")]
    pub result_queue_capacity: usize,
    /// Maximum allowed processing time per item in milliseconds (0 = no timeout)
    #[serde(default)]
    pub item_timeout_ms: u64,
    /// Number of failed items that stops the whole pool (0 = unlimited)
    #[serde(default)]
    pub max_item_failures: usize,
}

fn default_pool_size() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            work_queue_capacity: default_queue_capacity(),
            result_queue_capacity: default_queue_capacity(),
            item_timeout_ms: 0,
            max_item_failures: 0,
        }
    }
}

impl DistributorConfig {
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_capacities(mut self, work_queue: usize, result_queue: usize) -> Self {
        self.work_queue_capacity = work_queue;
        self.result_queue_capacity = result_queue;
        self
    }

    pub fn with_item_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.item_timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_item_failures(mut self, limit: usize) -> Self {
        self.max_item_failures = limit;
        self
    }

    pub fn item_timeout(&self) -> Option<Duration> {
        if self.item_timeout_ms > 0 {
            Some(Duration::from_millis(self.item_timeout_ms))
        } else {
            None
        }
    }

    pub fn failure_limit(&self) -> Option<usize> {
        if self.max_item_failures > 0 {
            Some(self.max_item_failures)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize {
                value: self.pool_size,
            });
        }
        if self.work_queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity {
                queue: "work",
                value: self.work_queue_capacity,
            });
        }
        if self.result_queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity {
                queue: "result",
                value: self.result_queue_capacity,
            });
        }
        Ok(())
    }
}

/// Checks a 0-100 percentage field
pub fn validate_probability(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value > 100 {
        return Err(ConfigError::InvalidProbability { field, value });
    }
    Ok(())
}
