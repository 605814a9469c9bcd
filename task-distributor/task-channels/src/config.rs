// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use task_distributor_core::config::DistributorConfig;
use task_distributor_core::error::ConfigError;
use task_distributor_doubling::FaultConfig;

/// Which runtime drives the executors
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    #[default]
    Tasks,
    Threads,
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeKind::Tasks => write!(f, "tokio tasks"),
            RuntimeKind::Threads => write!(f, "os threads"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Number of work items generated for the run
    #[serde(default = "default_num_items")]
    pub num_items: usize,
    /// Generated items are drawn from 1..=max_item_value
    #[serde(default = "default_max_item_value")]
    pub max_item_value: i64,
    #[serde(flatten)]
    pub distributor: DistributorConfig,
    #[serde(default)]
    pub runtime: RuntimeKind,
    /// Probability (0-100) that an item fails during processing
    #[serde(default)]
    pub failure_probability: u32,
    /// Probability (0-100) that an item becomes a straggler (slow)
    #[serde(default)]
    pub straggler_probability: u32,
    /// Maximum delay in milliseconds for a straggler item
    #[serde(default = "default_straggler_delay")]
    pub straggler_delay_ms: u64,
}

fn default_num_items() -> usize {
    1000
}

fn default_max_item_value() -> i64 {
    1000
}

fn default_straggler_delay() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_items: default_num_items(),
            max_item_value: default_max_item_value(),
            distributor: DistributorConfig::default(),
            runtime: RuntimeKind::default(),
            failure_probability: 0,
            straggler_probability: 0,
            straggler_delay_ms: default_straggler_delay(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.distributor.validate()?;
        self.fault_config().validate()
    }

    pub fn fault_config(&self) -> FaultConfig {
        FaultConfig {
            failure_probability: self.failure_probability,
            straggler_probability: self.straggler_probability,
            straggler_delay_ms: self.straggler_delay_ms,
        }
    }

    pub fn print_summary(&self) {
        println!("Configuration:");
        println!(
            "  Items: {} (values 1..={})",
            self.num_items, self.max_item_value
        );
        println!(
            "  Executors: {} on {}",
            self.distributor.pool_size, self.runtime
        );
        println!(
            "  Queue capacity: work {}, results {}",
            self.distributor.work_queue_capacity, self.distributor.result_queue_capacity
        );
        match self.distributor.item_timeout() {
            Some(timeout) => println!("  Item timeout: {}ms", timeout.as_millis()),
            None => println!("  Item timeout: none"),
        }
        match self.distributor.failure_limit() {
            Some(limit) => println!("  Failure budget: {} items", limit),
            None => println!("  Failure budget: unlimited"),
        }
        if self.failure_probability > 0 || self.straggler_probability > 0 {
            println!(
                "  Faults: {}% failures, {}% stragglers (up to {}ms)",
                self.failure_probability, self.straggler_probability, self.straggler_delay_ms
            );
        }
    }
}
