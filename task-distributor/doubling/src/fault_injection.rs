// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use rand::Rng;
use std::fmt::{self, Display};
use task_distributor_core::config::validate_probability;
use task_distributor_core::error::ConfigError;
use task_distributor_core::task_job::TaskJob;
use task_distributor_core::utils::roll;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Configuration for fault injection in jobs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultConfig {
    /// Probability (0-100) that an item fails before reaching the inner job
    pub failure_probability: u32,
    /// Probability (0-100) that an item is delayed (straggler)
    pub straggler_probability: u32,
    /// Maximum straggler delay in milliseconds
    pub straggler_delay_ms: u64,
}

impl FaultConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_probability("failure_probability", self.failure_probability)?;
        validate_probability("straggler_probability", self.straggler_probability)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure<E> {
    /// Failure simulated by the wrapper
    Simulated,
    /// Failure reported by the wrapped job
    Inner(E),
}

impl<E: Display> Display for InjectedFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectedFailure::Simulated => write!(f, "simulated failure"),
            InjectedFailure::Inner(error) => write!(f, "{}", error),
        }
    }
}

/// Wraps a job and randomly fails or delays items before delegating
pub struct FaultInjectingJob<J> {
    inner: J,
    faults: FaultConfig,
}

impl<J: TaskJob> FaultInjectingJob<J> {
    pub fn new(inner: J, faults: FaultConfig) -> Result<Self, ConfigError> {
        faults.validate()?;
        Ok(Self { inner, faults })
    }
}

#[async_trait]
impl<J: TaskJob> TaskJob for FaultInjectingJob<J> {
    type Item = J::Item;
    type Output = J::Output;
    type Error = InjectedFailure<J::Error>;

    async fn process(&self, item: &Self::Item) -> Result<Self::Output, Self::Error> {
        // ThreadRng is not Send, keep it out of the await points
        let (should_fail, delay_ms) = {
            let mut rng = rand::rng();
            let should_fail = roll(&mut rng, self.faults.failure_probability);
            let delay_ms = if roll(&mut rng, self.faults.straggler_probability) {
                Some(rng.random_range(1..=self.faults.straggler_delay_ms.max(1)))
            } else {
                None
            };
            (should_fail, delay_ms)
        };

        if should_fail {
            return Err(InjectedFailure::Simulated);
        }

        if let Some(delay_ms) = delay_ms {
            debug!(delay_ms, "straggler item, delaying");
            sleep(Duration::from_millis(delay_ms)).await;
        }

        self.inner
            .process(item)
            .await
            .map_err(InjectedFailure::Inner)
    }
}
