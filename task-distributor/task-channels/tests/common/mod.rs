// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(dead_code)]

use async_trait::async_trait;
use std::time::Duration;
use task_distributor_channels::types::ChannelExecutor;
use task_distributor_channels::TaskDistributor;
use task_distributor_core::config::DistributorConfig;
use task_distributor_core::error::DrainError;
use task_distributor_core::stats::{LocalStats, StatsRecorder};
use task_distributor_core::task_job::TaskJob;
use task_distributor_core::work_item::ResultItem;
use task_distributor_core::worker_runtime::WorkerRuntime;
use tokio::time::{sleep, timeout};

/// Item that makes `ScriptedJob` sleep far longer than any test timeout
pub const SLOW: i64 = 1_000_000;

/// Doubles positive items, rejects zero, panics on negatives, stalls on `SLOW`
pub struct ScriptedJob;

#[async_trait]
impl TaskJob for ScriptedJob {
    type Item = i64;
    type Output = i64;
    type Error = String;

    async fn process(&self, item: &i64) -> Result<i64, String> {
        match *item {
            0 => Err("zero is rejected".to_string()),
            i if i < 0 => panic!("cannot process {}", i),
            SLOW => {
                sleep(Duration::from_secs(30)).await;
                Ok(SLOW * 2)
            }
            i => Ok(i * 2),
        }
    }
}

/// Small queues so producers and executors hit backpressure
pub fn tight_config(pool_size: usize) -> DistributorConfig {
    DistributorConfig::default()
        .with_pool_size(pool_size)
        .with_capacities(2, 2)
}

/// Start the pool, feed `items` from a separate task and drain
pub async fn run_with_feeder<J, R>(
    job: J,
    config: DistributorConfig,
    items: Vec<J::Item>,
) -> Result<Vec<ResultItem<J::Output>>, DrainError<J::Output>>
where
    J: TaskJob,
    R: WorkerRuntime<ChannelExecutor<J>>,
{
    let mut distributor = TaskDistributor::<J, R>::new(job, config)?;
    distributor.start()?;

    let producer = distributor.producer();
    let feeder = tokio::spawn(async move {
        for item in items {
            producer.submit(item).await.expect("submit failed");
        }
        producer.close_input().expect("close failed");
    });

    let drained = distributor.drain().await;
    feeder.await.expect("feeder panicked");
    drained
}

pub fn sorted_seqs<O>(results: &[ResultItem<O>]) -> Vec<u64> {
    let mut seqs: Vec<u64> = results.iter().map(|r| r.seq).collect();
    seqs.sort_unstable();
    seqs
}

pub fn sorted_outputs(results: &[ResultItem<i64>]) -> Vec<i64> {
    let mut outputs: Vec<i64> = results.iter().filter_map(|r| r.output().copied()).collect();
    outputs.sort_unstable();
    outputs
}

/// Poll the stats until `processed` items have a result, or give up after 5s
pub async fn wait_for_processed(stats: &LocalStats, processed: usize) {
    timeout(Duration::from_secs(5), async {
        while stats.snapshot().processed() < processed {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("items were not processed in time");
}
