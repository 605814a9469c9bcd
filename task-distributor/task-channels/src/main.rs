// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use std::time::Instant;
use task_distributor_channels::config::{Config, RuntimeKind};
use task_distributor_channels::types::ChannelExecutor;
use task_distributor_channels::{TaskDistributor, ThreadRuntime, TokenShutdownSignal, TokioRuntime};
use task_distributor_core::error::DrainError;
use task_distributor_core::stats::StatsRecorder;
use task_distributor_core::utils::generate_work_items;
use task_distributor_core::work_item::{ItemOutcome, ResultItem};
use task_distributor_core::worker_runtime::WorkerRuntime;
use task_distributor_doubling::{DoublingJob, FaultInjectingJob};
use tokio::{signal, spawn};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

type DemoJob = FaultInjectingJob<DoublingJob>;

/// Feed `items` from a separate task while the pool drains
async fn run_pool<R>(
    config: &Config,
    job: Arc<DemoJob>,
    shutdown_signal: TokenShutdownSignal,
    items: Vec<i64>,
) -> Result<Vec<ResultItem<i64>>, DrainError<i64>>
where
    R: WorkerRuntime<ChannelExecutor<DemoJob>>,
{
    let mut distributor =
        TaskDistributor::<DemoJob, R>::with_parts(job, config.distributor.clone(), shutdown_signal)?;
    distributor.start()?;

    let producer = distributor.producer();
    let feeder = spawn(async move {
        for item in items {
            if let Err(e) = producer.submit(item).await {
                warn!(error = %e, "stopped submitting work");
                break;
            }
        }
        if let Err(e) = producer.close_input() {
            warn!(error = %e, "work queue was already closed");
        }
    });

    let stats = distributor.stats().clone();
    let drained = distributor.drain().await;
    if let Err(e) = feeder.await {
        error!(error = %e, "feeder task failed");
    }

    let snapshot = stats.snapshot();
    println!(
        "Submitted {}, succeeded {}, failed {}",
        snapshot.submitted, snapshot.succeeded, snapshot.failed
    );
    for (worker_id, processed) in &snapshot.processed_by_executor {
        println!("  executor {}: {} items", worker_id, processed);
    }
    drained
}

fn print_results(results: &mut [ResultItem<i64>]) {
    results.sort_by_key(|result| result.seq);

    println!("\n=== RESULTS ===");
    for result in results.iter().take(10) {
        match &result.outcome {
            ItemOutcome::Success(output) => {
                println!("#{} -> {} (executor {})", result.seq, output, result.worker_id)
            }
            ItemOutcome::Failure(failure) => println!("#{} failed: {}", result.seq, failure),
        }
    }
    if results.len() > 10 {
        println!("... ({} more results)", results.len() - 10);
    }

    let total: i64 = results.iter().filter_map(|r| r.output()).sum();
    let failed = results.iter().filter(|r| !r.is_success()).count();
    println!("\nResults: {} ({} failed)", results.len(), failed);
    println!("Sum of outputs: {}", total);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let start_time = Instant::now();

    let config = match Config::load("config.json") {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not load config.json, using defaults");
            Config::default()
        }
    };

    println!("=== TASK DISTRIBUTOR ===");
    config.print_summary();

    let items = generate_work_items(&mut rand::rng(), config.num_items, config.max_item_value);
    info!(items = items.len(), "generated work items");

    // Built once, shared by every executor
    let job = Arc::new(FaultInjectingJob::new(DoublingJob, config.fault_config())?);

    let cancel_token = CancellationToken::new();
    let shutdown_signal = TokenShutdownSignal::new(cancel_token.clone());

    // Setup Ctrl+C handler
    let ctrl_c_token = cancel_token.clone();
    spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                println!("\n\n=== Ctrl+C received, initiating shutdown ===");
                ctrl_c_token.cancel();
            }
            Err(e) => error!(error = %e, "failed to listen for Ctrl+C"),
        }
    });

    println!("\nStarting executors...");
    let drained = match config.runtime {
        RuntimeKind::Tasks => {
            run_pool::<TokioRuntime>(&config, job, shutdown_signal, items).await
        }
        RuntimeKind::Threads => {
            run_pool::<ThreadRuntime>(&config, job, shutdown_signal, items).await
        }
    };

    match drained {
        Ok(mut results) => print_results(&mut results),
        Err(DrainError::Pool(failure)) => {
            println!("\n=== POOL FAILED: {} ===", failure.cause);
            if !failure.failed_executors.is_empty() {
                println!("Failed executors: {:?}", failure.failed_executors);
            }
            for join_error in &failure.join_errors {
                println!("  {}", join_error);
            }
            let mut partial = failure.partial_results;
            print_results(&mut partial);
        }
        Err(e) => return Err(e.into()),
    }

    let elapsed = start_time.elapsed();
    println!("\n=== PROGRAM COMPLETE ===");
    println!("Total time: {:.2}s", elapsed.as_secs_f64());
    Ok(())
}
