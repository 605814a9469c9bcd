// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use task_distributor_core::completion_signaling::{
    CompletionMessage, CompletionSignaling, CompletionToken,
};
use tokio::sync::mpsc::{self, Sender};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{StreamExt, StreamMap};

/// Each executor reports once, so one slot per channel never blocks
const COMPLETION_CAPACITY: usize = 1;

#[derive(Clone)]
pub struct ChannelCompletionToken {
    tx: Sender<CompletionMessage>,
}

impl CompletionToken for ChannelCompletionToken {
    fn complete(&self, message: CompletionMessage) -> bool {
        self.tx.try_send(message).is_ok()
    }
}

/// Channel-based completion signaling using tokio mpsc and StreamMap
pub struct ChannelCompletionSignaling {
    completion_txs: Vec<Sender<CompletionMessage>>,
    completion_streams: StreamMap<usize, ReceiverStream<CompletionMessage>>,
}

impl CompletionSignaling for ChannelCompletionSignaling {
    type Token = ChannelCompletionToken;

    fn setup(num_workers: usize) -> Self {
        let mut completion_txs = Vec::with_capacity(num_workers);
        let mut completion_streams = StreamMap::new();

        for worker_idx in 0..num_workers {
            let (tx, rx) = mpsc::channel::<CompletionMessage>(COMPLETION_CAPACITY);
            completion_txs.push(tx);
            completion_streams.insert(worker_idx, ReceiverStream::new(rx));
        }

        Self {
            completion_txs,
            completion_streams,
        }
    }

    fn get_token(&self, worker_id: usize) -> Self::Token {
        ChannelCompletionToken {
            tx: self.completion_txs[worker_id].clone(),
        }
    }

    async fn wait_next(&mut self) -> Option<Result<usize, usize>> {
        self.completion_streams
            .next()
            .await
            .map(|(stream_idx, msg)| {
                match msg {
                    Ok(worker_id) => Ok(worker_id),
                    Err(_) => Err(stream_idx), // stream_idx is the failed worker_id
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_each_worker_once() {
        let mut signaling = ChannelCompletionSignaling::setup(3);

        assert!(signaling.get_token(2).complete(Ok(2)));
        assert!(signaling.get_token(0).complete(Err(())));
        assert!(signaling.get_token(1).complete(Ok(1)));

        let mut reported = Vec::new();
        for _ in 0..3 {
            reported.push(signaling.wait_next().await.unwrap());
        }
        reported.sort();
        assert_eq!(reported, vec![Ok(1), Ok(2), Err(0)]);
    }

    #[tokio::test]
    async fn test_second_signal_from_same_worker_is_rejected() {
        let signaling = ChannelCompletionSignaling::setup(1);
        let token = signaling.get_token(0);
        assert!(token.complete(Ok(0)));
        assert!(!token.complete(Ok(0)));
    }
}
