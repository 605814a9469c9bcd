// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use task_distributor_core::result_sender::{ResultSender, TrySendError};
use tokio::sync::mpsc::error::TrySendError as ChannelTrySendError;
use tokio::sync::mpsc::{self, Receiver, Sender};

/// Tokio mpsc channel-based result queue, executor side
pub struct ChannelResultSender<R> {
    tx: Sender<R>,
}

impl<R> Clone for ChannelResultSender<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<R> ChannelResultSender<R> {
    pub fn create_pair(capacity: usize) -> (Self, Receiver<R>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl<R: Send + 'static> ResultSender<R> for ChannelResultSender<R> {
    async fn send(&self, result: R) -> bool {
        self.tx.send(result).await.is_ok()
    }

    fn try_send(&self, result: R) -> Result<(), TrySendError<R>> {
        self.tx.try_send(result).map_err(|e| match e {
            ChannelTrySendError::Full(result) => TrySendError::Full(result),
            ChannelTrySendError::Closed(_) => TrySendError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_send_reports_full_and_closed() {
        let (tx, mut rx) = ChannelResultSender::create_pair(1);

        assert_eq!(tx.try_send(1), Ok(()));
        assert_eq!(tx.try_send(2), Err(TrySendError::Full(2)));
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(tx.try_send(3), Ok(()));

        drop(rx);
        assert_eq!(tx.try_send(4), Err(TrySendError::Closed));
        assert!(!tx.send(5).await);
    }
}
