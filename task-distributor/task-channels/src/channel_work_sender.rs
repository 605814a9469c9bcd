// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_work_receiver::ChannelWorkReceiver;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use task_distributor_core::error::DistributorError;
use task_distributor_core::work_sender::WorkSender;
use tokio::sync::mpsc::{self, Sender};

/// Tokio mpsc channel-based work queue, producer side
/// All clones share one sender slot; closing empties the slot for every clone
pub struct ChannelWorkSender<A> {
    tx: Arc<Mutex<Option<Sender<A>>>>,
}

impl<A> Clone for ChannelWorkSender<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<A: Send + 'static> ChannelWorkSender<A> {
    /// Create a bounded work queue and its shared receiver
    pub fn create_pair(capacity: usize) -> (Self, ChannelWorkReceiver<A>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            ChannelWorkReceiver::new(rx),
        )
    }
}

impl<A> ChannelWorkSender<A> {
    fn slot(&self) -> MutexGuard<'_, Option<Sender<A>>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<A: Send + 'static> WorkSender<A> for ChannelWorkSender<A> {
    async fn send(&self, item: A) -> Result<(), DistributorError> {
        let tx = self
            .slot()
            .as_ref()
            .cloned()
            .ok_or(DistributorError::SubmitAfterClose)?;

        tx.send(item)
            .await
            .map_err(|_| DistributorError::QueueDisconnected)
    }

    fn close(&self) -> Result<(), DistributorError> {
        match self.slot().take() {
            Some(_) => Ok(()),
            None => Err(DistributorError::InputAlreadyClosed),
        }
    }

    fn is_closed(&self) -> bool {
        self.slot().is_none()
    }
}
