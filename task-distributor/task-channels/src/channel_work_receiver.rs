// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::sync::Arc;
use task_distributor_core::work_receiver::WorkReceiver;
use tokio::sync::{mpsc, Mutex};

/// Tokio mpsc channel-based work queue, consumer side
/// Clones share the receiver, so every item reaches exactly one executor
pub struct ChannelWorkReceiver<A> {
    rx: Arc<Mutex<mpsc::Receiver<A>>>,
}

impl<A> ChannelWorkReceiver<A> {
    pub fn new(rx: mpsc::Receiver<A>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }
}

impl<A> Clone for ChannelWorkReceiver<A> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

#[async_trait]
impl<A: Send + 'static> WorkReceiver<A> for ChannelWorkReceiver<A> {
    async fn recv(&mut self) -> Option<A> {
        self.rx.lock().await.recv().await
    }
}
