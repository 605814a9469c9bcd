// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::fmt::Display;

/// Trait that defines the transformation applied to every work item
/// Abstracts the job domain from the execution model
///
/// A job is built once at startup and shared by every executor through an `Arc`,
/// so any expensive setup belongs in its constructor.
#[async_trait]
pub trait TaskJob: Send + Sync + 'static {
    /// The input carried by a work item
    type Item: Send + Sync + 'static;

    /// The output of a successful transformation
    type Output: Send + 'static;

    /// The error of a failed transformation
    type Error: Display + Send + 'static;

    /// Process one item
    async fn process(&self, item: &Self::Item) -> Result<Self::Output, Self::Error>;
}
