// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod doubling;
mod fault_injection;

pub use doubling::{DoublingError, DoublingJob};
pub use fault_injection::{FaultConfig, FaultInjectingJob, InjectedFailure};
