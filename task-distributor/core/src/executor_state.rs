// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;

/// Lifecycle of one executor: Idle -> Processing -> Idle ... -> Terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Processing,
    Terminated,
}

impl ExecutorState {
    pub fn can_transition_to(self, next: ExecutorState) -> bool {
        matches!(
            (self, next),
            (ExecutorState::Idle, ExecutorState::Processing)
                | (ExecutorState::Processing, ExecutorState::Idle)
                | (ExecutorState::Idle, ExecutorState::Terminated)
        )
    }

    /// Move to `next`, returning the rejected pair on an illegal transition
    pub fn transition(
        self,
        next: ExecutorState,
    ) -> Result<ExecutorState, (ExecutorState, ExecutorState)> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err((self, next))
        }
    }
}

impl fmt::Display for ExecutorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorState::Idle => write!(f, "idle"),
            ExecutorState::Processing => write!(f, "processing"),
            ExecutorState::Terminated => write!(f, "terminated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_loop_is_allowed() {
        let state = ExecutorState::Idle;
        let state = state.transition(ExecutorState::Processing).unwrap();
        let state = state.transition(ExecutorState::Idle).unwrap();
        let state = state.transition(ExecutorState::Terminated).unwrap();
        assert_eq!(state, ExecutorState::Terminated);
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        assert_eq!(
            ExecutorState::Processing.transition(ExecutorState::Terminated),
            Err((ExecutorState::Processing, ExecutorState::Terminated))
        );
        assert!(!ExecutorState::Terminated.can_transition_to(ExecutorState::Idle));
        assert!(!ExecutorState::Terminated.can_transition_to(ExecutorState::Processing));
        assert!(!ExecutorState::Idle.can_transition_to(ExecutorState::Idle));
    }
}
