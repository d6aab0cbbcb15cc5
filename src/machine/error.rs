//! Errors surfaced by the driver.

use crate::builder::BuildError;
use crate::core::Phase;
use thiserror::Error;

/// Misuse of the state machine API.
///
/// None of these are retryable: the core performs no I/O, so every error
/// points at a bug in the calling code or in a state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FsmError {
    #[error("Machine '{machine}' has been terminated")]
    Terminated { machine: String },

    #[error("Transition from '{state}' to itself is not allowed")]
    SelfTransition { state: String },

    #[error("Transition to '{requested}' rejected during {phase}; '{active}' remains active")]
    ReentrantTransition {
        active: String,
        requested: String,
        phase: Phase,
    },

    #[error("More than {limit} chained transitions (last entered '{active}')")]
    TransitionLimitExceeded { limit: usize, active: String },

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Result alias used throughout the driver.
pub type FsmResult<T> = Result<T, FsmError>;
