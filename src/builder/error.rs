//! Build errors for automaton and state builders.

use crate::core::IntervalError;
use thiserror::Error;

/// Errors that can occur when building automata and states.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("State `{state}` has an invalid interval: {source}")]
    InvalidInterval {
        state: String,
        #[source]
        source: IntervalError,
    },

    #[error("State `{0}` is defined more than once. State names must be unique")]
    DuplicateState(String),

    #[error("Transition `{label}` references unknown state `{state}`. Add it with .state() first")]
    UnknownState { label: String, state: String },
}
