//! Core automaton types and logic.
//!
//! This module contains the pure core of the automaton:
//! - Interval constraints and reading snapshots
//! - States, transitions and the owning `Automaton`
//! - Caller-driven tracking of inferred state changes
//!
//! Every query here is a pure read; the automaton never fires transitions on
//! its own.

mod automaton;
mod history;
mod interval;
mod state;
mod transition;

pub use automaton::{
    Automaton, NoMatchError, UnknownStateError, LABEL_SEPARATOR, MESSAGE_SEPARATOR,
};
pub use history::{StateHistory, StateTransition};
pub use interval::{IntervalConstraint, IntervalError, ReadingSnapshot, VariableId};
pub use state::{Classification, State, StateId};
pub use transition::{Transition, TransitionId};
