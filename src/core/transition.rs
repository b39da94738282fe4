//! Labeled transitions between states.

use super::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Position of a transition in its automaton's transition sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(usize);

impl TransitionId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed, labeled edge between two states.
///
/// Transitions are immutable once created. Identity is the
/// `(origin, destination, label)` triple: the message is descriptive only, so
/// two transitions differing only by message are equal.
///
/// # Example
///
/// ```rust
/// use interval_automaton::core::{StateId, Transition};
///
/// let a = Transition::new(StateId::new(0), StateId::new(1), "R1", "heart rate rising");
/// let b = Transition::new(StateId::new(0), StateId::new(1), "R1", "another wording");
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Debug)]
pub struct Transition {
    origin: StateId,
    destination: StateId,
    label: String,
    message: String,
}

impl Transition {
    pub fn new(
        origin: StateId,
        destination: StateId,
        label: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            destination,
            label: label.into(),
            message: message.into(),
        }
    }

    pub fn origin(&self) -> StateId {
        self.origin
    }

    pub fn destination(&self) -> StateId {
        self.destination
    }

    /// Short rule id.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Human-readable description of the move.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this transition leads to `destination` under `label`.
    ///
    /// The origin is implied when scanning a state's outgoing list.
    pub(crate) fn same_edge(&self, destination: StateId, label: &str) -> bool {
        self.destination == destination && self.label == label
    }
}

impl PartialEq for Transition {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.destination == other.destination
            && self.label == other.label
    }
}

impl Eq for Transition {}

impl Hash for Transition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.origin.hash(state);
        self.destination.hash(state);
        self.label.hash(state);
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {}",
            self.origin.index(),
            self.label,
            self.destination.index()
        )
    }
}
