//! States of an interval automaton.
//!
//! A state describes one qualitative condition of the monitored variables as a
//! set of per-variable intervals. Matching a reading snapshot against a state
//! is a pure function with no side effects.

use super::interval::{IntervalConstraint, ReadingSnapshot, VariableId};
use super::transition::{Transition, TransitionId};
use serde::{Deserialize, Serialize};

/// Position of a state in its automaton's state sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Whether a state belongs to the accepting subset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[default]
    Ordinary,
    Acceptance,
}

impl Classification {
    /// Numeric code used by the persisted form.
    pub fn code(self) -> u8 {
        match self {
            Self::Ordinary => 0,
            Self::Acceptance => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ordinary),
            1 => Some(Self::Acceptance),
            _ => None,
        }
    }
}

/// A named node holding per-variable interval constraints.
///
/// The outgoing list holds ids of transitions registered on the owning
/// automaton; it only grows through [`Automaton::add_transition`] and decoding.
///
/// [`Automaton::add_transition`]: crate::core::Automaton::add_transition
///
/// # Example
///
/// ```rust
/// use interval_automaton::core::{IntervalConstraint, State};
/// use std::collections::HashMap;
///
/// let normal = State::new("normal")
///     .with_constraint(IntervalConstraint::closed(1, 60.0, 100.0).unwrap())
///     .with_constraint(IntervalConstraint::closed(2, 95.0, 100.0).unwrap());
///
/// let readings = HashMap::from([(1, 72.0), (2, 98.0)]);
/// assert!(normal.matches(&readings));
///
/// // A constrained variable without a reading never matches.
/// let partial = HashMap::from([(1, 72.0)]);
/// assert!(!normal.matches(&partial));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    name: String,
    constraints: Vec<IntervalConstraint>,
    classification: Classification,
    outgoing: Vec<TransitionId>,
}

impl State {
    /// Create an ordinary state with no constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
            classification: Classification::Ordinary,
            outgoing: Vec::new(),
        }
    }

    /// Add a constraint, replacing any existing one on the same variable.
    pub fn with_constraint(mut self, constraint: IntervalConstraint) -> Self {
        self.constrain(constraint);
        self
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Mark the state as an acceptance state.
    pub fn accepting(self) -> Self {
        self.with_classification(Classification::Acceptance)
    }

    /// Set the constraint for a variable.
    ///
    /// A later constraint on an already constrained variable replaces the
    /// earlier one in place, so constraint order stays stable.
    pub fn constrain(&mut self, constraint: IntervalConstraint) {
        match self
            .constraints
            .iter_mut()
            .find(|c| c.variable() == constraint.variable())
        {
            Some(existing) => *existing = constraint,
            None => self.constraints.push(constraint),
        }
    }

    pub(crate) fn set_classification(&mut self, classification: Classification) {
        self.classification = classification;
    }

    pub(crate) fn clear_outgoing(&mut self) {
        self.outgoing.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraints(&self) -> &[IntervalConstraint] {
        &self.constraints
    }

    pub fn constraint(&self, variable: VariableId) -> Option<&IntervalConstraint> {
        self.constraints.iter().find(|c| c.variable() == variable)
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn is_acceptance(&self) -> bool {
        self.classification == Classification::Acceptance
    }

    /// Ids of the outgoing transitions, in registration order.
    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }

    /// Check if every constrained variable has a reading within its interval.
    ///
    /// A state without constraints matches any snapshot.
    pub fn matches<R: ReadingSnapshot + ?Sized>(&self, readings: &R) -> bool {
        self.constraints.iter().all(|constraint| {
            readings
                .reading(constraint.variable())
                .is_some_and(|value| constraint.contains(value))
        })
    }

    /// Register an outgoing transition.
    ///
    /// `transitions` is the owning automaton's transition sequence, which must
    /// already contain `id`. Returns `false` without registering when an
    /// outgoing transition with the same destination and label exists.
    pub(crate) fn add_outgoing_transition(
        &mut self,
        id: TransitionId,
        transitions: &[Transition],
    ) -> bool {
        let Some(candidate) = transitions.get(id.index()) else {
            return false;
        };

        let duplicate = self.outgoing.iter().any(|existing| {
            transitions
                .get(existing.index())
                .is_some_and(|t| t.same_edge(candidate.destination(), candidate.label()))
        });

        if duplicate {
            return false;
        }

        self.outgoing.push(id);
        true
    }
}
