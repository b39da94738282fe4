//! Tracking of inferred state changes.
//!
//! The automaton never advances itself. A caller classifies successive reading
//! snapshots, asks [`Automaton::infer_transition`] what moving from the
//! previous state to the newly matched one means, and may keep the results in
//! an immutable [`StateHistory`].

use super::automaton::{Automaton, NoMatchError};
use super::interval::ReadingSnapshot;
use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one inferred move between two classified snapshots.
///
/// `labels` and `messages` are the aggregated descriptions of the registered
/// transitions between `from` and `to`; both are empty when the automaton
/// declares no such transition (including when the state did not change).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// State matched by the previous snapshot
    pub from: StateId,
    /// State matched by the current snapshot
    pub to: StateId,
    /// When the current snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Labels of the declared transitions, joined by `_ou_`
    pub labels: String,
    /// Messages of the declared transitions, joined by ` | `
    pub messages: String,
}

impl StateTransition {
    /// Check if the snapshot was classified into a different state.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// Check if the automaton declares a transition for this move.
    pub fn is_declared(&self) -> bool {
        !self.labels.is_empty()
    }
}

impl Automaton {
    /// Classify `readings` and describe the move from `previous`.
    ///
    /// `at` is supplied by the caller; the automaton keeps no clock.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use interval_automaton::core::{Automaton, IntervalConstraint, State, Transition};
    /// use std::collections::HashMap;
    ///
    /// let mut automaton = Automaton::new("temperature");
    /// let normal = automaton.add_state(
    ///     State::new("normal").with_constraint(IntervalConstraint::closed(3, 36.0, 37.5).unwrap()),
    /// );
    /// let fever = automaton.add_state(
    ///     State::new("fever").with_constraint(IntervalConstraint::closed(3, 37.6, 42.0).unwrap()),
    /// );
    /// automaton
    ///     .add_transition(Transition::new(normal, fever, "R3", "fever onset"))
    ///     .unwrap();
    ///
    /// let step = automaton
    ///     .infer_transition(normal, &HashMap::from([(3, 38.4)]), Utc::now())
    ///     .unwrap();
    /// assert_eq!(step.to, fever);
    /// assert_eq!(step.labels, "R3");
    /// assert_eq!(step.messages, "fever onset");
    /// ```
    pub fn infer_transition<R: ReadingSnapshot + ?Sized>(
        &self,
        previous: StateId,
        readings: &R,
        at: DateTime<Utc>,
    ) -> Result<StateTransition, NoMatchError> {
        let current = self.find_matching_state_id(readings)?;

        Ok(StateTransition {
            from: previous,
            to: current,
            timestamp: at,
            labels: self.transition_labels_between(previous, current),
            messages: self.transition_messages_between(previous, current),
        })
    }
}

/// Ordered history of inferred state changes.
///
/// History is immutable: [`StateHistory::record`] returns a new history with
/// the change appended.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first origin, then each destination.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// The state reached by the latest recorded transition.
    pub fn current(&self) -> Option<StateId> {
        self.transitions.last().map(|t| t.to)
    }

    /// Time between the first and the last recorded transition.
    ///
    /// `None` for an empty history or when timestamps run backwards.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }
}
