//! The automaton container and its queries.
//!
//! An [`Automaton`] owns its states and transitions in two arenas. Transitions
//! refer to states by [`StateId`] and states list their outgoing transitions by
//! [`TransitionId`], so there is no ownership cycle between the two.
//!
//! The automaton is passive: callers classify reading snapshots with
//! [`Automaton::find_matching_state`] and ask what moving between the inferred
//! states means with [`Automaton::transition_labels_between`].

use super::interval::ReadingSnapshot;
use super::state::{State, StateId};
use super::transition::{Transition, TransitionId};
use std::collections::BTreeMap;
use thiserror::Error;

/// Separator placed between labels of parallel transitions.
pub const LABEL_SEPARATOR: &str = "_ou_";

/// Separator placed between messages of parallel transitions.
pub const MESSAGE_SEPARATOR: &str = " | ";

/// No state accepts a reading snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("value not monitored")]
pub struct NoMatchError {
    /// Number of states scanned before giving up.
    pub states_scanned: usize,
}

/// A transition referenced a state that is not part of the automaton.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("state {} does not exist (automaton has {len} states)", .id.index())]
pub struct UnknownStateError {
    pub id: StateId,
    pub len: usize,
}

/// A declarative finite automaton over interval-classified states.
///
/// Cloning produces an independent automaton: later mutations of either copy
/// never affect the other.
///
/// # Example
///
/// ```rust
/// use interval_automaton::core::{Automaton, IntervalConstraint, State, Transition};
/// use std::collections::HashMap;
///
/// let mut automaton = Automaton::new("heart rate");
/// let normal = automaton.add_state(
///     State::new("normal").with_constraint(IntervalConstraint::closed(1, 60.0, 100.0).unwrap()),
/// );
/// let high = automaton.add_state(
///     State::new("high").with_constraint(IntervalConstraint::closed(1, 100.0, 250.0).unwrap()),
/// );
/// automaton
///     .add_transition(Transition::new(normal, high, "R1", "tachycardia onset"))
///     .unwrap();
///
/// let current = automaton
///     .find_matching_state_id(&HashMap::from([(1, 130.0)]))
///     .unwrap();
/// assert_eq!(current, high);
/// assert_eq!(automaton.transition_labels_between(normal, current), "R1");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Automaton {
    name: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    labels: Vec<String>,
    reserved: BTreeMap<String, String>,
}

impl Automaton {
    /// Create an empty automaton.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// States in sequence order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Id of the first state named `name`.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name() == name)
            .map(StateId::new)
    }

    /// Transitions in registration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(id.index())
    }

    /// Distinct transition labels, in first-seen order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Raw JSON text of reserved document keys, keyed by document key.
    ///
    /// These values carry no meaning for classification; they are kept only so
    /// that re-encoding a decoded document does not lose them.
    pub fn reserved(&self) -> &BTreeMap<String, String> {
        &self.reserved
    }

    pub(crate) fn set_reserved(&mut self, reserved: BTreeMap<String, String>) {
        self.reserved = reserved;
    }

    /// The acceptance subset, in sequence order, derived from each state's
    /// classification.
    pub fn acceptance_states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_acceptance())
            .map(|(i, s)| (StateId::new(i), s))
    }

    pub fn acceptance_state_ids(&self) -> Vec<StateId> {
        self.acceptance_states().map(|(id, _)| id).collect()
    }

    /// Append a state and return its id.
    ///
    /// Outgoing transitions carried by `state` are discarded; they are only
    /// meaningful relative to the automaton that registered them.
    pub fn add_state(&mut self, mut state: State) -> StateId {
        let id = StateId::new(self.states.len());
        state.clear_outgoing();
        self.states.push(state);
        id
    }

    /// Register a transition.
    ///
    /// Returns `Ok(false)` when an equal transition (same origin, destination
    /// and label) is already registered; the first registration wins, message
    /// included.
    pub fn add_transition(&mut self, transition: Transition) -> Result<bool, UnknownStateError> {
        for id in [transition.origin(), transition.destination()] {
            if id.index() >= self.states.len() {
                return Err(UnknownStateError {
                    id,
                    len: self.states.len(),
                });
            }
        }

        if self.transitions.contains(&transition) {
            return Ok(false);
        }

        let id = TransitionId::new(self.transitions.len());
        let origin = transition.origin().index();
        if !self.labels.iter().any(|l| l == transition.label()) {
            self.labels.push(transition.label().to_string());
        }
        self.transitions.push(transition);
        self.states[origin].add_outgoing_transition(id, &self.transitions);

        Ok(true)
    }

    /// Id of the first state, in sequence order, matching `readings`.
    ///
    /// When state intervals overlap, the earlier state always wins.
    pub fn find_matching_state_id<R: ReadingSnapshot + ?Sized>(
        &self,
        readings: &R,
    ) -> Result<StateId, NoMatchError> {
        for (index, state) in self.states.iter().enumerate() {
            if state.matches(readings) {
                tracing::trace!(state = state.name(), index, "reading snapshot matched");
                return Ok(StateId::new(index));
            }
        }

        tracing::debug!(
            automaton = %self.name,
            states = self.states.len(),
            "no state matches reading snapshot"
        );
        Err(NoMatchError {
            states_scanned: self.states.len(),
        })
    }

    /// The first state, in sequence order, matching `readings`.
    pub fn find_matching_state<R: ReadingSnapshot + ?Sized>(
        &self,
        readings: &R,
    ) -> Result<&State, NoMatchError> {
        let id = self.find_matching_state_id(readings)?;
        Ok(&self.states[id.index()])
    }

    /// Outgoing transitions of `origin`, in registration order.
    ///
    /// Empty for an unknown state.
    pub fn outgoing(&self, origin: StateId) -> impl Iterator<Item = &Transition> {
        self.state(origin)
            .map(State::outgoing)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.transitions.get(id.index()))
    }

    /// Transitions leading from `origin` to `destination`, in `origin`'s
    /// outgoing order.
    pub fn transitions_between(
        &self,
        origin: StateId,
        destination: StateId,
    ) -> impl Iterator<Item = &Transition> {
        self.outgoing(origin)
            .filter(move |t| t.destination() == destination)
    }

    /// Labels of every transition from `origin` to `destination`, joined by
    /// [`LABEL_SEPARATOR`]. Empty when there is none.
    pub fn transition_labels_between(&self, origin: StateId, destination: StateId) -> String {
        self.transitions_between(origin, destination)
            .map(Transition::label)
            .collect::<Vec<_>>()
            .join(LABEL_SEPARATOR)
    }

    /// Messages of every transition from `origin` to `destination`, joined by
    /// [`MESSAGE_SEPARATOR`]. Empty when there is none.
    pub fn transition_messages_between(&self, origin: StateId, destination: StateId) -> String {
        self.transitions_between(origin, destination)
            .map(Transition::message)
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Classification, IntervalConstraint};
    use std::collections::HashMap;

    fn ranged(name: &str, lower: f64, upper: f64) -> State {
        State::new(name).with_constraint(IntervalConstraint::closed(1, lower, upper).unwrap())
    }

    fn three_states() -> (Automaton, StateId, StateId, StateId) {
        let mut automaton = Automaton::new("test");
        let a = automaton.add_state(ranged("A", 0.0, 10.0));
        let b = automaton.add_state(ranged("B", 10.5, 20.0));
        let c = automaton.add_state(ranged("C", 20.5, 30.0));
        (automaton, a, b, c)
    }

    #[test]
    fn new_automaton_is_empty() {
        let automaton = Automaton::new("empty");

        assert_eq!(automaton.name(), "empty");
        assert!(automaton.states().is_empty());
        assert!(automaton.transitions().is_empty());
        assert!(automaton.labels().is_empty());
        assert!(automaton.acceptance_state_ids().is_empty());
    }

    #[test]
    fn add_state_assigns_sequential_ids() {
        let (automaton, a, b, c) = three_states();

        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert_eq!(automaton.state(b).map(State::name), Some("B"));
        assert_eq!(automaton.state_id("C"), Some(c));
        assert_eq!(automaton.state_id("missing"), None);
    }

    #[test]
    fn add_state_allows_identical_states() {
        let mut automaton = Automaton::new("dup");
        automaton.add_state(State::new("same"));
        automaton.add_state(State::new("same"));

        assert_eq!(automaton.states().len(), 2);
    }

    #[test]
    fn first_match_wins_for_overlapping_states() {
        let mut automaton = Automaton::new("overlap");
        let s1 = automaton.add_state(ranged("S1", 0.0, 10.0));
        let s2 = automaton.add_state(ranged("S2", 5.0, 15.0));

        let readings = HashMap::from([(1, 7.0)]);
        assert_eq!(automaton.find_matching_state_id(&readings), Ok(s1));
        assert_eq!(
            automaton.find_matching_state(&readings).map(State::name),
            Ok("S1")
        );

        let readings = HashMap::from([(1, 12.0)]);
        assert_eq!(automaton.find_matching_state_id(&readings), Ok(s2));
    }

    #[test]
    fn no_match_reports_value_not_monitored() {
        let (automaton, ..) = three_states();
        let readings = HashMap::from([(1, 99.0)]);

        let err = automaton.find_matching_state(&readings).unwrap_err();
        assert_eq!(err.to_string(), "value not monitored");
        assert_eq!(err.states_scanned, 3);
    }

    #[test]
    fn empty_automaton_matches_nothing() {
        let automaton = Automaton::new("empty");
        let readings: HashMap<u32, f64> = HashMap::new();

        assert!(automaton.find_matching_state_id(&readings).is_err());
    }

    #[test]
    fn labels_aggregate_in_insertion_order() {
        let (mut automaton, a, b, c) = three_states();
        automaton.add_transition(Transition::new(a, b, "x", "mx")).unwrap();
        automaton.add_transition(Transition::new(a, b, "y", "my")).unwrap();
        automaton.add_transition(Transition::new(a, c, "z", "mz")).unwrap();

        assert_eq!(automaton.transition_labels_between(a, b), "x_ou_y");
        assert_eq!(automaton.transition_labels_between(a, c), "z");
        assert_eq!(automaton.transition_labels_between(b, a), "");
    }

    #[test]
    fn messages_aggregate_with_pipe() {
        let (mut automaton, a, b, _) = three_states();
        automaton
            .add_transition(Transition::new(a, b, "x", "rising"))
            .unwrap();
        automaton
            .add_transition(Transition::new(a, b, "y", "still rising"))
            .unwrap();

        assert_eq!(
            automaton.transition_messages_between(a, b),
            "rising | still rising"
        );
        assert_eq!(automaton.transition_messages_between(b, a), "");
    }

    #[test]
    fn duplicate_transition_is_noop_and_first_message_wins() {
        let (mut automaton, a, b, _) = three_states();

        assert_eq!(
            automaton.add_transition(Transition::new(a, b, "x", "first")),
            Ok(true)
        );
        assert_eq!(
            automaton.add_transition(Transition::new(a, b, "x", "second")),
            Ok(false)
        );

        assert_eq!(automaton.transitions().len(), 1);
        assert_eq!(automaton.labels(), &["x".to_string()]);
        assert_eq!(automaton.state(a).unwrap().outgoing().len(), 1);
        assert_eq!(automaton.transition_messages_between(a, b), "first");
    }

    #[test]
    fn shared_label_on_distinct_edges_is_listed_once() {
        let (mut automaton, a, b, c) = three_states();
        automaton.add_transition(Transition::new(a, b, "x", "")).unwrap();
        automaton.add_transition(Transition::new(b, c, "x", "")).unwrap();

        assert_eq!(automaton.transitions().len(), 2);
        assert_eq!(automaton.labels().len(), 1);
    }

    #[test]
    fn transition_is_registered_on_origin_only() {
        let (mut automaton, a, b, _) = three_states();
        automaton.add_transition(Transition::new(a, b, "x", "")).unwrap();

        assert_eq!(
            automaton.state(a).unwrap().outgoing(),
            &[TransitionId::new(0)]
        );
        assert!(automaton.state(b).unwrap().outgoing().is_empty());
    }

    #[test]
    fn unknown_state_is_rejected() {
        let (mut automaton, a, ..) = three_states();
        let ghost = StateId::new(7);

        let err = automaton
            .add_transition(Transition::new(a, ghost, "x", ""))
            .unwrap_err();

        assert_eq!(err, UnknownStateError { id: ghost, len: 3 });
        assert!(automaton.transitions().is_empty());
        assert!(automaton.labels().is_empty());
    }

    #[test]
    fn queries_on_unknown_states_are_empty() {
        let (automaton, a, ..) = three_states();
        let ghost = StateId::new(42);

        assert_eq!(automaton.transition_labels_between(ghost, a), "");
        assert_eq!(automaton.outgoing(ghost).count(), 0);
    }

    #[test]
    fn self_loop_is_supported() {
        let (mut automaton, a, ..) = three_states();
        automaton
            .add_transition(Transition::new(a, a, "stay", "stable"))
            .unwrap();

        assert_eq!(automaton.transition_labels_between(a, a), "stay");
    }

    #[test]
    fn acceptance_subset_follows_classification() {
        let mut automaton = Automaton::new("acc");
        automaton.add_state(State::new("a"));
        let b = automaton.add_state(State::new("b").accepting());
        let c = automaton.add_state(
            State::new("c").with_classification(Classification::Acceptance),
        );

        assert_eq!(automaton.acceptance_state_ids(), vec![b, c]);
    }

    #[test]
    fn clone_is_independent() {
        let (mut original, a, b, _) = three_states();
        original.add_transition(Transition::new(a, b, "x", "")).unwrap();

        let mut copy = original.clone();
        copy.add_state(State::new("extra"));
        copy.add_transition(Transition::new(b, a, "back", "")).unwrap();
        copy.set_name("copy");

        assert_eq!(original.states().len(), 3);
        assert_eq!(original.transitions().len(), 1);
        assert_eq!(original.labels().len(), 1);
        assert!(original.state(b).unwrap().outgoing().is_empty());
        assert_eq!(original.name(), "test");
        assert_eq!(copy.states().len(), 4);
    }

    #[test]
    fn add_state_discards_foreign_outgoing_list() {
        let (mut source, a, b, _) = three_states();
        source.add_transition(Transition::new(a, b, "x", "")).unwrap();

        let mut target = Automaton::new("target");
        let id = target.add_state(source.state(a).unwrap().clone());

        assert!(target.state(id).unwrap().outgoing().is_empty());
    }
}
