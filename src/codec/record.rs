//! Typed wire records shared by the JSON and binary forms.
//!
//! A record mirrors the persisted schema one to one: states and transitions
//! are plain lists and every cross reference is a position in the state list.
//! Converting a record into an [`Automaton`] is where indices, classification
//! codes and intervals are checked.

use super::error::{DecodeError, SchemaViolation};
use super::Checks;
use crate::core::{
    Automaton, Classification, IntervalConstraint, State, StateId, Transition, UnknownStateError,
    VariableId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Persisted form of an automaton.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomatonRecord {
    pub name: String,
    pub transitions: Vec<TransitionRecord>,
    pub states: Vec<StateRecord>,
    /// Positions of the acceptance states
    pub acceptance: Vec<usize>,
    /// Raw JSON text of the reserved keys present in the source document
    pub reserved: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub origin: usize,
    pub destination: usize,
    pub label: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub name: String,
    pub intervals: Vec<IntervalRecord>,
    /// Raw classification code, see [`Classification::code`]
    pub classification: u64,
}

/// One interval; a `None` bound is unbounded on that side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntervalRecord {
    pub variable: VariableId,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl IntervalRecord {
    fn from_constraint(constraint: &IntervalConstraint) -> Self {
        let (lower, lower_inclusive) = split_bound(constraint.lower());
        let (upper, upper_inclusive) = split_bound(constraint.upper());
        Self {
            variable: constraint.variable(),
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        }
    }

    fn bounds(&self) -> (Bound<f64>, Bound<f64>) {
        (
            join_bound(self.lower, self.lower_inclusive),
            join_bound(self.upper, self.upper_inclusive),
        )
    }
}

fn split_bound(bound: Bound<f64>) -> (Option<f64>, bool) {
    match bound {
        Bound::Included(v) => (Some(v), true),
        Bound::Excluded(v) => (Some(v), false),
        Bound::Unbounded => (None, true),
    }
}

fn join_bound(value: Option<f64>, inclusive: bool) -> Bound<f64> {
    match value {
        Some(v) if inclusive => Bound::Included(v),
        Some(v) => Bound::Excluded(v),
        None => Bound::Unbounded,
    }
}

impl From<UnknownStateError> for DecodeError {
    fn from(err: UnknownStateError) -> Self {
        DecodeError::Invalid {
            violations: vec![SchemaViolation::StateIndexOutOfRange {
                path: super::json::KEY_TRANSITIONS.to_string(),
                index: err.id.index(),
                len: err.len,
            }],
        }
    }
}

impl Automaton {
    /// Capture the automaton as a record.
    ///
    /// Indices are computed from the current sequence order.
    pub fn to_record(&self) -> AutomatonRecord {
        let states = self
            .states()
            .iter()
            .map(|state| StateRecord {
                name: state.name().to_string(),
                intervals: state
                    .constraints()
                    .iter()
                    .map(IntervalRecord::from_constraint)
                    .collect(),
                classification: u64::from(state.classification().code()),
            })
            .collect();

        let transitions = self
            .transitions()
            .iter()
            .map(|t| TransitionRecord {
                origin: t.origin().index(),
                destination: t.destination().index(),
                label: t.label().to_string(),
                message: t.message().to_string(),
            })
            .collect();

        AutomatonRecord {
            name: self.name().to_string(),
            transitions,
            states,
            acceptance: self
                .acceptance_state_ids()
                .into_iter()
                .map(StateId::index)
                .collect(),
            reserved: self.reserved().clone(),
        }
    }

    /// Build an automaton from a record, validating every cross reference.
    ///
    /// States listed in the acceptance list are classified as acceptance
    /// states. Transitions are registered in record order, so a repeated
    /// `(origin, destination, label)` keeps its first message.
    pub fn from_record(record: AutomatonRecord) -> Result<Self, DecodeError> {
        let len = record.states.len();
        let mut checks = Checks::new();
        let mut states = Vec::with_capacity(len);

        for (i, state_record) in record.states.iter().enumerate() {
            let classification = u8::try_from(state_record.classification)
                .ok()
                .and_then(Classification::from_code);
            if classification.is_none() {
                checks.fail(SchemaViolation::UnknownClassification {
                    path: format!("3[{i}].3"),
                    code: state_record.classification,
                });
            }

            let mut state = State::new(state_record.name.clone())
                .with_classification(classification.unwrap_or_default());
            for (j, interval) in state_record.intervals.iter().enumerate() {
                let (lower, upper) = interval.bounds();
                match IntervalConstraint::new(interval.variable, lower, upper) {
                    Ok(constraint) => state.constrain(constraint),
                    Err(reason) => checks.fail(SchemaViolation::InvalidInterval {
                        path: format!("3[{i}].2[{j}]"),
                        reason,
                    }),
                }
            }
            states.push(state);
        }

        for (k, &index) in record.acceptance.iter().enumerate() {
            checks.state_index(index, len, format!("4[{k}]"));
        }
        for (t, transition) in record.transitions.iter().enumerate() {
            checks.state_index(transition.origin, len, format!("2[{t}].1"));
            checks.state_index(transition.destination, len, format!("2[{t}].2"));
        }

        for (key, text) in &record.reserved {
            if !super::json::RESERVED_KEYS.contains(&key.as_str()) {
                checks.fail(SchemaViolation::InvalidReserved {
                    key: key.clone(),
                    reason: "not a reserved key".to_string(),
                });
            } else if let Err(err) = serde_json::from_str::<serde::de::IgnoredAny>(text) {
                checks.fail(SchemaViolation::InvalidReserved {
                    key: key.clone(),
                    reason: err.to_string(),
                });
            }
        }

        checks.finish()?;

        for &index in &record.acceptance {
            if let Some(state) = states.get_mut(index) {
                state.set_classification(Classification::Acceptance);
            }
        }

        let mut automaton = Automaton::new(record.name);
        automaton.set_reserved(record.reserved);
        for state in states {
            automaton.add_state(state);
        }
        for transition in record.transitions {
            let inserted = automaton.add_transition(Transition::new(
                StateId::new(transition.origin),
                StateId::new(transition.destination),
                transition.label,
                transition.message,
            ))?;
            if !inserted {
                tracing::debug!(
                    origin = transition.origin,
                    destination = transition.destination,
                    "duplicate transition ignored"
                );
            }
        }

        Ok(automaton)
    }
}
