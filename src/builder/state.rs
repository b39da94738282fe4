//! Builder for constructing states.

use crate::builder::error::BuildError;
use crate::core::{Classification, IntervalConstraint, State, VariableId};
use std::ops::Bound;

/// Builder for constructing states with a fluent API.
///
/// Interval errors are reported by [`StateBuilder::build`], not by the
/// individual setters.
#[derive(Clone, Debug)]
pub struct StateBuilder {
    name: String,
    intervals: Vec<(VariableId, Bound<f64>, Bound<f64>)>,
    classification: Classification,
}

impl StateBuilder {
    /// Create a new builder for an ordinary state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
            classification: Classification::Ordinary,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constrain `variable` to explicit bounds.
    pub fn interval(mut self, variable: VariableId, lower: Bound<f64>, upper: Bound<f64>) -> Self {
        self.intervals.push((variable, lower, upper));
        self
    }

    /// Constrain `variable` to `[lower, upper]`.
    pub fn between(self, variable: VariableId, lower: f64, upper: f64) -> Self {
        self.interval(variable, Bound::Included(lower), Bound::Included(upper))
    }

    /// Constrain `variable` to readings strictly above `lower`.
    pub fn above(self, variable: VariableId, lower: f64) -> Self {
        self.interval(variable, Bound::Excluded(lower), Bound::Unbounded)
    }

    /// Constrain `variable` to readings strictly below `upper`.
    pub fn below(self, variable: VariableId, upper: f64) -> Self {
        self.interval(variable, Bound::Unbounded, Bound::Excluded(upper))
    }

    /// Mark the state as an acceptance state.
    pub fn accepting(mut self) -> Self {
        self.classification = Classification::Acceptance;
        self
    }

    /// Build the state.
    pub fn build(self) -> Result<State, BuildError> {
        let mut state = State::new(self.name.clone()).with_classification(self.classification);
        for (variable, lower, upper) in self.intervals {
            let constraint = IntervalConstraint::new(variable, lower, upper).map_err(|source| {
                BuildError::InvalidInterval {
                    state: self.name.clone(),
                    source,
                }
            })?;
            state.constrain(constraint);
        }
        Ok(state)
    }
}
