//! Builder for constructing automata.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::{Automaton, Transition};

/// Builder for constructing automata with a fluent API.
///
/// States are referenced by name when declaring transitions; names are
/// resolved to ids when [`AutomatonBuilder::build`] runs, so transitions may
/// be declared before the states they connect.
pub struct AutomatonBuilder {
    name: String,
    states: Vec<StateBuilder>,
    transitions: Vec<PendingTransition>,
}

struct PendingTransition {
    from: String,
    to: String,
    label: String,
    message: String,
}

impl AutomatonBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Add a state. Sequence order is declaration order.
    pub fn state(mut self, state: StateBuilder) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = StateBuilder>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add a transition between two named states.
    pub fn transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.transitions.push(PendingTransition {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            message: message.into(),
        });
        self
    }

    /// Build the automaton.
    /// Returns an error on duplicate state names, unknown state references or
    /// invalid intervals.
    pub fn build(self) -> Result<Automaton, BuildError> {
        let mut automaton = Automaton::new(self.name);

        for builder in self.states {
            if automaton.state_id(builder.name()).is_some() {
                return Err(BuildError::DuplicateState(builder.name().to_string()));
            }
            automaton.add_state(builder.build()?);
        }

        for pending in self.transitions {
            let resolve = |state: &str| {
                automaton
                    .state_id(state)
                    .ok_or_else(|| BuildError::UnknownState {
                        label: pending.label.clone(),
                        state: state.to_string(),
                    })
            };
            let from = resolve(&pending.from)?;
            let to = resolve(&pending.to)?;

            // Ids were resolved against this automaton, so registration cannot fail.
            if let Ok(false) = automaton.add_transition(Transition::new(
                from,
                to,
                pending.label,
                pending.message,
            )) {
                tracing::debug!(from = %pending.from, to = %pending.to, "duplicate transition ignored");
            }
        }

        Ok(automaton)
    }
}
