//! Builder API for ergonomic automaton construction.
//!
//! This module provides fluent builders and macros for creating automata
//! with minimal boilerplate. States are named once and transitions refer to
//! them by name.
//!
//! # Example
//!
//! ```
//! use interval_automaton::builder::{AutomatonBuilder, StateBuilder};
//! use interval_automaton::readings;
//!
//! let automaton = AutomatonBuilder::new("oxygen saturation")
//!     .state(StateBuilder::new("normal").between(2, 95.0, 100.0).accepting())
//!     .state(StateBuilder::new("hypoxemia").below(2, 95.0))
//!     .transition("normal", "hypoxemia", "R4", "saturation dropped below 95%")
//!     .build()
//!     .unwrap();
//!
//! let before = automaton.find_matching_state_id(&readings! { 2 => 98 }).unwrap();
//! let after = automaton.find_matching_state_id(&readings! { 2 => 91 }).unwrap();
//! assert_eq!(
//!     automaton.transition_messages_between(before, after),
//!     "saturation dropped below 95%"
//! );
//! ```

pub mod automaton;
pub mod error;
pub mod macros;
pub mod state;

pub use automaton::AutomatonBuilder;
pub use error::BuildError;
pub use state::StateBuilder;
