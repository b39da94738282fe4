//! Interval Automaton: a declarative finite automaton over monitored readings
//!
//! The automaton classifies a snapshot of continuous variables (for example
//! vital-sign readings) into the first state whose numeric intervals all
//! accept it, and describes what moving between two states means through
//! labeled transitions. It is a passive definition: it never advances on its
//! own; callers query it with successive snapshots.
//!
//! # Core Concepts
//!
//! - **State**: per-variable intervals plus an ordinary/acceptance classification
//! - **Transition**: a labeled, directed edge carrying a human-readable message
//! - **Automaton**: owns states and transitions; first-match-wins classification
//! - **Codec**: the short-key JSON document and a versioned binary snapshot
//!
//! # Example
//!
//! ```rust
//! use interval_automaton::builder::{AutomatonBuilder, StateBuilder};
//! use interval_automaton::core::Automaton;
//! use interval_automaton::readings;
//!
//! let automaton = AutomatonBuilder::new("heart rate")
//!     .state(StateBuilder::new("normal").between(1, 60.0, 100.0).accepting())
//!     .state(StateBuilder::new("tachycardia").above(1, 100.0))
//!     .transition("normal", "tachycardia", "R1", "heart rate above 100 bpm")
//!     .transition("normal", "tachycardia", "R2", "sustained effort")
//!     .build()
//!     .unwrap();
//!
//! let previous = automaton.find_matching_state_id(&readings! { 1 => 72 }).unwrap();
//! let current = automaton.find_matching_state_id(&readings! { 1 => 128 }).unwrap();
//! assert_eq!(automaton.transition_labels_between(previous, current), "R1_ou_R2");
//!
//! // Readings outside every state are reported, not silently classified.
//! let unmatched = automaton.find_matching_state(&readings! { 1 => 40 });
//! assert_eq!(unmatched.unwrap_err().to_string(), "value not monitored");
//!
//! // The definition persists as a short-key JSON document.
//! let restored = Automaton::from_json(&automaton.to_json()).unwrap();
//! assert_eq!(restored, automaton);
//! ```

pub mod builder;
pub mod codec;
pub mod core;

// Re-export commonly used types
pub use codec::{DecodeError, Snapshot};
pub use core::{
    Automaton, Classification, IntervalConstraint, NoMatchError, State, StateId, Transition,
};
