//! Persisted forms of an automaton.
//!
//! This module provides the short-key JSON document used to exchange
//! automaton definitions and a versioned binary snapshot. Both go through the
//! typed records in [`record`], so decoding from either form validates the
//! same invariants.

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub mod error;
pub mod json;
pub mod record;
pub mod snapshot;

pub use error::{DecodeError, SchemaViolation};
pub use record::{AutomatonRecord, IntervalRecord, StateRecord, TransitionRecord};
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};

/// Accumulates schema checks so that every violation is reported at once
/// instead of stopping at the first one.
#[derive(Default)]
pub(crate) struct Checks {
    checks: Vec<Validation<(), NonEmptyVec<SchemaViolation>>>,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&mut self, violation: SchemaViolation) {
        self.checks.push(Validation::fail(violation));
    }

    /// Check that `index` addresses one of `len` states.
    pub(crate) fn state_index(&mut self, index: usize, len: usize, path: String) {
        let check = if index < len {
            Validation::success(())
        } else {
            Validation::fail(SchemaViolation::StateIndexOutOfRange { path, index, len })
        };
        self.checks.push(check);
    }

    /// Combine every check, failing with all recorded violations.
    pub(crate) fn finish(self) -> Result<(), DecodeError> {
        let combined = Validation::all_vec(self.checks).map(|_| ());
        if let Validation::Failure(errors) = combined {
            return Err(DecodeError::Invalid {
                violations: errors.iter().cloned().collect(),
            });
        }
        Ok(())
    }
}
