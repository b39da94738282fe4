//! Versioned binary snapshots of an automaton.
//!
//! A snapshot wraps the typed record of an automaton with a format version,
//! an identifier and the capture time, and serializes it with `bincode`.
//! Restoring re-validates the record exactly like JSON decoding does.

use super::error::DecodeError;
use super::record::AutomatonRecord;
use crate::core::Automaton;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to the binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from the binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The captured automaton does not validate
    #[error("Snapshot holds an invalid automaton: {0}")]
    Invalid(#[from] DecodeError),
}

/// Serializable capture of an automaton definition.
///
/// # Example
///
/// ```rust
/// use interval_automaton::codec::Snapshot;
/// use interval_automaton::core::{Automaton, State};
///
/// let mut automaton = Automaton::new("respiration");
/// automaton.add_state(State::new("any").accepting());
///
/// let bytes = Snapshot::capture(&automaton).to_bytes().unwrap();
/// let restored = Snapshot::from_bytes(&bytes).unwrap().restore().unwrap();
/// assert_eq!(restored, automaton);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// The captured automaton
    pub automaton: AutomatonRecord,
}

impl Snapshot {
    /// Capture the current definition of `automaton`.
    pub fn capture(automaton: &Automaton) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            automaton: automaton.to_record(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Deserialize a snapshot, rejecting unsupported format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        Ok(snapshot)
    }

    /// Rebuild the captured automaton.
    pub fn restore(&self) -> Result<Automaton, SnapshotError> {
        let automaton = Automaton::from_record(self.automaton.clone())?;
        tracing::debug!(
            snapshot = %self.id,
            automaton = automaton.name(),
            "restored automaton from snapshot"
        );
        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SchemaViolation;
    use crate::core::{IntervalConstraint, State, Transition};
    use std::ops::Bound;

    fn sample() -> Automaton {
        let mut automaton = Automaton::new("temperature");
        let normal = automaton.add_state(
            State::new("normal").with_constraint(IntervalConstraint::closed(3, 36.0, 37.5).unwrap()),
        );
        let fever = automaton.add_state(
            State::new("fever")
                .with_constraint(
                    IntervalConstraint::new(3, Bound::Excluded(37.5), Bound::Unbounded).unwrap(),
                )
                .accepting(),
        );
        automaton
            .add_transition(Transition::new(normal, fever, "R3", "fever onset"))
            .unwrap();
        automaton
    }

    #[test]
    fn capture_records_current_definition() {
        let automaton = sample();
        let snapshot = Snapshot::capture(&automaton);

        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.automaton, automaton.to_record());
    }

    #[test]
    fn binary_round_trip_restores_automaton() {
        let automaton = sample();
        let snapshot = Snapshot::capture(&automaton);

        let bytes = snapshot.to_bytes().unwrap();
        let decoded = Snapshot::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.restore().unwrap(), automaton);
    }

    #[test]
    fn snapshots_get_distinct_ids() {
        let automaton = sample();
        assert_ne!(
            Snapshot::capture(&automaton).id,
            Snapshot::capture(&automaton).id
        );
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut snapshot = Snapshot::capture(&sample());
        snapshot.version = SNAPSHOT_VERSION + 1;
        let bytes = snapshot.to_bytes().unwrap();

        let err = Snapshot::from_bytes(&bytes).unwrap_err();

        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found, supported }
                if found == SNAPSHOT_VERSION + 1 && supported == SNAPSHOT_VERSION
        ));
    }

    #[test]
    fn truncated_bytes_fail_to_deserialize() {
        let bytes = Snapshot::capture(&sample()).to_bytes().unwrap();

        let err = Snapshot::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();

        assert!(matches!(err, SnapshotError::DeserializationFailed(_)));
    }

    #[test]
    fn restore_validates_record() {
        let mut snapshot = Snapshot::capture(&sample());
        snapshot.automaton.transitions[0].destination = 9;

        let err = snapshot.restore().unwrap_err();

        match err {
            SnapshotError::Invalid(decode) => assert_eq!(
                decode.violations(),
                &[SchemaViolation::StateIndexOutOfRange {
                    path: "2[0].2".into(),
                    index: 9,
                    len: 2,
                }]
            ),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
