//! Codec error types.

use crate::core::IntervalError;
use thiserror::Error;

/// A single problem found while validating an automaton document.
///
/// Paths name fields by their persisted keys, with list positions in brackets:
/// `3[1].2[0].2` is the lower bound of the first interval of the second state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaViolation {
    #[error("missing required field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}` must be {expected}")]
    WrongType {
        path: String,
        expected: &'static str,
    },

    #[error("field `{path}` is not a number: {value}")]
    NotANumber { path: String, value: String },

    #[error("field `{path}` is not a non-negative integer: {value}")]
    NotAnInteger { path: String, value: String },

    #[error("field `{path}` references state {index}, but there are {len} states")]
    StateIndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("field `{path}` has unknown classification code {code}")]
    UnknownClassification { path: String, code: u64 },

    #[error("field `{path}` is not a valid interval: {reason}")]
    InvalidInterval { path: String, reason: IntervalError },

    #[error("reserved key `{key}` does not hold valid JSON: {reason}")]
    InvalidReserved { key: String, reason: String },
}

/// Errors that can occur while decoding an automaton.
///
/// Decoding fails fast as a whole: no partially built automaton is ever
/// returned, and every violation found is reported together.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is not a syntactically valid document
    #[error("malformed automaton document: {0}")]
    Malformed(String),

    /// The document is well formed but does not describe a valid automaton
    #[error("invalid automaton document: {}", describe(.violations))]
    Invalid { violations: Vec<SchemaViolation> },
}

impl DecodeError {
    /// Every schema violation behind this error; empty for malformed input.
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::Malformed(_) => &[],
            Self::Invalid { violations } => violations.as_slice(),
        }
    }
}

fn describe(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_violation() {
        let err = DecodeError::Invalid {
            violations: vec![
                SchemaViolation::MissingField { path: "1".into() },
                SchemaViolation::StateIndexOutOfRange {
                    path: "2[0].2".into(),
                    index: 4,
                    len: 2,
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "invalid automaton document: missing required field `1`; \
             field `2[0].2` references state 4, but there are 2 states"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn malformed_has_no_violations() {
        let err = DecodeError::Malformed("EOF while parsing".into());
        assert!(err.violations().is_empty());
    }
}
