//! Interval constraints over monitored variables.
//!
//! An [`IntervalConstraint`] is the admissible numeric range of one monitored
//! variable inside a state. Matching is a pure check of a single reading
//! against the range, honoring the inclusivity of each bound.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::ops::Bound;
use thiserror::Error;

/// Numeric identifier of a monitored variable (e.g. heart rate, SpO2).
pub type VariableId = u32;

/// Errors raised when an interval cannot be constructed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IntervalError {
    #[error("interval bound for variable {variable} is NaN")]
    NaNBound { variable: VariableId },

    #[error("interval for variable {variable} has lower bound {lower} above upper bound {upper}")]
    Inverted {
        variable: VariableId,
        lower: f64,
        upper: f64,
    },
}

/// A point-in-time mapping from variable id to measured value.
///
/// Implemented for `HashMap` and `BTreeMap` so callers can hand over whatever
/// collection their acquisition layer produces.
pub trait ReadingSnapshot {
    /// The reading for `variable`, if one was taken.
    fn reading(&self, variable: VariableId) -> Option<f64>;
}

impl<S: BuildHasher> ReadingSnapshot for HashMap<VariableId, f64, S> {
    fn reading(&self, variable: VariableId) -> Option<f64> {
        self.get(&variable).copied()
    }
}

impl ReadingSnapshot for BTreeMap<VariableId, f64> {
    fn reading(&self, variable: VariableId) -> Option<f64> {
        self.get(&variable).copied()
    }
}

impl<T: ReadingSnapshot + ?Sized> ReadingSnapshot for &T {
    fn reading(&self, variable: VariableId) -> Option<f64> {
        (**self).reading(variable)
    }
}

/// The admissible range of one monitored variable.
///
/// A lower bound of `-inf` or an upper bound of `+inf` is normalised to
/// [`Bound::Unbounded`]. A lower bound of `+inf` or an upper bound of `-inf`
/// admits no finite reading and is rejected as inverted.
///
/// # Example
///
/// ```rust
/// use interval_automaton::core::IntervalConstraint;
/// use std::ops::Bound;
///
/// let normal_heart_rate = IntervalConstraint::closed(1, 60.0, 100.0).unwrap();
/// assert!(normal_heart_rate.contains(60.0));
/// assert!(!normal_heart_rate.contains(100.5));
///
/// let tachycardia =
///     IntervalConstraint::new(1, Bound::Excluded(100.0), Bound::Unbounded).unwrap();
/// assert!(!tachycardia.contains(100.0));
/// assert!(tachycardia.contains(140.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalConstraint {
    variable: VariableId,
    lower: Bound<f64>,
    upper: Bound<f64>,
}

impl IntervalConstraint {
    /// Create a constraint from explicit bounds.
    pub fn new(
        variable: VariableId,
        lower: Bound<f64>,
        upper: Bound<f64>,
    ) -> Result<Self, IntervalError> {
        for bound in [lower, upper] {
            if bound_value(&bound).is_some_and(f64::is_nan) {
                return Err(IntervalError::NaNBound { variable });
            }
        }

        let lo = bound_value(&lower).unwrap_or(f64::NEG_INFINITY);
        let hi = bound_value(&upper).unwrap_or(f64::INFINITY);
        if lo > hi || lo == f64::INFINITY || hi == f64::NEG_INFINITY {
            return Err(IntervalError::Inverted {
                variable,
                lower: lo,
                upper: hi,
            });
        }

        // Only the outward infinity on each side means "no bound".
        let lower = if lo == f64::NEG_INFINITY {
            Bound::Unbounded
        } else {
            lower
        };
        let upper = if hi == f64::INFINITY {
            Bound::Unbounded
        } else {
            upper
        };

        Ok(Self {
            variable,
            lower,
            upper,
        })
    }

    /// Create a closed interval `[lower, upper]`.
    pub fn closed(variable: VariableId, lower: f64, upper: f64) -> Result<Self, IntervalError> {
        Self::new(variable, Bound::Included(lower), Bound::Included(upper))
    }

    /// Create an interval admitting every reading of `variable`.
    ///
    /// The variable must still be present in a snapshot for a state to match.
    pub fn unbounded(variable: VariableId) -> Self {
        Self {
            variable,
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    pub fn variable(&self) -> VariableId {
        self.variable
    }

    pub fn lower(&self) -> Bound<f64> {
        self.lower
    }

    pub fn upper(&self) -> Bound<f64> {
        self.upper
    }

    /// Check if `value` falls within the interval.
    ///
    /// NaN never matches.
    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }

        let above_lower = match self.lower {
            Bound::Included(lo) => value >= lo,
            Bound::Excluded(lo) => value > lo,
            Bound::Unbounded => true,
        };
        let below_upper = match self.upper {
            Bound::Included(hi) => value <= hi,
            Bound::Excluded(hi) => value < hi,
            Bound::Unbounded => true,
        };

        above_lower && below_upper
    }
}

fn bound_value(bound: &Bound<f64>) -> Option<f64> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => Some(*v),
        Bound::Unbounded => None,
    }
}
