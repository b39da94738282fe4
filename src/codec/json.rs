//! JSON form of an automaton.
//!
//! The document uses short fixed keys, kept verbatim for compatibility with
//! previously persisted automata:
//!
//! | key | content |
//! |-----|---------|
//! | `"1"` | automaton name |
//! | `"2"` | transitions: `{"1": origin, "2": destination, "3": label, "4": message}` |
//! | `"3"` | states: `{"1": name, "2": intervals, "3": classification code}` |
//! | `"4"` | positions of the acceptance states |
//! | `"5"`-`"8"` | reserved, carried through unchanged |
//!
//! An interval is `{"1": variable, "2": lower, "3": upper, "4": lower
//! inclusive, "5": upper inclusive}`; a `null` bound is unbounded and the
//! inclusivity flags default to `true`. Numbers may also be given as strings.
//!
//! # Example
//!
//! ```rust
//! use interval_automaton::core::{Automaton, StateId};
//! use std::collections::HashMap;
//!
//! let document = r#"{
//!     "1": "heart rate",
//!     "2": [{"1": 0, "2": 1, "3": "R1", "4": "tachycardia onset"}],
//!     "3": [
//!         {"1": "normal", "2": [{"1": 1, "2": 60, "3": 100}], "3": 0},
//!         {"1": "high", "2": [{"1": 1, "2": 100, "3": null, "4": false}], "3": 1}
//!     ],
//!     "4": [1]
//! }"#;
//!
//! let automaton = Automaton::from_json(document).unwrap();
//! let state = automaton
//!     .find_matching_state_id(&HashMap::from([(1, 120.0)]))
//!     .unwrap();
//! assert_eq!(state, StateId::new(1));
//! assert_eq!(automaton.transition_labels_between(StateId::new(0), state), "R1");
//!
//! let again = Automaton::from_json(&automaton.to_json()).unwrap();
//! assert_eq!(again, automaton);
//! ```

use super::error::{DecodeError, SchemaViolation};
use super::record::{AutomatonRecord, IntervalRecord, StateRecord, TransitionRecord};
use super::Checks;
use crate::core::{Automaton, VariableId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const KEY_NAME: &str = "1";
pub const KEY_TRANSITIONS: &str = "2";
pub const KEY_STATES: &str = "3";
pub const KEY_ACCEPTANCE: &str = "4";

/// Keys set aside for a secondary transitions/states encoding.
///
/// Their values are not interpreted; a decoded automaton keeps them as raw
/// JSON and writes them back on encode.
pub const RESERVED_KEYS: [&str; 4] = ["5", "6", "7", "8"];

const TRANSITION_ORIGIN: &str = "1";
const TRANSITION_DESTINATION: &str = "2";
const TRANSITION_LABEL: &str = "3";
const TRANSITION_MESSAGE: &str = "4";

const STATE_NAME: &str = "1";
const STATE_INTERVALS: &str = "2";
const STATE_CLASSIFICATION: &str = "3";

const INTERVAL_VARIABLE: &str = "1";
const INTERVAL_LOWER: &str = "2";
const INTERVAL_UPPER: &str = "3";
const INTERVAL_LOWER_INCLUSIVE: &str = "4";
const INTERVAL_UPPER_INCLUSIVE: &str = "5";

impl Automaton {
    /// Decode an automaton from JSON text.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        Self::decode(&document)
    }

    /// Decode an automaton from a parsed JSON document.
    ///
    /// Field presence and types are checked for the whole document first,
    /// then indices and intervals; all violations are reported in one
    /// [`DecodeError::Invalid`].
    pub fn decode(document: &Value) -> Result<Self, DecodeError> {
        let result = read_document(document).and_then(Automaton::from_record);

        match &result {
            Ok(automaton) => tracing::debug!(
                automaton = automaton.name(),
                states = automaton.states().len(),
                transitions = automaton.transitions().len(),
                "decoded automaton"
            ),
            Err(err) => tracing::debug!(error = %err, "failed to decode automaton"),
        }

        result
    }

    /// Encode the automaton as a JSON document.
    pub fn encode(&self) -> Value {
        write_document(&self.to_record())
    }

    /// Encode the automaton as compact JSON text.
    pub fn to_json(&self) -> String {
        self.encode().to_string()
    }
}

fn write_document(record: &AutomatonRecord) -> Value {
    let mut document = Map::new();
    document.insert(KEY_NAME.into(), Value::from(record.name.as_str()));
    document.insert(
        KEY_TRANSITIONS.into(),
        record.transitions.iter().map(write_transition).collect(),
    );
    document.insert(
        KEY_STATES.into(),
        record.states.iter().map(write_state).collect(),
    );
    document.insert(
        KEY_ACCEPTANCE.into(),
        record.acceptance.iter().copied().map(Value::from).collect(),
    );
    for (key, text) in &record.reserved {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                document.insert(key.clone(), value);
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "dropping unreadable reserved key")
            }
        }
    }
    Value::Object(document)
}

fn write_transition(transition: &TransitionRecord) -> Value {
    let mut map = Map::new();
    map.insert(TRANSITION_ORIGIN.into(), Value::from(transition.origin));
    map.insert(
        TRANSITION_DESTINATION.into(),
        Value::from(transition.destination),
    );
    map.insert(
        TRANSITION_LABEL.into(),
        Value::from(transition.label.as_str()),
    );
    map.insert(
        TRANSITION_MESSAGE.into(),
        Value::from(transition.message.as_str()),
    );
    Value::Object(map)
}

fn write_state(state: &StateRecord) -> Value {
    let mut map = Map::new();
    map.insert(STATE_NAME.into(), Value::from(state.name.as_str()));
    map.insert(
        STATE_INTERVALS.into(),
        state.intervals.iter().map(write_interval).collect(),
    );
    map.insert(
        STATE_CLASSIFICATION.into(),
        Value::from(state.classification),
    );
    Value::Object(map)
}

fn write_interval(interval: &IntervalRecord) -> Value {
    let bound = |value: Option<f64>| value.map_or(Value::Null, Value::from);

    let mut map = Map::new();
    map.insert(INTERVAL_VARIABLE.into(), Value::from(interval.variable));
    map.insert(INTERVAL_LOWER.into(), bound(interval.lower));
    map.insert(INTERVAL_UPPER.into(), bound(interval.upper));
    map.insert(
        INTERVAL_LOWER_INCLUSIVE.into(),
        Value::Bool(interval.lower_inclusive),
    );
    map.insert(
        INTERVAL_UPPER_INCLUSIVE.into(),
        Value::Bool(interval.upper_inclusive),
    );
    Value::Object(map)
}

fn read_document(document: &Value) -> Result<AutomatonRecord, DecodeError> {
    let mut reader = Reader::default();

    let Some(root) = reader.object(document, "document") else {
        return Err(reader.checks.finish().err().unwrap_or_else(|| {
            DecodeError::Malformed("document is not an object".to_string())
        }));
    };

    let reserved: BTreeMap<String, String> = RESERVED_KEYS
        .iter()
        .filter_map(|&key| {
            let value = root.get(key)?;
            tracing::debug!(key, "carrying reserved automaton key");
            Some((key.to_string(), value.to_string()))
        })
        .collect();

    let name = reader.string(root, KEY_NAME, KEY_NAME.to_string());

    let transitions = reader
        .array(root, KEY_TRANSITIONS, KEY_TRANSITIONS.to_string())
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let path = format!("{KEY_TRANSITIONS}[{i}]");
            let map = reader.object(value, &path)?;
            Some(TransitionRecord {
                origin: reader.index(map, TRANSITION_ORIGIN, &path),
                destination: reader.index(map, TRANSITION_DESTINATION, &path),
                label: reader.string(map, TRANSITION_LABEL, format!("{path}.{TRANSITION_LABEL}")),
                message: reader.string(
                    map,
                    TRANSITION_MESSAGE,
                    format!("{path}.{TRANSITION_MESSAGE}"),
                ),
            })
        })
        .collect();

    let states = reader
        .array(root, KEY_STATES, KEY_STATES.to_string())
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let path = format!("{KEY_STATES}[{i}]");
            let map = reader.object(value, &path)?;
            let name = reader.string(map, STATE_NAME, format!("{path}.{STATE_NAME}"));
            let intervals = reader
                .array(map, STATE_INTERVALS, format!("{path}.{STATE_INTERVALS}"))
                .iter()
                .enumerate()
                .filter_map(|(j, value)| {
                    let path = format!("{path}.{STATE_INTERVALS}[{j}]");
                    let map = reader.object(value, &path)?;
                    Some(read_interval(&mut reader, map, &path))
                })
                .collect();
            let classification = reader.integer(map, STATE_CLASSIFICATION, &path);
            Some(StateRecord {
                name,
                intervals,
                classification,
            })
        })
        .collect();

    let acceptance = reader
        .array(root, KEY_ACCEPTANCE, KEY_ACCEPTANCE.to_string())
        .iter()
        .enumerate()
        .map(|(k, value)| {
            let path = format!("{KEY_ACCEPTANCE}[{k}]");
            reader
                .read_integer(value, &path)
                .map(|v| reader.fit_index(v, &path))
                .unwrap_or_default()
        })
        .collect();

    reader.checks.finish()?;

    Ok(AutomatonRecord {
        name,
        transitions,
        states,
        acceptance,
        reserved,
    })
}

fn read_interval(reader: &mut Reader, map: &Map<String, Value>, path: &str) -> IntervalRecord {
    let variable = reader.integer(map, INTERVAL_VARIABLE, path);
    let variable = VariableId::try_from(variable).unwrap_or_else(|_| {
        reader.checks.fail(SchemaViolation::NotAnInteger {
            path: format!("{path}.{INTERVAL_VARIABLE}"),
            value: variable.to_string(),
        });
        0
    });

    IntervalRecord {
        variable,
        lower: reader.bound(map, INTERVAL_LOWER, path),
        upper: reader.bound(map, INTERVAL_UPPER, path),
        lower_inclusive: reader.flag(map, INTERVAL_LOWER_INCLUSIVE, path),
        upper_inclusive: reader.flag(map, INTERVAL_UPPER_INCLUSIVE, path),
    }
}

/// Reads typed fields, recording a violation and yielding a placeholder for
/// anything absent or mistyped. Placeholders never escape: a reader with a
/// recorded violation always finishes with an error.
#[derive(Default)]
struct Reader {
    checks: Checks,
}

impl Reader {
    fn object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        let object = value.as_object();
        if object.is_none() {
            self.checks.fail(SchemaViolation::WrongType {
                path: path.to_string(),
                expected: "an object",
            });
        }
        object
    }

    fn required<'a>(
        &mut self,
        map: &'a Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'a Value> {
        let value = map.get(key);
        if value.is_none() {
            self.checks.fail(SchemaViolation::MissingField {
                path: path.to_string(),
            });
        }
        value
    }

    fn string(&mut self, map: &Map<String, Value>, key: &str, path: String) -> String {
        match self.required(map, key, &path) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.checks.fail(SchemaViolation::WrongType {
                    path,
                    expected: "a string",
                });
                String::new()
            }
            None => String::new(),
        }
    }

    fn array<'a>(&mut self, map: &'a Map<String, Value>, key: &str, path: String) -> &'a [Value] {
        match self.required(map, key, &path) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.checks.fail(SchemaViolation::WrongType {
                    path,
                    expected: "a list",
                });
                &[]
            }
            None => &[],
        }
    }

    fn index(&mut self, map: &Map<String, Value>, key: &str, parent: &str) -> usize {
        let path = format!("{parent}.{key}");
        self.required(map, key, &path)
            .and_then(|value| self.read_integer(value, &path))
            .map(|v| self.fit_index(v, &path))
            .unwrap_or_default()
    }

    /// A list position; positions past the address space are reported.
    fn fit_index(&mut self, value: u64, path: &str) -> usize {
        usize::try_from(value).unwrap_or_else(|_| {
            self.checks.fail(SchemaViolation::NotAnInteger {
                path: path.to_string(),
                value: value.to_string(),
            });
            0
        })
    }

    fn integer(&mut self, map: &Map<String, Value>, key: &str, parent: &str) -> u64 {
        let path = format!("{parent}.{key}");
        self.required(map, key, &path)
            .and_then(|value| self.read_integer(value, &path))
            .unwrap_or_default()
    }

    fn bound(&mut self, map: &Map<String, Value>, key: &str, parent: &str) -> Option<f64> {
        let path = format!("{parent}.{key}");
        match self.required(map, key, &path)? {
            Value::Null => None,
            value => self.read_number(value, &path),
        }
    }

    fn flag(&mut self, map: &Map<String, Value>, key: &str, parent: &str) -> bool {
        match map.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.checks.fail(SchemaViolation::WrongType {
                    path: format!("{parent}.{key}"),
                    expected: "a boolean",
                });
                true
            }
        }
    }

    /// A JSON number, or a string holding one.
    fn read_number(&mut self, value: &Value, path: &str) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => {
                self.checks.fail(SchemaViolation::WrongType {
                    path: path.to_string(),
                    expected: "a number",
                });
                return None;
            }
        };
        if number.is_none() {
            self.checks.fail(SchemaViolation::NotANumber {
                path: path.to_string(),
                value: value.to_string(),
            });
        }
        number
    }

    /// A non-negative integral number; `2.0` is accepted.
    fn read_integer(&mut self, value: &Value, path: &str) -> Option<u64> {
        if let Some(v) = value.as_u64() {
            return Some(v);
        }
        let number = self.read_number(value, path)?;
        let integral = number.is_finite() && number >= 0.0 && number.fract() == 0.0;
        if integral && number < u64::MAX as f64 {
            return Some(number as u64);
        }
        self.checks.fail(SchemaViolation::NotAnInteger {
            path: path.to_string(),
            value: value.to_string(),
        });
        None
    }
}
