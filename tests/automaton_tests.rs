//! End-to-end behaviour of the automaton: classification, transition lookup,
//! persistence and caller-driven tracking.

use chrono::{Duration, Utc};
use interval_automaton::builder::{AutomatonBuilder, StateBuilder};
use interval_automaton::codec::{DecodeError, SchemaViolation};
use interval_automaton::core::{
    Automaton, IntervalConstraint, State, StateHistory, StateId, Transition,
};
use interval_automaton::readings;

const HEART_RATE: u32 = 1;
const SPO2: u32 = 2;

fn ranged(name: &str, lower: f64, upper: f64) -> State {
    State::new(name).with_constraint(IntervalConstraint::closed(HEART_RATE, lower, upper).unwrap())
}

fn vitals() -> Automaton {
    AutomatonBuilder::new("vitals")
        .state(
            StateBuilder::new("stable")
                .between(HEART_RATE, 60.0, 100.0)
                .between(SPO2, 95.0, 100.0)
                .accepting(),
        )
        .state(
            StateBuilder::new("tachycardic")
                .above(HEART_RATE, 100.0)
                .between(SPO2, 95.0, 100.0),
        )
        .state(StateBuilder::new("hypoxemic").below(SPO2, 95.0))
        .transition("stable", "tachycardic", "R1", "heart rate above 100 bpm")
        .transition("stable", "hypoxemic", "R2", "saturation below 95%")
        .transition("tachycardic", "hypoxemic", "R2", "saturation below 95%")
        .transition("tachycardic", "hypoxemic", "R3", "combined deterioration")
        .transition("hypoxemic", "stable", "R4", "recovered")
        .build()
        .unwrap()
}

#[test]
fn round_trip_preserves_public_construction() {
    let mut automaton = Automaton::new("round trip");
    let a = automaton.add_state(ranged("A", 0.0, 10.0).accepting());
    let b = automaton.add_state(ranged("B", 10.5, 20.0));
    let c = automaton.add_state(State::new("C"));
    automaton.add_transition(Transition::new(a, b, "x", "ab")).unwrap();
    automaton.add_transition(Transition::new(b, c, "y", "bc")).unwrap();
    automaton.add_transition(Transition::new(c, a, "z", "ca")).unwrap();

    let decoded = Automaton::decode(&automaton.encode()).unwrap();

    assert_eq!(decoded.name(), "round trip");
    assert_eq!(decoded.states(), automaton.states());
    assert_eq!(decoded.acceptance_state_ids(), vec![a]);
    let messages: Vec<&str> = decoded.transitions().iter().map(|t| t.message()).collect();
    assert_eq!(messages, vec!["ab", "bc", "ca"]);
    assert_eq!(decoded, automaton);
}

#[test]
fn first_match_wins() {
    let mut automaton = Automaton::new("overlap");
    let s1 = automaton.add_state(ranged("S1", 0.0, 10.0));
    automaton.add_state(ranged("S2", 5.0, 15.0));

    let matched = automaton
        .find_matching_state_id(&readings! { HEART_RATE => 7 })
        .unwrap();

    assert_eq!(matched, s1);
}

#[test]
fn no_match_is_an_error() {
    let automaton = vitals();

    let err = automaton
        .find_matching_state(&readings! { HEART_RATE => 40, SPO2 => 98 })
        .unwrap_err();

    assert_eq!(err.to_string(), "value not monitored");
}

#[test]
fn label_aggregation() {
    let mut automaton = Automaton::new("labels");
    let a = automaton.add_state(State::new("A"));
    let b = automaton.add_state(State::new("B"));
    let c = automaton.add_state(State::new("C"));
    automaton.add_transition(Transition::new(a, b, "x", "")).unwrap();
    automaton.add_transition(Transition::new(a, b, "y", "")).unwrap();
    automaton.add_transition(Transition::new(a, c, "z", "")).unwrap();

    assert_eq!(automaton.transition_labels_between(a, b), "x_ou_y");
    assert_eq!(automaton.transition_labels_between(a, c), "z");
    assert_eq!(automaton.transition_labels_between(b, a), "");
}

#[test]
fn duplicate_suppression() {
    let mut automaton = Automaton::new("dups");
    let a = automaton.add_state(State::new("A"));
    let b = automaton.add_state(State::new("B"));

    automaton.add_transition(Transition::new(a, b, "x", "one")).unwrap();
    automaton.add_transition(Transition::new(a, b, "x", "two")).unwrap();

    assert_eq!(automaton.transitions().len(), 1);
    assert_eq!(automaton.labels().len(), 1);
}

#[test]
fn copy_independence() {
    let original = vitals();
    let mut copy = original.clone();

    copy.add_state(State::new("extra"));

    assert_eq!(original.states().len(), 3);
    assert_eq!(copy.states().len(), 4);
}

#[test]
fn caller_driven_supervision() {
    let automaton = vitals();
    let start = Utc::now();
    let snapshots = [
        readings! { HEART_RATE => 75, SPO2 => 98 },
        readings! { HEART_RATE => 118, SPO2 => 97 },
        readings! { HEART_RATE => 121, SPO2 => 90 },
        readings! { HEART_RATE => 80, SPO2 => 99 },
    ];

    let mut current = automaton.find_matching_state_id(&snapshots[0]).unwrap();
    let mut history = StateHistory::new();
    for (minute, snapshot) in snapshots.iter().enumerate().skip(1) {
        let at = start + Duration::minutes(minute as i64);
        let step = automaton.infer_transition(current, snapshot, at).unwrap();
        current = step.to;
        history = history.record(step);
    }

    let labels: Vec<&str> = history
        .transitions()
        .iter()
        .map(|t| t.labels.as_str())
        .collect();
    assert_eq!(labels, vec!["R1", "R2_ou_R3", "R4"]);
    assert_eq!(
        history.transitions()[1].messages,
        "saturation below 95% | combined deterioration"
    );
    assert_eq!(
        history.get_path(),
        vec![StateId::new(0), StateId::new(1), StateId::new(2), StateId::new(0)]
    );
    assert_eq!(
        history.duration(),
        Some(std::time::Duration::from_secs(120))
    );
}

#[test]
fn decode_failure_returns_no_automaton() {
    let mut document = vitals().encode();
    document["2"][0]["2"] = serde_json::json!(12);
    document["3"][1]["2"][0]["2"] = serde_json::json!("fast");

    let err = Automaton::decode(&document).unwrap_err();

    assert!(matches!(err, DecodeError::Invalid { .. }));
    assert_eq!(
        err.violations(),
        &[SchemaViolation::NotANumber {
            path: "3[1].2[0].2".into(),
            value: "\"fast\"".into(),
        }]
    );
}

#[test]
fn persisted_document_keeps_short_keys() {
    let document = vitals().encode();
    let object = document.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["1", "2", "3", "4"]);
    assert_eq!(document["4"], serde_json::json!([0]));
}
