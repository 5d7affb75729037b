//! Unit tests for error aggregation and display.

use std::sync::Arc;

use rstest::rstest;

use super::OnionError;

#[rstest]
fn try_aggregate_none_on_empty() {
    assert!(OnionError::try_aggregate(Vec::<Arc<OnionError>>::new()).is_none());
}

#[rstest]
fn try_aggregate_returns_single_error_unchanged() {
    let err = OnionError::load("defaults", "boom");
    let outcome = OnionError::try_aggregate(vec![err]).expect("one error in, one out");
    assert!(matches!(outcome.as_ref(), OnionError::Load { layer, .. } if layer == "defaults"));
}

#[rstest]
fn try_aggregate_numbers_each_entry() {
    let outcome = OnionError::try_aggregate(vec![
        OnionError::load("first", "one"),
        OnionError::load("second", "two"),
    ])
    .expect("aggregate expected");
    match outcome.as_ref() {
        OnionError::Aggregate(agg) => {
            assert_eq!(agg.len(), 2);
            let display = agg.to_string();
            assert!(display.starts_with("1: failed to load layer 'first'"));
            assert!(display.contains("\n2: failed to load layer 'second'"));
        }
        other => panic!("expected Aggregate, got {other:?}"),
    }
}

#[rstest]
#[case(OnionError::UnknownFormat("ini".into()), "format 'ini' has no registered decoder")]
#[case(
    OnionError::DuplicateDecoder("json".into()),
    "decoder for format 'json' is already registered: you can have only one"
)]
#[case(
    OnionError::KeyConflict { key: "a.b".into(), segment: "a".into() },
    "cannot set 'a.b': segment 'a' is not a mapping"
)]
fn display_messages(#[case] err: OnionError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}
