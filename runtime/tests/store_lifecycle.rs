//! Integration tests for store creation, dispatch and reducer replacement

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use reduxide_core::{
    ErrorCategory, Mode, Reducer, ReducerMap, StoreError, Value, action, combine_reducers_with_mode,
    reducer,
};
use reduxide_runtime::{Store, create_store};
use reduxide_testing::assertions::{assert_category, assert_json, assert_same};
use reduxide_testing::{ListenerProbe, fixtures, init_test_tracing};
use serde_json::json;

// ============================================================================
// Test Fixtures
// ============================================================================

fn app_reducer() -> impl Reducer {
    combine_reducers_with_mode(
        ReducerMap::new()
            .with("counter", fixtures::counter_reducer())
            .with("todos", fixtures::todos_reducer()),
        Mode::Development,
    )
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_state_after_creation_matches_initialization() {
    init_test_tracing();
    let expected = app_reducer().reduce(None, &action::init()).unwrap().unwrap();

    let store = create_store(app_reducer(), None, None).unwrap();

    assert_eq!(store.get_state().unwrap(), expected);
    assert_json(&store.get_state().unwrap(), json!({ "counter": 0, "todos": [] }));
}

#[test]
fn test_preloaded_state_reaches_the_reducer() {
    let preloaded = Value::from(json!({ "counter": 5, "todos": ["a"] }));

    let store = create_store(app_reducer(), Some(preloaded.clone()), None).unwrap();

    assert_same(&store.get_state().unwrap(), &preloaded);
}

#[test]
fn test_preloaded_unexpected_keys_survive_initialization() {
    let preloaded = Value::from(json!({ "counter": 1, "todos": [], "stray": true }));

    let store = create_store(app_reducer(), Some(preloaded.clone()), None).unwrap();

    assert_same(&store.get_state().unwrap(), &preloaded);
}

#[test]
fn test_builder_matches_create_store() {
    let store = Store::builder(fixtures::counter_reducer())
        .preloaded_state(10)
        .build()
        .unwrap();

    store.dispatch(action::new("INCREMENT")).unwrap();
    assert_eq!(store.get_state().unwrap(), Value::from(11));
}

#[test]
fn test_broken_combined_reducer_fails_creation() {
    let root = combine_reducers_with_mode(
        ReducerMap::new().with("bad", fixtures::absent_on_init_reducer()),
        Mode::Production,
    );

    let result = create_store(root, None, None);

    assert!(matches!(
        &result,
        Err(StoreError::MissingInitialState { key }) if key == "bad"
    ));
}

#[test]
fn test_stores_are_independent() {
    let first = create_store(fixtures::counter_reducer(), None, None).unwrap();
    let second = create_store(fixtures::counter_reducer(), None, None).unwrap();

    first.dispatch(action::new("INCREMENT")).unwrap();

    assert_eq!(first.get_state().unwrap(), Value::from(1));
    assert_eq!(second.get_state().unwrap(), Value::from(0));
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_dispatch_returns_the_action() {
    let store = create_store(app_reducer(), None, None).unwrap();
    let add = action::with_payload("ADD_TODO", [("text", "milk")]);

    let returned = store.dispatch(add.clone()).unwrap();

    assert_same(&returned, &add);
    assert_json(&store.get_state().unwrap(), json!({ "counter": 0, "todos": ["milk"] }));
}

#[test]
fn test_unknown_action_keeps_state_identity() {
    let store = create_store(app_reducer(), None, None).unwrap();
    let before = store.get_state().unwrap();

    store.dispatch(action::new("NOBODY_HANDLES_THIS")).unwrap();

    assert_same(&store.get_state().unwrap(), &before);
}

#[test]
fn test_malformed_actions_are_rejected_before_the_reducer() {
    let store = create_store(fixtures::counter_reducer(), None, None).unwrap();
    let probe = ListenerProbe::new();
    let _subscription = store.subscribe(probe.listener()).unwrap();

    for malformed in [
        Value::from(1),
        Value::from("INCREMENT"),
        Value::list([action::new("INCREMENT")]),
        Value::instance(42_u8),
        Value::from(json!({ "payload": 1 })),
    ] {
        assert_category(&store.dispatch(malformed), ErrorCategory::Validation);
    }

    assert_eq!(store.get_state().unwrap(), Value::from(0));
    assert_eq!(probe.calls(), 0);
}

#[test]
fn test_null_type_is_a_valid_action() {
    let store = create_store(fixtures::counter_reducer(), None, None).unwrap();

    store.dispatch(Value::from(json!({ "type": null }))).unwrap();

    assert_eq!(store.get_state().unwrap(), Value::from(0));
}

#[test]
fn test_root_reducer_returning_nothing_leaves_state_unchanged() {
    let flaky = reducer::from_fn(|state: Option<Value>, action: &Value| {
        Ok(match action::kind(action).and_then(Value::as_str) {
            Some("VANISH") => None,
            _ => Some(state.unwrap_or(Value::from(1))),
        })
    });
    let store = create_store(flaky, None, None).unwrap();
    let probe = ListenerProbe::new();
    let _subscription = store.subscribe(probe.listener()).unwrap();

    let error = store.dispatch(action::new("VANISH")).unwrap_err();

    assert!(matches!(error, StoreError::RootReducerReturnedNothing { .. }));
    assert!(error.is_configuration());
    assert_eq!(store.get_state().unwrap(), Value::from(1));
    assert_eq!(probe.calls(), 0);
}

#[derive(Debug)]
struct OutOfStock;

impl std::fmt::Display for OutOfStock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("out of stock")
    }
}

impl std::error::Error for OutOfStock {}

#[test]
fn test_reducer_errors_propagate_unmodified() {
    let picky = reducer::with_initial_state(0, |state, action| {
        match action::kind(action).and_then(Value::as_str) {
            Some("BUY") => Err(StoreError::custom(OutOfStock)),
            _ => Ok(state),
        }
    });
    let store = create_store(picky, None, None).unwrap();

    let error = store.dispatch(action::new("BUY")).unwrap_err();

    assert_eq!(error.category(), ErrorCategory::External);
    assert!(error.downcast_custom::<OutOfStock>().is_some());
    // The dispatching flag was reset.
    store.dispatch(action::new("ANY")).unwrap();
}

// ============================================================================
// Reducer replacement
// ============================================================================

#[test]
fn test_replace_reducer_reinitializes_with_current_state() {
    let store = create_store(fixtures::counter_reducer(), Some(Value::from(3)), None).unwrap();
    let probe = ListenerProbe::new();
    let _subscription = store.subscribe(probe.listener()).unwrap();

    let doubling = reducer::with_initial_state(0, |state, action| {
        Ok(if action::is_init(action) {
            Value::from(state.as_i64().unwrap_or(0) * 2)
        } else {
            state
        })
    });
    store.replace_reducer(doubling).unwrap();

    assert_eq!(store.get_state().unwrap(), Value::from(6));
    assert_eq!(probe.calls(), 1);

    store.dispatch(action::new("INCREMENT")).unwrap();
    assert_eq!(store.get_state().unwrap(), Value::from(6));
}

#[test]
fn test_replace_reducer_adds_new_slices() {
    let store = create_store(
        combine_reducers_with_mode(
            ReducerMap::new().with("counter", fixtures::counter_reducer()),
            Mode::Production,
        ),
        None,
        None,
    )
    .unwrap();
    store.dispatch(action::new("INCREMENT")).unwrap();

    store.replace_reducer(app_reducer()).unwrap();

    assert_json(&store.get_state().unwrap(), json!({ "counter": 1, "todos": [] }));
}
