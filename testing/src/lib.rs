//! # Reduxide Testing
//!
//! Testing utilities and helpers for reduxide reducers and stores.
//!
//! This crate provides:
//! - A Given-When-Then [`ReducerTest`] builder
//! - Assertion helpers for identity, contents and error categories
//! - Recorders for middleware order and listener calls
//! - Fixture reducers, including deliberately broken ones
//! - proptest strategies for values and actions
//!
//! ## Example
//!
//! ```
//! use reduxide_core::action;
//! use reduxide_runtime::create_store;
//! use reduxide_testing::{fixtures, ListenerProbe};
//!
//! let store = create_store(fixtures::counter_reducer(), None, None).unwrap();
//! let probe = ListenerProbe::new();
//! let _subscription = store.subscribe(probe.listener()).unwrap();
//!
//! store.dispatch(action::new("INCREMENT")).unwrap();
//! assert_eq!(probe.calls(), 1);
//! ```

pub mod recorders;
pub mod reducer_test;

pub use recorders::{ActionLog, ListenerProbe, recording_middleware, recording_reducer};
pub use reducer_test::{ReducerTest, assertions};

/// Install a `fmt` subscriber writing through the test harness.
///
/// Filtering follows `RUST_LOG`. Safe to call from every test; only the
/// first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Reducers for tests
///
/// Well-behaved fixtures follow every reducer rule; the broken ones each
/// violate exactly one.
pub mod fixtures {
    use reduxide_core::reducer::{self, Reducer};
    use reduxide_core::{Value, action};

    /// Integer counter starting at 0. Handles `INCREMENT` and `DECREMENT`.
    #[must_use]
    pub fn counter_reducer() -> impl Reducer {
        reducer::with_initial_state(0, |state, action| {
            let count = state.as_i64().unwrap_or(0);
            Ok(match action::kind(action).and_then(Value::as_str) {
                Some("INCREMENT") => Value::from(count + 1),
                Some("DECREMENT") => Value::from(count - 1),
                _ => state,
            })
        })
    }

    /// List of todo texts starting empty. `ADD_TODO` appends the action's `text`.
    #[must_use]
    pub fn todos_reducer() -> impl Reducer {
        reducer::with_initial_state(Value::list(Vec::<Value>::new()), |state, action| {
            Ok(match action::kind(action).and_then(Value::as_str) {
                Some("ADD_TODO") => {
                    let mut items = state.as_list().map(<[Value]>::to_vec).unwrap_or_default();
                    items.push(action.get("text").cloned().unwrap_or(Value::Null));
                    Value::from(items)
                },
                _ => state,
            })
        })
    }

    /// Returns its input unchanged, so it yields nothing on initialization.
    #[must_use]
    pub fn absent_on_init_reducer() -> impl Reducer {
        reducer::from_fn(|state, _action| Ok(state))
    }

    /// Initializes correctly but yields nothing for any other action when
    /// the state is absent.
    #[must_use]
    pub fn swallowing_reducer() -> impl Reducer {
        reducer::from_fn(|state: Option<Value>, action: &Value| {
            Ok(if action::is_init(action) {
                Some(state.unwrap_or(Value::from(0)))
            } else {
                state
            })
        })
    }
}

/// Property-based testing utilities
///
/// Strategies for [`Value`](reduxide_core::Value)s and actions.
pub mod properties {
    use proptest::prelude::*;
    use reduxide_core::{Value, action};

    /// Null, booleans, integers, finite floats and short strings.
    pub fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e9f64..1.0e9).prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ]
    }

    /// Scalars, lists and records nested up to three levels.
    pub fn arb_value() -> impl Strategy<Value = Value> {
        arb_scalar().prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::from),
            ]
        })
    }

    prop_compose! {
        /// An action whose kind no fixture handles, with an arbitrary payload.
        pub fn arb_unknown_action()(kind in "UNKNOWN_[A-Z]{1,8}", payload in arb_value()) -> Value {
            action::with_payload(kind, [("payload", payload)])
        }
    }
}
