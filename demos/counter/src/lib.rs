//! # Counter Demo
//!
//! A counter and an action history combined into one store.
//!
//! This demo showcases:
//! - A hand-written [`Reducer`] implementation
//! - [`combine_reducers`] over two slices
//! - Bound action creators
//! - Middleware and listeners around the dispatch cycle
//!
//! ## Example
//!
//! ```
//! use counter::{create_counter_store, CounterAction};
//! use reduxide_core::Value;
//!
//! let store = create_counter_store(Vec::new()).unwrap();
//! store.dispatch(CounterAction::Increment.into()).unwrap();
//!
//! assert_eq!(store.get_state().unwrap().get("count"), Some(&Value::from(1)));
//! ```

use reduxide_core::dispatch::{ActionCreator, BoundActionCreator};
use reduxide_core::reducer::{self, Reducer};
use reduxide_core::{
    Dispatch, ReducerMap, StoreError, Value, action, bind_action_creators, combine_reducers,
};
use reduxide_runtime::middleware::{BoxedMiddleware, apply_middleware};
use reduxide_runtime::{Store, create_store};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Counter actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    /// Increment the counter by 1
    Increment,
    /// Decrement the counter by 1
    Decrement,
    /// Reset the counter to 0
    Reset,
}

impl CounterAction {
    /// The action's `type`.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Increment => "counter/increment",
            Self::Decrement => "counter/decrement",
            Self::Reset => "counter/reset",
        }
    }

    /// Parse an action record.
    #[must_use]
    pub fn from_action(action: &Value) -> Option<Self> {
        match action::kind(action).and_then(Value::as_str)? {
            "counter/increment" => Some(Self::Increment),
            "counter/decrement" => Some(Self::Decrement),
            "counter/reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

impl From<CounterAction> for Value {
    fn from(action: CounterAction) -> Self {
        action::new(action.kind())
    }
}

/// Counter reducer
///
/// The state is an integer, starting at 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterReducer;

impl Reducer for CounterReducer {
    fn reduce(&self, state: Option<Value>, action: &Value) -> Result<Option<Value>, StoreError> {
        let state = state.unwrap_or(Value::from(0));
        let count = state.as_i64().unwrap_or(0);
        Ok(Some(match CounterAction::from_action(action) {
            Some(CounterAction::Increment) => Value::from(count + 1),
            Some(CounterAction::Decrement) => Value::from(count - 1),
            Some(CounterAction::Reset) => Value::from(0),
            None => state,
        }))
    }
}

/// Records the kind of every counter action, newest last.
pub fn history_reducer() -> impl Reducer {
    reducer::with_initial_state(Value::list(Vec::<Value>::new()), |state, action| {
        let Some(counter_action) = CounterAction::from_action(action) else {
            return Ok(state);
        };
        let mut entries = state.as_list().map(<[Value]>::to_vec).unwrap_or_default();
        entries.push(Value::from(counter_action.kind()));
        Ok(Value::from(entries))
    })
}

/// Root reducer: `{ count, history }`.
pub fn app_reducer() -> impl Reducer {
    combine_reducers(
        ReducerMap::new()
            .with("count", CounterReducer)
            .with("history", history_reducer()),
    )
}

/// Create the demo store with `middlewares` applied.
///
/// # Errors
///
/// Any error of the initialization dispatch.
pub fn create_counter_store(middlewares: Vec<BoxedMiddleware>) -> Result<Store, StoreError> {
    create_store(app_reducer(), None, Some(apply_middleware(middlewares)))
}

/// `increment`, `decrement` and `reset`, bound to `dispatch`.
#[must_use]
pub fn bound_actions(dispatch: &Dispatch) -> BTreeMap<String, BoundActionCreator> {
    let creators: BTreeMap<String, ActionCreator> = [
        CounterAction::Increment,
        CounterAction::Decrement,
        CounterAction::Reset,
    ]
    .into_iter()
    .map(|counter_action| {
        let name = counter_action.kind().trim_start_matches("counter/").to_string();
        let creator: ActionCreator = Rc::new(move |_args| Value::from(counter_action));
        (name, creator)
    })
    .collect();
    bind_action_creators(creators, dispatch)
}
