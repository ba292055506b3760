//! # Reduxide Core
//!
//! Values, actions, reducers and reducer composition for a single-threaded,
//! predictable state container.
//!
//! This crate holds everything that does not need a live store:
//!
//! - **Value**: the dynamic, structurally shared state and action model
//! - **Action**: records with a `type` field, plus the reserved kinds
//! - **Reducer**: pure `(Option<Value>, &Value) -> Option<Value>` transitions
//! - **Composition**: [`combine_reducers`] over keyed slice reducers
//! - **Compose / Dispatch**: function composition and bound action creators
//!
//! The store itself lives in `reduxide-runtime`.
//!
//! ## Example
//!
//! ```
//! use reduxide_core::{action, combine_reducers, reducer, Reducer, ReducerMap, Value};
//!
//! let todos = reducer::with_initial_state(Value::list(Vec::<Value>::new()), |state, action| {
//!     Ok(match action::kind(action).and_then(Value::as_str) {
//!         Some("ADD_TODO") => {
//!             let mut items = state.as_list().map(<[Value]>::to_vec).unwrap_or_default();
//!             items.push(action.get("text").cloned().unwrap_or(Value::Null));
//!             Value::list(items)
//!         },
//!         _ => state,
//!     })
//! });
//!
//! let root = combine_reducers(ReducerMap::new().with("todos", todos));
//! let state = root.reduce(None, &action::init()).unwrap();
//! let state = root
//!     .reduce(state, &action::with_payload("ADD_TODO", [("text", "milk")]))
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(state.to_string(), r#"{"todos":["milk"]}"#);
//! ```

pub use serde::{Deserialize, Serialize};

pub mod action;
pub mod compose;
pub mod composition;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod reducer;
pub mod value;

pub use compose::{Unary, compose};
pub use composition::{
    CombinedReducer, ReducerMap, combine_reducers, combine_reducers_with_mode,
    unexpected_state_shape_warning,
};
pub use config::Mode;
pub use dispatch::{
    ActionCreator, BoundActionCreator, Dispatch, bind_action_creator, bind_action_creators,
    dispatch_fn,
};
pub use error::{ErrorCategory, StoreError};
pub use reducer::{BoxedReducer, FnReducer, Reducer};
pub use value::{Fields, Instance, Value};
