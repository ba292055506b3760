//! The reducer trait and closure adapters.
//!
//! A reducer is a pure function `(Option<Value>, &Value) -> Option<Value>`.
//! `None` on input means "not yet initialized"; `None` on output is a contract
//! violation that the store and [`combine_reducers`](crate::combine_reducers)
//! turn into configuration errors.

use crate::error::StoreError;
use crate::value::Value;
use std::rc::Rc;

/// Pure transition function from the previous state and an action to the next state.
///
/// # Example
///
/// ```
/// use reduxide_core::{action, reducer, Reducer, Value};
///
/// let counter = reducer::with_initial_state(0, |state, action| {
///     Ok(match action::kind(action).and_then(Value::as_str) {
///         Some("INCREMENT") => Value::from(state.as_i64().unwrap_or(0) + 1),
///         _ => state,
///     })
/// });
///
/// let state = counter.reduce(None, &action::init()).unwrap();
/// assert_eq!(state, Some(Value::from(0)));
/// let state = counter.reduce(state, &action::new("INCREMENT")).unwrap();
/// assert_eq!(state, Some(Value::from(1)));
/// ```
pub trait Reducer {
    /// Compute the next state.
    ///
    /// Must return `Some` for every action, including unknown kinds and the
    /// reserved initialization action. Returning the `state` argument
    /// unchanged signals "nothing changed".
    ///
    /// # Errors
    ///
    /// Any error is propagated unmodified to the caller of `dispatch`.
    fn reduce(&self, state: Option<Value>, action: &Value) -> Result<Option<Value>, StoreError>;
}

/// Shared, type-erased reducer as held by a store.
pub type BoxedReducer = Rc<dyn Reducer>;

impl<R: Reducer + ?Sized> Reducer for Rc<R> {
    fn reduce(&self, state: Option<Value>, action: &Value) -> Result<Option<Value>, StoreError> {
        (**self).reduce(state, action)
    }
}

/// A reducer backed by a closure. Created by [`from_fn`].
pub struct FnReducer<F> {
    f: F,
}

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Option<Value>, &Value) -> Result<Option<Value>, StoreError>,
{
    fn reduce(&self, state: Option<Value>, action: &Value) -> Result<Option<Value>, StoreError> {
        (self.f)(state, action)
    }
}

/// Adapt a closure with the full reducer signature.
pub const fn from_fn<F>(f: F) -> FnReducer<F>
where
    F: Fn(Option<Value>, &Value) -> Result<Option<Value>, StoreError>,
{
    FnReducer { f }
}

/// Adapt a closure that receives a state defaulted to `initial` and always
/// returns a state.
///
/// The returned reducer can never yield `None`.
pub fn with_initial_state<F>(
    initial: impl Into<Value>,
    f: F,
) -> FnReducer<impl Fn(Option<Value>, &Value) -> Result<Option<Value>, StoreError>>
where
    F: Fn(Value, &Value) -> Result<Value, StoreError>,
{
    let initial = initial.into();
    from_fn(move |state: Option<Value>, action: &Value| {
        let state = state.unwrap_or_else(|| initial.clone());
        f(state, action).map(Some)
    })
}

/// Erase a reducer's type.
pub fn boxed<R: Reducer + 'static>(reducer: R) -> BoxedReducer {
    Rc::new(reducer)
}
