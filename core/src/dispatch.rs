//! Dispatch functions and bound action creators.

use crate::error::StoreError;
use crate::value::Value;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A shared dispatch function.
///
/// The store's dispatch returns the action it was given. Middleware may
/// return any value.
pub type Dispatch = Rc<dyn Fn(Value) -> Result<Value, StoreError>>;

/// A function from arguments to an action.
pub type ActionCreator = Rc<dyn Fn(Vec<Value>) -> Value>;

/// A function that creates an action from its arguments and dispatches it.
pub type BoundActionCreator = Rc<dyn Fn(Vec<Value>) -> Result<Value, StoreError>>;

/// Wrap a closure as a [`Dispatch`].
pub fn dispatch_fn<F>(f: F) -> Dispatch
where
    F: Fn(Value) -> Result<Value, StoreError> + 'static,
{
    Rc::new(f)
}

/// Bind `creator` to `dispatch`: calling the result dispatches the action
/// built from its arguments and returns what dispatch returns.
pub fn bind_action_creator(creator: ActionCreator, dispatch: Dispatch) -> BoundActionCreator {
    Rc::new(move |args| dispatch(creator(args)))
}

/// Bind every creator of a named map to `dispatch`. Names are kept.
#[must_use]
pub fn bind_action_creators(
    creators: BTreeMap<String, ActionCreator>,
    dispatch: &Dispatch,
) -> BTreeMap<String, BoundActionCreator> {
    creators
        .into_iter()
        .map(|(name, creator)| (name, bind_action_creator(creator, Rc::clone(dispatch))))
        .collect()
}
