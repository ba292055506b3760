//! Dispatch middleware.
//!
//! A middleware receives a [`MiddlewareApi`] once and returns a transform
//! from the next dispatch in the chain to a new dispatch.
//! [`apply_middleware`] turns an ordered list of middleware into an
//! [`Enhancer`]: the first middleware is the outermost wrapper, the store's
//! own dispatch is the innermost.
//!
//! # Example
//!
//! ```
//! use reduxide_core::{action, reducer, Value};
//! use reduxide_runtime::middleware::{self, apply_middleware};
//! use reduxide_runtime::create_store;
//!
//! let stamp = middleware::from_fn(|_api, next, action: Value| next(action.with("stamped", true)));
//!
//! let store = create_store(
//!     reducer::with_initial_state(Value::Null, |_state, action| Ok(action.clone())),
//!     None,
//!     Some(apply_middleware(vec![middleware::boxed(stamp)])),
//! )
//! .unwrap();
//!
//! store.dispatch(action::new("PING")).unwrap();
//! assert_eq!(store.get_state().unwrap().get("stamped"), Some(&Value::from(true)));
//! ```

use crate::store::{Enhancer, Store, StoreCreator};
use reduxide_core::compose::{Unary, compose};
use reduxide_core::reducer::BoxedReducer;
use reduxide_core::{Dispatch, StoreError, Value, action, dispatch_fn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// What a middleware sees of the store.
#[derive(Clone)]
pub struct MiddlewareApi {
    store: Store,
    binding: Weak<RefCell<Dispatch>>,
}

impl MiddlewareApi {
    /// The store's current state.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReadWhileDispatching`] when called from a reducer.
    pub fn get_state(&self) -> Result<Value, StoreError> {
        self.store.get_state()
    }

    /// Dispatch through the whole middleware chain, as bound at call time.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DispatchDuringMiddlewareSetup`] while the chain is
    ///   still being built.
    /// - [`StoreError::StoreReleased`] once every store handle using the
    ///   chain has been dropped.
    /// - Anything the chain returns.
    pub fn dispatch(&self, action: Value) -> Result<Value, StoreError> {
        let binding = self.binding.upgrade().ok_or(StoreError::StoreReleased)?;
        let dispatch = Rc::clone(&binding.borrow());
        dispatch(action)
    }
}

/// Wraps dispatch.
pub trait Middleware {
    /// Return the transform from the next dispatch to the wrapped one.
    fn attach(&self, api: MiddlewareApi) -> Unary<Dispatch>;
}

impl<F> Middleware for F
where
    F: Fn(MiddlewareApi) -> Unary<Dispatch>,
{
    fn attach(&self, api: MiddlewareApi) -> Unary<Dispatch> {
        self(api)
    }
}

/// Shared, type-erased middleware.
pub type BoxedMiddleware = Rc<dyn Middleware>;

/// Erase a middleware's type.
pub fn boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Rc::new(middleware)
}

/// Middleware from a flat `(api, next, action)` function. Created by [`from_fn`].
pub struct FnMiddleware<F> {
    f: Rc<F>,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&MiddlewareApi, &Dispatch, Value) -> Result<Value, StoreError> + 'static,
{
    fn attach(&self, api: MiddlewareApi) -> Unary<Dispatch> {
        let f = Rc::clone(&self.f);
        Rc::new(move |next: Dispatch| {
            let f = Rc::clone(&f);
            let api = api.clone();
            dispatch_fn(move |action| f(&api, &next, action))
        })
    }
}

/// Adapt a flat `(api, next, action)` function.
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: Fn(&MiddlewareApi, &Dispatch, Value) -> Result<Value, StoreError> + 'static,
{
    FnMiddleware { f: Rc::new(f) }
}

/// Logs each action's kind at `debug` on the way in and the resulting state
/// at `trace` on the way out.
pub fn logging() -> impl Middleware {
    from_fn(|api: &MiddlewareApi, next: &Dispatch, action: Value| {
        tracing::debug!(action_type = %action::describe_kind(&action), "action dispatched");
        let result = next(action)?;
        if let Ok(state) = api.get_state() {
            tracing::trace!(%state, "state after dispatch");
        }
        Ok(result)
    })
}

/// Build an enhancer that routes dispatch through `middlewares`.
///
/// The first middleware is the outermost. Dispatching through the
/// [`MiddlewareApi`] from inside a transform's setup fails with
/// [`StoreError::DispatchDuringMiddlewareSetup`].
#[must_use]
pub fn apply_middleware(middlewares: Vec<BoxedMiddleware>) -> Enhancer {
    let middlewares = Rc::new(middlewares);
    Rc::new(move |create: StoreCreator| -> StoreCreator {
        let middlewares = Rc::clone(&middlewares);
        Rc::new(move |reducer: BoxedReducer, preloaded_state: Option<Value>| {
            let store = create(reducer, preloaded_state)?;

            let binding: Rc<RefCell<Dispatch>> = Rc::new(RefCell::new(dispatch_fn(|_action| {
                Err(StoreError::DispatchDuringMiddlewareSetup)
            })));
            let api = MiddlewareApi {
                store: store.clone(),
                binding: Rc::downgrade(&binding),
            };

            let chain: Vec<Unary<Dispatch>> = middlewares
                .iter()
                .map(|middleware| middleware.attach(api.clone()))
                .collect();
            *binding.borrow_mut() = compose(chain)(store.dispatcher());
            tracing::debug!(middlewares = middlewares.len(), "middleware applied");

            Ok(store.with_dispatch(dispatch_fn(move |action| {
                let dispatch = Rc::clone(&binding.borrow());
                dispatch(action)
            })))
        })
    })
}
