//! # Reduxide Runtime
//!
//! The store that owns a state value and runs the dispatch cycle, plus the
//! pieces built on top of it: subscriptions, the state observable,
//! enhancers and middleware.
//!
//! ## Core Components
//!
//! - **Store**: holds the current state, the active reducer and the
//!   listener registry; runs `dispatch -> reduce -> notify`
//! - **Subscription**: handle returned by [`Store::subscribe`]
//! - **Enhancer**: wraps store construction ([`StoreCreator`] to [`StoreCreator`])
//! - **Middleware**: wraps dispatch ([`middleware::apply_middleware`])
//!
//! ## Example
//!
//! ```
//! use reduxide_core::{action, reducer, Value};
//! use reduxide_runtime::create_store;
//!
//! let counter = reducer::with_initial_state(0, |state, action| {
//!     Ok(match action::kind(action).and_then(Value::as_str) {
//!         Some("INCREMENT") => Value::from(state.as_i64().unwrap_or(0) + 1),
//!         _ => state,
//!     })
//! });
//!
//! let store = create_store(counter, None, None).unwrap();
//! let _subscription = store.subscribe(|| Ok(())).unwrap();
//!
//! store.dispatch(action::new("INCREMENT")).unwrap();
//! assert_eq!(store.get_state().unwrap(), Value::from(1));
//! ```

pub mod metrics;
pub mod middleware;
pub mod observable;

pub use middleware::{Middleware, MiddlewareApi, apply_middleware};
pub use observable::{Observer, StateObservable};
pub use reduxide_core::{Dispatch, StoreError, Value};
pub use store::{
    Enhancer, Listener, Store, StoreBuilder, StoreCreator, Subscription, create_store,
    store_creator,
};

/// The store and its construction entry points
pub mod store {
    use crate::metrics::StoreMetrics;
    use crate::observable::StateObservable;
    use reduxide_core::compose::Unary;
    use reduxide_core::reducer::{BoxedReducer, Reducer};
    use reduxide_core::{Dispatch, StoreError, Value, action, dispatch_fn};
    use std::cell::{Cell, RefCell};
    use std::rc::{Rc, Weak};
    use std::time::Instant;

    /// A zero-argument callback run after every dispatch.
    pub type Listener = Rc<dyn Fn() -> Result<(), StoreError>>;

    /// Builds a store from a reducer and an optional preloaded state.
    pub type StoreCreator = Rc<dyn Fn(BoxedReducer, Option<Value>) -> Result<Store, StoreError>>;

    /// Wraps store construction. Enhancers compose with [`reduxide_core::compose`].
    pub type Enhancer = Unary<StoreCreator>;

    #[derive(Clone)]
    struct ListenerEntry {
        id: u64,
        listener: Listener,
    }

    type ListenerList = Rc<Vec<ListenerEntry>>;

    /// Mutable state shared by every handle of one store.
    pub(crate) struct StoreCore {
        state: RefCell<Option<Value>>,
        reducer: RefCell<BoxedReducer>,
        /// Snapshot being notified by the last dispatch.
        current_listeners: RefCell<ListenerList>,
        /// Registry that subscribe/unsubscribe mutate. Aliases
        /// `current_listeners` until the first mutation after a snapshot.
        next_listeners: RefCell<ListenerList>,
        is_dispatching: Cell<bool>,
        next_listener_id: Cell<u64>,
    }

    /// Resets `is_dispatching` on every exit from the reducer call,
    /// unwinding included.
    struct DispatchingGuard<'a>(&'a Cell<bool>);

    impl<'a> DispatchingGuard<'a> {
        fn enter(flag: &'a Cell<bool>) -> Self {
            flag.set(true);
            Self(flag)
        }
    }

    impl Drop for DispatchingGuard<'_> {
        fn drop(&mut self) {
            self.0.set(false);
        }
    }

    impl StoreCore {
        fn new(reducer: BoxedReducer, preloaded_state: Option<Value>) -> Self {
            let listeners: ListenerList = Rc::new(Vec::new());
            Self {
                state: RefCell::new(preloaded_state),
                reducer: RefCell::new(reducer),
                current_listeners: RefCell::new(Rc::clone(&listeners)),
                next_listeners: RefCell::new(listeners),
                is_dispatching: Cell::new(false),
                next_listener_id: Cell::new(0),
            }
        }

        pub(crate) fn get_state(&self) -> Result<Value, StoreError> {
            if self.is_dispatching.get() {
                return Err(StoreError::ReadWhileDispatching);
            }
            // Only absent before the initialization dispatch has succeeded.
            Ok(self.state.borrow().clone().unwrap_or(Value::Null))
        }

        fn ensure_can_mutate_next_listeners(&self) {
            let current = self.current_listeners.borrow();
            let mut next = self.next_listeners.borrow_mut();
            if Rc::ptr_eq(&current, &next) {
                *next = Rc::new((**current).clone());
            }
        }

        fn subscribe(self: &Rc<Self>, listener: Listener) -> Result<Subscription, StoreError> {
            if self.is_dispatching.get() {
                return Err(StoreError::SubscribeWhileDispatching);
            }

            let id = self.next_listener_id.get();
            self.next_listener_id.set(id + 1);

            self.ensure_can_mutate_next_listeners();
            Rc::make_mut(&mut self.next_listeners.borrow_mut()).push(ListenerEntry { id, listener });
            tracing::trace!(listener_id = id, "listener subscribed");

            Ok(Subscription {
                core: Rc::downgrade(self),
                id,
                active: Cell::new(true),
            })
        }

        fn unsubscribe(&self, id: u64) {
            self.ensure_can_mutate_next_listeners();
            Rc::make_mut(&mut self.next_listeners.borrow_mut()).retain(|entry| entry.id != id);
            tracing::trace!(listener_id = id, "listener unsubscribed");
        }

        fn dispatch(&self, action: Value) -> Result<Value, StoreError> {
            if let Err(error) = action::validate(&action) {
                StoreMetrics::record_rejection(&error);
                return Err(error);
            }
            if self.is_dispatching.get() {
                let error = StoreError::DispatchWhileDispatching;
                StoreMetrics::record_rejection(&error);
                return Err(error);
            }

            tracing::trace!(action_type = %action::describe_kind(&action), "dispatch started");

            let reducer = Rc::clone(&self.reducer.borrow());
            let previous = self.state.borrow().clone();
            let next = {
                let _guard = DispatchingGuard::enter(&self.is_dispatching);
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = Instant::now();
                let result = reducer.reduce(previous, &action);
                StoreMetrics::record_dispatch(start.elapsed());
                result?
            };
            let next = next.ok_or_else(|| StoreError::RootReducerReturnedNothing {
                action_type: action::describe_kind(&action),
            })?;
            *self.state.borrow_mut() = Some(next);

            let listeners = Rc::clone(&self.next_listeners.borrow());
            *self.current_listeners.borrow_mut() = Rc::clone(&listeners);
            for entry in listeners.iter() {
                (entry.listener)()?;
                StoreMetrics::record_listener();
            }

            tracing::trace!(listeners = listeners.len(), "dispatch finished");
            Ok(action)
        }
    }

    /// Handle to a store.
    ///
    /// Clones share the same state, reducer and listeners. A handle returned
    /// by an enhancer may carry a different exposed dispatch than the handle
    /// it was built from; everything else is shared.
    #[derive(Clone)]
    pub struct Store {
        core: Rc<StoreCore>,
        dispatch: Dispatch,
    }

    impl Store {
        /// Start building a store around `reducer`.
        ///
        /// # Example
        ///
        /// ```
        /// use reduxide_core::{reducer, Value};
        /// use reduxide_runtime::Store;
        ///
        /// let store = Store::builder(reducer::with_initial_state(0, |state, _| Ok(state)))
        ///     .preloaded_state(41)
        ///     .build()
        ///     .unwrap();
        /// assert_eq!(store.get_state().unwrap(), Value::from(41));
        /// ```
        pub fn builder<R: Reducer + 'static>(reducer: R) -> StoreBuilder {
            StoreBuilder::new(reducer)
        }

        /// The current state.
        ///
        /// # Errors
        ///
        /// [`StoreError::ReadWhileDispatching`] when called from a reducer.
        pub fn get_state(&self) -> Result<Value, StoreError> {
            self.core.get_state()
        }

        /// Dispatch an action through the exposed dispatch (middleware included).
        ///
        /// Without middleware this returns the action itself.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ActionNotRecord`] / [`StoreError::MissingActionType`]
        ///   for malformed actions.
        /// - [`StoreError::DispatchWhileDispatching`] when called from a reducer.
        /// - [`StoreError::RootReducerReturnedNothing`] when the reducer yields
        ///   no state; the state is left unchanged.
        /// - Any error raised by the reducer, a listener or a middleware,
        ///   unmodified. A listener error skips the remaining listeners.
        pub fn dispatch(&self, action: Value) -> Result<Value, StoreError> {
            (self.dispatch)(action)
        }

        /// Register `listener` to run after every dispatch.
        ///
        /// Listeners run in registration order, on a snapshot taken when the
        /// notification pass starts.
        ///
        /// # Errors
        ///
        /// [`StoreError::SubscribeWhileDispatching`] when called from a reducer.
        pub fn subscribe<F>(&self, listener: F) -> Result<Subscription, StoreError>
        where
            F: Fn() -> Result<(), StoreError> + 'static,
        {
            self.core.subscribe(Rc::new(listener))
        }

        /// Swap the active reducer and re-run initialization with it.
        ///
        /// # Errors
        ///
        /// - [`StoreError::DispatchWhileDispatching`] when called from a
        ///   reducer; the reducer is not swapped.
        /// - Any error of the initialization dispatch.
        pub fn replace_reducer<R: Reducer + 'static>(&self, next: R) -> Result<(), StoreError> {
            if self.core.is_dispatching.get() {
                return Err(StoreError::DispatchWhileDispatching);
            }
            *self.core.reducer.borrow_mut() = Rc::new(next);
            tracing::debug!("reducer replaced");
            self.core.dispatch(action::init()).map(|_| ())
        }

        /// Observable view of the state.
        #[must_use]
        pub fn observable(&self) -> StateObservable {
            StateObservable::new(self.clone())
        }

        /// The exposed dispatch function.
        #[must_use]
        pub fn dispatcher(&self) -> Dispatch {
            Rc::clone(&self.dispatch)
        }

        /// A handle sharing this store with `dispatch` as its exposed dispatch.
        #[must_use]
        pub fn with_dispatch(&self, dispatch: Dispatch) -> Self {
            Self {
                core: Rc::clone(&self.core),
                dispatch,
            }
        }

        /// Number of registered listeners.
        #[must_use]
        pub fn listener_count(&self) -> usize {
            self.core.next_listeners.borrow().len()
        }

        pub(crate) fn downgrade(&self) -> Weak<StoreCore> {
            Rc::downgrade(&self.core)
        }
    }

    /// Returned by [`Store::subscribe`].
    ///
    /// Dropping a subscription does not unsubscribe.
    pub struct Subscription {
        core: Weak<StoreCore>,
        id: u64,
        active: Cell<bool>,
    }

    impl Subscription {
        /// Remove the listener. Later calls are no-ops.
        ///
        /// A listener unsubscribed during a notification pass still runs in
        /// that pass.
        ///
        /// # Errors
        ///
        /// [`StoreError::UnsubscribeWhileDispatching`] when called from a reducer.
        pub fn unsubscribe(&self) -> Result<(), StoreError> {
            if !self.active.get() {
                return Ok(());
            }
            let Some(core) = self.core.upgrade() else {
                self.active.set(false);
                return Ok(());
            };
            if core.is_dispatching.get() {
                return Err(StoreError::UnsubscribeWhileDispatching);
            }
            self.active.set(false);
            core.unsubscribe(self.id);
            Ok(())
        }

        /// Whether the listener is still registered through this handle.
        #[must_use]
        pub fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    /// Fluent construction of a [`Store`].
    pub struct StoreBuilder {
        reducer: BoxedReducer,
        preloaded_state: Option<Value>,
        enhancer: Option<Enhancer>,
    }

    impl StoreBuilder {
        fn new<R: Reducer + 'static>(reducer: R) -> Self {
            Self {
                reducer: Rc::new(reducer),
                preloaded_state: None,
                enhancer: None,
            }
        }

        /// State handed to the reducer with the initialization action.
        #[must_use]
        pub fn preloaded_state(mut self, state: impl Into<Value>) -> Self {
            self.preloaded_state = Some(state.into());
            self
        }

        /// Enhancer wrapping construction.
        #[must_use]
        pub fn enhancer(mut self, enhancer: Enhancer) -> Self {
            self.enhancer = Some(enhancer);
            self
        }

        /// Create the store.
        ///
        /// # Errors
        ///
        /// Any error of the initialization dispatch or of the enhancer.
        pub fn build(self) -> Result<Store, StoreError> {
            match self.enhancer {
                Some(enhancer) => enhancer(store_creator())(self.reducer, self.preloaded_state),
                None => create_base_store(self.reducer, self.preloaded_state),
            }
        }
    }

    /// Create a store and run its initialization dispatch.
    ///
    /// With an enhancer, construction is delegated to
    /// `enhancer(store_creator())(reducer, preloaded_state)`.
    ///
    /// # Errors
    ///
    /// Any error of the initialization dispatch or of the enhancer.
    pub fn create_store<R: Reducer + 'static>(
        reducer: R,
        preloaded_state: Option<Value>,
        enhancer: Option<Enhancer>,
    ) -> Result<Store, StoreError> {
        let builder = StoreBuilder {
            reducer: Rc::new(reducer),
            preloaded_state,
            enhancer,
        };
        builder.build()
    }

    /// The plain store creator handed to enhancers.
    #[must_use]
    pub fn store_creator() -> StoreCreator {
        Rc::new(create_base_store)
    }

    fn create_base_store(
        reducer: BoxedReducer,
        preloaded_state: Option<Value>,
    ) -> Result<Store, StoreError> {
        let core = Rc::new(StoreCore::new(reducer, preloaded_state));
        let raw = Rc::clone(&core);
        let store = Store {
            dispatch: dispatch_fn(move |action| raw.dispatch(action)),
            core,
        };
        store.core.dispatch(action::init())?;
        tracing::debug!("store created");
        Ok(store)
    }

}
