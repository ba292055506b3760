//! Observable view of a store's state.
//!
//! An observer receives the current state once when it subscribes, then
//! again after every dispatch. The view is built only from
//! [`Store::subscribe`] and [`Store::get_state`].

use crate::store::{Store, Subscription};
use reduxide_core::{StoreError, Value};
use std::rc::Rc;

/// Receives state values.
pub trait Observer {
    /// Called with the current state.
    fn next(&self, state: &Value);
}

impl<F> Observer for F
where
    F: Fn(&Value),
{
    fn next(&self, state: &Value) {
        self(state);
    }
}

/// Returned by [`Store::observable`].
#[derive(Clone)]
pub struct StateObservable {
    store: Store,
}

impl StateObservable {
    pub(crate) const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Deliver the current state to `observer` now and after every dispatch.
    ///
    /// The registered listener holds the store weakly, so an observer never
    /// keeps a store alive.
    ///
    /// # Errors
    ///
    /// [`StoreError::ReadWhileDispatching`] / [`StoreError::SubscribeWhileDispatching`]
    /// when called from a reducer.
    ///
    /// # Example
    ///
    /// ```
    /// use reduxide_core::{action, reducer, Value};
    /// use reduxide_runtime::create_store;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let store = create_store(reducer::with_initial_state(0, |s, _| Ok(s)), None, None).unwrap();
    /// let seen = Rc::new(RefCell::new(Vec::new()));
    ///
    /// let sink = Rc::clone(&seen);
    /// let subscription = store
    ///     .observable()
    ///     .subscribe(move |state: &Value| sink.borrow_mut().push(state.clone()))
    ///     .unwrap();
    /// store.dispatch(action::new("ANY")).unwrap();
    /// subscription.unsubscribe().unwrap();
    ///
    /// assert_eq!(seen.borrow().len(), 2);
    /// ```
    pub fn subscribe<O>(&self, observer: O) -> Result<Subscription, StoreError>
    where
        O: Observer + 'static,
    {
        let store = self.store.downgrade();
        let observer = Rc::new(observer);
        let observe_state = move || -> Result<(), StoreError> {
            if let Some(core) = store.upgrade() {
                observer.next(&core.get_state()?);
            }
            Ok(())
        };

        observe_state()?;
        self.store.subscribe(observe_state)
    }
}
