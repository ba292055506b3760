//! Integration tests for the dispatching guard
//!
//! A reducer may not touch the store it runs in. Every such attempt must
//! surface as an invalid-operation error, never as a borrow panic, and the
//! guard must be released on every exit path.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use reduxide_core::{ErrorCategory, StoreError, Value, action, reducer};
use reduxide_runtime::{Store, Subscription, create_store};
use reduxide_testing::assertions::assert_category;
use std::cell::RefCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

// ============================================================================
// Test Fixtures
// ============================================================================

type StoreSlot = Rc<RefCell<Option<Store>>>;

/// A counter store whose reducer runs `op` against the store itself when it
/// sees a `REENTER` action, and panics on `PANIC`.
fn reentrant_store<F>(op: F) -> (Store, StoreSlot)
where
    F: Fn(&Store) -> Result<(), StoreError> + 'static,
{
    let slot: StoreSlot = Rc::default();
    let inner = Rc::clone(&slot);
    let root = reducer::with_initial_state(0, move |state, action| {
        match action::kind(action).and_then(Value::as_str) {
            Some("REENTER") => {
                let store = inner.borrow().clone().expect("store installed");
                op(&store)?;
                Ok(state)
            },
            Some("PANIC") => panic!("reducer blew up"),
            Some("INCREMENT") => Ok(Value::from(state.as_i64().unwrap_or(0) + 1)),
            _ => Ok(state),
        }
    });

    let store = create_store(root, None, None).unwrap();
    *slot.borrow_mut() = Some(store.clone());
    (store, slot)
}

/// Break the store -> reducer -> slot -> store cycle.
fn release(slot: &StoreSlot) {
    slot.borrow_mut().take();
}

fn assert_guard_released(store: &Store) {
    store.dispatch(action::new("INCREMENT")).unwrap();
    assert!(store.get_state().is_ok());
    store.subscribe(|| Ok(())).unwrap().unsubscribe().unwrap();
}

// ============================================================================
// Forbidden operations
// ============================================================================

#[test]
fn test_reducer_may_not_dispatch() {
    let (store, slot) = reentrant_store(|store| store.dispatch(action::new("NESTED")).map(|_| ()));

    let result = store.dispatch(action::new("REENTER"));

    assert!(matches!(result, Err(StoreError::DispatchWhileDispatching)));
    assert_guard_released(&store);
    release(&slot);
}

#[test]
fn test_reducer_may_not_read_state() {
    let (store, slot) = reentrant_store(|store| store.get_state().map(|_| ()));

    let result = store.dispatch(action::new("REENTER"));

    assert!(matches!(result, Err(StoreError::ReadWhileDispatching)));
    assert_guard_released(&store);
    release(&slot);
}

#[test]
fn test_reducer_may_not_subscribe() {
    let (store, slot) = reentrant_store(|store| store.subscribe(|| Ok(())).map(|_| ()));

    let result = store.dispatch(action::new("REENTER"));

    assert!(matches!(result, Err(StoreError::SubscribeWhileDispatching)));
    assert_eq!(store.listener_count(), 0);
    release(&slot);
}

#[test]
fn test_reducer_may_not_unsubscribe() {
    let held: Rc<RefCell<Option<Subscription>>> = Rc::default();
    let inner = Rc::clone(&held);
    let (store, slot) = reentrant_store(move |_store| {
        inner.borrow().as_ref().map_or(Ok(()), Subscription::unsubscribe)
    });
    *held.borrow_mut() = Some(store.subscribe(|| Ok(())).unwrap());

    let result = store.dispatch(action::new("REENTER"));

    assert!(matches!(result, Err(StoreError::UnsubscribeWhileDispatching)));
    let subscription = held.borrow_mut().take().unwrap();
    assert!(subscription.is_active());
    assert_eq!(store.listener_count(), 1);

    subscription.unsubscribe().unwrap();
    assert_eq!(store.listener_count(), 0);
    release(&slot);
}

#[test]
fn test_reducer_may_not_replace_itself() {
    let (store, slot) =
        reentrant_store(|store| store.replace_reducer(reducer::from_fn(|_state, _action| Ok(None))));

    let result = store.dispatch(action::new("REENTER"));

    assert_category(&result, ErrorCategory::InvalidOperation);
    // The original reducer is still active.
    store.dispatch(action::new("INCREMENT")).unwrap();
    assert_eq!(store.get_state().unwrap(), Value::from(1));
    release(&slot);
}

// ============================================================================
// Guard release
// ============================================================================

#[test]
fn test_guard_released_after_reducer_panic() {
    let (store, slot) = reentrant_store(|_store| Ok(()));

    let outcome = catch_unwind(AssertUnwindSafe(|| store.dispatch(action::new("PANIC"))));

    assert!(outcome.is_err());
    assert_eq!(store.get_state().unwrap(), Value::from(0));
    assert_guard_released(&store);
    release(&slot);
}

#[test]
fn test_listener_may_dispatch() {
    let store = create_store(reduxide_testing::fixtures::counter_reducer(), None, None).unwrap();
    let handle = store.clone();
    let _subscription = store
        .subscribe(move || {
            if handle.get_state()?.as_i64() == Some(1) {
                handle.dispatch(action::new("INCREMENT"))?;
            }
            Ok(())
        })
        .unwrap();

    store.dispatch(action::new("INCREMENT")).unwrap();

    assert_eq!(store.get_state().unwrap(), Value::from(2));
}
