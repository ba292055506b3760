//! Recorders for observing the order of side effects in a dispatch cycle.

use reduxide_core::reducer::{self, Reducer};
use reduxide_core::{Dispatch, StoreError, Value, action};
use reduxide_runtime::middleware::{self, Middleware, MiddlewareApi};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared, ordered log of labelled events.
///
/// Clones append to the same log.
#[derive(Clone, Default)]
pub struct ActionLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl ActionLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    /// A copy of every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// The action's kind as plain text: the string itself for string kinds,
/// the JSON rendering otherwise.
#[must_use]
pub fn kind_label(action: &Value) -> String {
    action::kind(action)
        .and_then(Value::as_str)
        .map_or_else(|| action::describe_kind(action), ToString::to_string)
}

/// Middleware that logs `"{label} -> {kind}"` before calling the rest of the
/// chain and `"{label} <- {kind}"` after it returns.
pub fn recording_middleware<L: Into<String>>(label: L, log: &ActionLog) -> impl Middleware + use<L> {
    let label = label.into();
    let log = log.clone();
    middleware::from_fn(move |_api: &MiddlewareApi, next: &Dispatch, action: Value| {
        let kind = kind_label(&action);
        log.push(format!("{label} -> {kind}"));
        let result = next(action)?;
        log.push(format!("{label} <- {kind}"));
        Ok(result)
    })
}

/// Reducer that logs `"{label} {kind}"` for every action and passes the
/// state through (`Null` when absent).
pub fn recording_reducer<L: Into<String>>(label: L, log: &ActionLog) -> impl Reducer + use<L> {
    let label = label.into();
    let log = log.clone();
    reducer::with_initial_state(Value::Null, move |state, action| {
        log.push(format!("{label} {}", kind_label(action)));
        Ok(state)
    })
}

/// Counts listener invocations.
#[derive(Clone, Default)]
pub struct ListenerProbe {
    calls: Rc<Cell<usize>>,
}

impl ListenerProbe {
    /// A probe with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that increments this probe.
    pub fn listener(&self) -> impl Fn() -> Result<(), StoreError> + use<> {
        let calls = Rc::clone(&self.calls);
        move || {
            calls.set(calls.get() + 1);
            Ok(())
        }
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}
