//! Reducer composition utilities
//!
//! [`combine_reducers`] turns a map of keyed slice reducers into one reducer
//! over a record state, where each key of the record is owned by the reducer
//! registered under that key.
//!
//! Composition runs a sanity check once: every slice reducer must produce an
//! initial state for the reserved initialization action and must pass
//! through an action of a random unknown kind. A failure is captured and
//! returned from every later call of the composed reducer.
//!
//! # Examples
//!
//! ```
//! use reduxide_core::{action, combine_reducers, reducer, Reducer, ReducerMap, Value};
//!
//! let counter = reducer::with_initial_state(0, |state, action| {
//!     Ok(match action::kind(action).and_then(Value::as_str) {
//!         Some("INCREMENT") => Value::from(state.as_i64().unwrap_or(0) + 1),
//!         _ => state,
//!     })
//! });
//! let label = reducer::with_initial_state("idle", |state, _action| Ok(state));
//!
//! let root = combine_reducers(ReducerMap::new().with("counter", counter).with("label", label));
//!
//! let state = root.reduce(None, &action::init()).unwrap().unwrap();
//! assert_eq!(state.get("counter"), Some(&Value::from(0)));
//!
//! let state = root.reduce(Some(state), &action::new("INCREMENT")).unwrap().unwrap();
//! assert_eq!(state.get("counter"), Some(&Value::from(1)));
//! assert_eq!(state.get("label"), Some(&Value::from("idle")));
//! ```

use crate::action;
use crate::config::Mode;
use crate::error::StoreError;
use crate::reducer::{BoxedReducer, Reducer};
use crate::value::{Fields, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Insertion-ordered map from state key to slice reducer.
///
/// A key may be declared without a reducer (an empty slot); such keys are
/// dropped by [`combine_reducers`] with an advisory warning. Inserting an
/// existing key replaces its reducer and keeps its original position.
#[derive(Default, Clone)]
pub struct ReducerMap {
    entries: Vec<(String, Option<BoxedReducer>)>,
}

impl ReducerMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `reducer` under `key`.
    #[must_use]
    pub fn with<R: Reducer + 'static>(self, key: impl Into<String>, reducer: R) -> Self {
        self.with_slot(key, Some(Rc::new(reducer)))
    }

    /// Register an optional, already boxed reducer under `key`.
    #[must_use]
    pub fn with_slot(mut self, key: impl Into<String>, reducer: Option<BoxedReducer>) -> Self {
        self.insert(key, reducer);
        self
    }

    /// Register an optional reducer under `key`, in place.
    pub fn insert(&mut self, key: impl Into<String>, reducer: Option<BoxedReducer>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = reducer,
            None => self.entries.push((key, reducer)),
        }
    }

    /// Number of declared keys, including empty slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl<K, R> FromIterator<(K, R)> for ReducerMap
where
    K: Into<String>,
    R: Reducer + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |map, (key, reducer)| map.with(key, reducer))
    }
}

/// Combine keyed slice reducers into one reducer over a record state,
/// using [`Mode::detect`] to decide whether advisories run.
#[must_use]
pub fn combine_reducers(reducers: ReducerMap) -> CombinedReducer {
    combine_reducers_with_mode(reducers, Mode::detect())
}

/// Combine keyed slice reducers with an explicit advisory mode.
#[must_use]
pub fn combine_reducers_with_mode(reducers: ReducerMap, mode: Mode) -> CombinedReducer {
    let mut slices = Vec::with_capacity(reducers.entries.len());
    for (key, reducer) in reducers.entries {
        match reducer {
            Some(reducer) => slices.push((key, reducer)),
            None if mode.advisories_enabled() => {
                tracing::warn!(key = %key, "No reducer provided for key \"{key}\"");
            },
            None => {},
        }
    }

    let shape_error = assert_reducer_shape(&slices).err();
    if let Some(error) = &shape_error {
        tracing::debug!(%error, "reducer map failed its sanity check");
    }

    CombinedReducer {
        slices,
        shape_error,
        mode,
        unexpected_key_cache: RefCell::new(HashSet::new()),
    }
}

/// A reducer over a record state, delegating each key to its slice reducer.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer {
    slices: Vec<(String, BoxedReducer)>,
    shape_error: Option<StoreError>,
    mode: Mode,
    unexpected_key_cache: RefCell<HashSet<String>>,
}

impl CombinedReducer {
    /// Keys owned by this reducer, in evaluation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }

    /// The sanity-check failure captured at composition time, if any.
    #[must_use]
    pub const fn shape_error(&self) -> Option<&StoreError> {
        self.shape_error.as_ref()
    }

    fn warn_about_state_shape(&self, state: &Value, action: &Value) {
        let keys: Vec<&str> = self.keys().collect();
        let mut seen = self.unexpected_key_cache.borrow_mut();
        if let Some(message) = unexpected_state_shape_warning(state, &keys, action, &mut seen) {
            tracing::warn!("{message}");
        }
    }
}

impl Reducer for CombinedReducer {
    fn reduce(&self, state: Option<Value>, action: &Value) -> Result<Option<Value>, StoreError> {
        if let Some(error) = &self.shape_error {
            return Err(error.clone());
        }

        let state = state.unwrap_or_else(Value::empty_record);

        if self.mode.advisories_enabled() {
            self.warn_about_state_shape(&state, action);
        }

        let mut changed = false;
        let mut next_fields = Fields::new();
        for (key, reducer) in &self.slices {
            let previous = state.get(key).cloned();
            let next = reducer
                .reduce(previous.clone(), action)?
                .ok_or_else(|| StoreError::ReducerReturnedNothing {
                    key: key.clone(),
                    action_type: action::describe_kind(action),
                })?;
            changed = changed || !previous.is_some_and(|previous| previous.same(&next));
            next_fields.insert(key.clone(), next);
        }

        if changed {
            Ok(Some(Value::from_fields(next_fields)))
        } else {
            Ok(Some(state))
        }
    }
}

/// Probe each slice reducer with the initialization action and with a
/// random unknown action. Stops at the first failure.
fn assert_reducer_shape(slices: &[(String, BoxedReducer)]) -> Result<(), StoreError> {
    let init = action::init();
    let probe = action::probe_unknown();

    for (key, reducer) in slices {
        if reducer.reduce(None, &init)?.is_none() {
            return Err(StoreError::MissingInitialState { key: key.clone() });
        }
        if reducer.reduce(None, &probe)?.is_none() {
            return Err(StoreError::UnknownActionNotHandled { key: key.clone() });
        }
    }
    Ok(())
}

/// Advisory message about a state that does not match the reducer keys.
///
/// Returns `None` when there is nothing to report. Keys reported once are
/// recorded in `seen` and never reported again for the same cache.
pub fn unexpected_state_shape_warning(
    input_state: &Value,
    reducer_keys: &[&str],
    action: &Value,
    seen: &mut HashSet<String>,
) -> Option<String> {
    let argument_name = if action::is_init(action) {
        "preloaded state passed to create_store"
    } else {
        "previous state received by the reducer"
    };

    if reducer_keys.is_empty() {
        return Some(
            "Store does not have a valid reducer. Make sure the map passed to combine_reducers \
             holds at least one reducer."
                .to_string(),
        );
    }

    let Some(fields) = input_state.as_record() else {
        return Some(format!(
            "The {argument_name} has unexpected type of \"{}\". Expected argument to be a record \
             with the following keys: \"{}\"",
            input_state.kind_of(),
            reducer_keys.join("\", \""),
        ));
    };

    let unexpected: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|key| !reducer_keys.contains(key) && !seen.contains(*key))
        .collect();
    seen.extend(unexpected.iter().map(|key| (*key).to_string()));

    if unexpected.is_empty() {
        return None;
    }

    Some(format!(
        "Unexpected {} \"{}\" found in {argument_name}. Expected to find one of the known reducer \
         keys instead: \"{}\". Unexpected keys will be ignored.",
        if unexpected.len() > 1 { "keys" } else { "key" },
        unexpected.join("\", \""),
        reducer_keys.join("\", \""),
    ))
}
