//! Actions and the reserved action kinds.
//!
//! An action is a [`Value::Record`] with a defined `type` field. The store
//! reserves the `@@reduxide/` namespace for its own kinds; reducers must treat
//! those like any other unknown action.

use crate::error::StoreError;
use crate::value::{Fields, Value};
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Name of the field identifying an action's kind.
pub const TYPE_FIELD: &str = "type";

/// Prefix of every kind reserved by the store.
pub const RESERVED_PREFIX: &str = "@@reduxide/";

/// Kind of the action dispatched when a store is created or its reducer replaced.
pub const INIT: &str = "@@reduxide/INIT";

const PROBE_PREFIX: &str = "PROBE_UNKNOWN_ACTION_";
const PROBE_SUFFIX_LEN: usize = 16;

/// Build an action of the given kind with no payload.
///
/// ```
/// use reduxide_core::action;
///
/// let increment = action::new("INCREMENT");
/// assert_eq!(action::kind(&increment).and_then(|k| k.as_str()), Some("INCREMENT"));
/// ```
pub fn new(kind: impl Into<Value>) -> Value {
    Value::record([(TYPE_FIELD, kind.into())])
}

/// Build an action of the given kind carrying extra fields.
///
/// A `type` entry among `fields` is overridden by `kind`.
pub fn with_payload<I, K, V>(kind: impl Into<Value>, fields: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let mut payload: Fields = fields
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect();
    payload.insert(TYPE_FIELD.to_string(), kind.into());
    Value::from_fields(payload)
}

/// The reserved initialization action.
#[must_use]
pub fn init() -> Value {
    new(INIT)
}

/// A fresh action of a random kind outside the reserved namespace.
///
/// Used to check that reducers pass unknown actions through.
#[must_use]
pub fn probe_unknown() -> Value {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PROBE_SUFFIX_LEN)
        .map(char::from)
        .collect();
    new(format!("{PROBE_PREFIX}{suffix}"))
}

/// The `type` field of an action, if present.
#[must_use]
pub fn kind(action: &Value) -> Option<&Value> {
    action.get(TYPE_FIELD)
}

/// Whether `action` is the reserved initialization action.
#[must_use]
pub fn is_init(action: &Value) -> bool {
    kind(action).and_then(Value::as_str) == Some(INIT)
}

/// Whether a kind lies in the reserved namespace.
#[must_use]
pub fn is_reserved(kind: &Value) -> bool {
    kind.as_str().is_some_and(|kind| kind.starts_with(RESERVED_PREFIX))
}

/// Render an action's kind for messages.
#[must_use]
pub fn describe_kind(action: &Value) -> String {
    kind(action).map_or_else(|| "(missing)".to_string(), ToString::to_string)
}

/// Check that `action` can be dispatched.
///
/// # Errors
///
/// - [`StoreError::ActionNotRecord`] when `action` is a scalar, a list or an instance.
/// - [`StoreError::MissingActionType`] when the record has no `type` field.
///   A `type` holding `Null` counts as defined.
pub fn validate(action: &Value) -> Result<(), StoreError> {
    if !action.is_record() {
        return Err(StoreError::ActionNotRecord {
            kind: action.kind_of().to_string(),
        });
    }
    if kind(action).is_none() {
        return Err(StoreError::MissingActionType);
    }
    Ok(())
}
