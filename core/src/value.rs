//! Dynamic value model shared by state and actions.
//!
//! State and actions are both [`Value`]s. Containers (`Str`, `List`, `Record`,
//! `Instance`) are reference counted, which makes *identity* observable:
//! cloning a value shares its allocation, rebuilding it does not.
//! [`Value::same`] is the identity comparison used by reducer composition;
//! `PartialEq` is a deep comparison meant for assertions.
//!
//! Values are `Send + Sync` (`Arc` containers, `Send + Sync` instances) even
//! though a store is confined to one thread, so a state snapshot taken from
//! the store can be handed to another thread for rendering or persistence.
//!
//! # Example
//!
//! ```
//! use reduxide_core::Value;
//! use serde_json::json;
//!
//! let state = Value::from(json!({ "count": 1 }));
//! let alias = state.clone();
//! let rebuilt = Value::from(json!({ "count": 1 }));
//!
//! assert!(state.same(&alias));
//! assert!(!state.same(&rebuilt));
//! assert_eq!(state, rebuilt);
//! ```

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// String-keyed fields of a record value.
pub type Fields = BTreeMap<String, Value>;

/// A dynamically typed, immutable-by-convention value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Explicit "no value". Distinct from an absent state.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Integer scalar.
    Int(i64),
    /// Floating point scalar.
    Float(f64),
    /// String scalar.
    Str(Arc<str>),
    /// Ordered sequence.
    List(Arc<Vec<Value>>),
    /// Structural record with string keys.
    Record(Arc<Fields>),
    /// Opaque host object. Never a structural record.
    Instance(Instance),
}

/// An opaque host object carried inside a [`Value`].
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    /// Wrap a host object.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Rust type name of the wrapped object.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the wrapped object if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).downcast_ref::<T>()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.type_name)
    }
}

impl Value {
    /// Build a record from key/value pairs.
    pub fn record<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Record(Arc::new(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// A record with no fields.
    #[must_use]
    pub fn empty_record() -> Self {
        Self::Record(Arc::new(Fields::new()))
    }

    /// Wrap already-built fields in a fresh record allocation.
    #[must_use]
    pub fn from_fields(fields: Fields) -> Self {
        Self::Record(Arc::new(fields))
    }

    /// Build a list from items.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::List(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    /// Wrap a host object as an [`Instance`] value.
    #[must_use]
    pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
        Self::Instance(Instance::new(value))
    }

    /// Whether this value is a structural record.
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Fields of a record, `None` for every other variant.
    #[must_use]
    pub fn as_record(&self) -> Option<&Fields> {
        match self {
            Self::Record(fields) => Some(fields.as_ref()),
            _ => None,
        }
    }

    /// Field `key` of a record. Non-records have no fields.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_record().and_then(|fields| fields.get(key))
    }

    /// Integer payload.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric payload, widening integers.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// List items.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Copy of this record with `key` set to `value`.
    ///
    /// The copy is a new allocation, so it is never [`same`](Self::same) as
    /// `self`. A non-record receiver starts from an empty record.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Self>) -> Self {
        let mut fields = self.as_record().cloned().unwrap_or_default();
        fields.insert(key.into(), value.into());
        Self::from_fields(fields)
    }

    /// Short name of the runtime kind, used in error and warning messages.
    #[must_use]
    pub const fn kind_of(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) | Self::Float(_) => "number",
            Self::Str(_) => "string",
            Self::List(_) => "array",
            Self::Record(_) => "object",
            Self::Instance(instance) => instance.type_name,
        }
    }

    /// Identity comparison.
    ///
    /// Scalars compare by value; containers compare by allocation. Two
    /// records with equal contents built separately are not the same.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => Arc::ptr_eq(a, b),
            (Self::Record(a), Self::Record(b)) => Arc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Str(value) => serializer.serialize_str(value),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
            Self::Instance(instance) => {
                serializer.serialize_str(&format!("[instance {}]", instance.type_name))
            },
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(value) => Self::Bool(value),
            Json::Number(number) => number
                .as_i64()
                .map_or_else(|| Self::Float(number.as_f64().unwrap_or(f64::NAN)), Self::Int),
            Json::String(value) => Self::Str(value.into()),
            Json::Array(items) => Self::List(Arc::new(items.into_iter().map(Self::from).collect())),
            Json::Object(map) => Self::Record(Arc::new(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            )),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(Arc::new(items))
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        Self::from_fields(fields)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
