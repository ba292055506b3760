//! Error types for stores, reducers and middleware.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the store, by reducer composition, or by user code
/// running inside a dispatch cycle.
///
/// The type is `Clone` so that a failure captured when a reducer map is
/// composed can be returned again, unchanged, from every later call.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// A keyed reducer returned nothing when probed with the initialization action.
    #[error(
        "Reducer \"{key}\" returned nothing during initialization. If the state passed to the \
         reducer is absent, you must explicitly return the initial state. The initial state may \
         not be absent; use Null if you don't want to set a value for this reducer."
    )]
    MissingInitialState {
        /// Key of the offending reducer.
        key: String,
    },

    /// A keyed reducer returned nothing for a random unknown action kind.
    #[error(
        "Reducer \"{key}\" returned nothing when probed with a random action type. Don't try to \
         handle reserved initialization actions or other actions in the \"@@reduxide/\" \
         namespace. They are considered private. Instead, you must return the current state for \
         any unknown actions, unless it is absent, in which case you must return the initial \
         state, regardless of the action type."
    )]
    UnknownActionNotHandled {
        /// Key of the offending reducer.
        key: String,
    },

    /// A keyed reducer returned nothing during a regular dispatch.
    #[error(
        "When called with an action of type {action_type}, the slice reducer for key \"{key}\" \
         returned nothing. To ignore an action, you must explicitly return the previous state. \
         If you want this reducer to hold no value, you can return Null instead."
    )]
    ReducerReturnedNothing {
        /// Key of the offending reducer.
        key: String,
        /// Rendered `type` of the action being reduced.
        action_type: String,
    },

    /// The store's root reducer returned nothing.
    #[error(
        "The root reducer returned nothing for an action of type {action_type}. A reducer must \
         always return a state."
    )]
    RootReducerReturnedNothing {
        /// Rendered `type` of the action being reduced.
        action_type: String,
    },

    /// The dispatched value is not a structural record.
    #[error(
        "Actions must be plain records. Instead, the actual type was: '{kind}'. You may need to \
         add middleware to your store setup to handle dispatching other values."
    )]
    ActionNotRecord {
        /// Kind of the rejected value.
        kind: String,
    },

    /// The dispatched record has no `type` field.
    #[error(
        "Actions may not have an undefined \"type\" field. You may have misspelled an action \
         type string constant."
    )]
    MissingActionType,

    /// `get_state` was called while a reducer was running.
    #[error(
        "You may not read the state while the reducer is executing. The reducer has already \
         received the state as an argument. Pass it down from the top reducer instead of reading \
         it from the store."
    )]
    ReadWhileDispatching,

    /// `subscribe` was called while a reducer was running.
    #[error(
        "You may not subscribe to store updates while the reducer is executing. If you would \
         like to be notified after the store has been updated, subscribe from a listener and \
         read the state there."
    )]
    SubscribeWhileDispatching,

    /// An unsubscribe was attempted while a reducer was running.
    #[error("You may not unsubscribe from store updates while the reducer is executing.")]
    UnsubscribeWhileDispatching,

    /// `dispatch` was called from inside a reducer.
    #[error("Reducers may not dispatch actions.")]
    DispatchWhileDispatching,

    /// A middleware dispatched while the middleware chain was being built.
    #[error(
        "Dispatching while constructing your middleware is not allowed. Other middleware would \
         not be applied to this dispatch."
    )]
    DispatchDuringMiddlewareSetup,

    /// A retained dispatch outlived the store it belongs to.
    #[error("The store behind this handle has been released.")]
    StoreReleased,

    /// An error raised by user code (a reducer, listener or middleware).
    #[error(transparent)]
    Custom(Arc<dyn StdError + Send + Sync>),
}

/// Broad classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A reducer (or a composition of reducers) violates its contract.
    Configuration,
    /// A malformed action was dispatched.
    Validation,
    /// An operation was attempted at a point of the dispatch cycle that forbids it.
    InvalidOperation,
    /// User code failed.
    External,
}

impl StoreError {
    /// Wrap an error raised by user code.
    pub fn custom<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(error))
    }

    /// Category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingInitialState { .. }
            | Self::UnknownActionNotHandled { .. }
            | Self::ReducerReturnedNothing { .. }
            | Self::RootReducerReturnedNothing { .. } => ErrorCategory::Configuration,
            Self::ActionNotRecord { .. } | Self::MissingActionType => ErrorCategory::Validation,
            Self::ReadWhileDispatching
            | Self::SubscribeWhileDispatching
            | Self::UnsubscribeWhileDispatching
            | Self::DispatchWhileDispatching
            | Self::DispatchDuringMiddlewareSetup
            | Self::StoreReleased => ErrorCategory::InvalidOperation,
            Self::Custom(_) => ErrorCategory::External,
        }
    }

    /// Whether this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.category(), ErrorCategory::Configuration)
    }

    /// Whether this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self.category(), ErrorCategory::Validation)
    }

    /// Whether this is an invalid-operation error.
    #[must_use]
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self.category(), ErrorCategory::InvalidOperation)
    }

    /// Borrow the user error carried by [`StoreError::Custom`] if it has type `E`.
    #[must_use]
    pub fn downcast_custom<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
