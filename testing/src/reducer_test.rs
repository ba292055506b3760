//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use reduxide_core::{Reducer, StoreError, Value};

/// Type alias for state assertion functions
type StateAssertion = Box<dyn FnOnce(&Value)>;

/// Type alias for error assertion functions
type ErrorAssertion = Box<dyn FnOnce(&StoreError)>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```
/// use reduxide_core::{action, Value};
/// use reduxide_testing::{fixtures, ReducerTest};
///
/// ReducerTest::new(fixtures::counter_reducer())
///     .given_state(Value::from(0))
///     .when_action(action::new("INCREMENT"))
///     .then_state(|state| {
///         assert_eq!(state, &Value::from(1));
///     })
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    initial_state: Option<Option<Value>>,
    action: Option<Value>,
    state_assertions: Vec<StateAssertion>,
    error_assertions: Vec<ErrorAssertion>,
}

impl<R: Reducer> ReducerTest<R> {
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            error_assertions: Vec::new(),
        }
    }

    /// Set the previous state (Given)
    #[must_use]
    pub fn given_state(mut self, state: impl Into<Value>) -> Self {
        self.initial_state = Some(Some(state.into()));
        self
    }

    /// Start from an uninitialized state (Given)
    #[must_use]
    pub fn given_no_state(mut self) -> Self {
        self.initial_state = Some(None);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: Value) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Value) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting error (Then)
    #[must_use]
    pub fn then_error<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&StoreError) + 'static,
    {
        self.error_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if the given state or the action is not set, if the reducer
    /// returns nothing, if the outcome (state or error) is not the one the
    /// assertions expect, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let state = self
            .initial_state
            .expect("State must be set with given_state() or given_no_state()");

        let action = self.action.expect("Action must be set with when_action()");

        match self.reducer.reduce(state, &action) {
            Ok(Some(next)) => {
                assert!(
                    self.error_assertions.is_empty(),
                    "Expected an error, but the reducer returned state {next}"
                );
                for assertion in self.state_assertions {
                    assertion(&next);
                }
            },
            Ok(None) => panic!("Reducer returned nothing for action {action}"),
            Err(error) => {
                assert!(
                    self.state_assertions.is_empty(),
                    "Expected a state, but the reducer failed: {error}"
                );
                for assertion in self.error_assertions {
                    assertion(&error);
                }
            },
        }
    }
}

/// Helper assertions for states and errors
pub mod assertions {
    use reduxide_core::{ErrorCategory, StoreError, Value};

    /// Assert that two values are the same allocation (or equal scalars)
    ///
    /// # Panics
    ///
    /// Panics if the values are not identical.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_same(actual: &Value, expected: &Value) {
        assert!(
            actual.same(expected),
            "Expected the same value, but found a different one: {actual} vs {expected}"
        );
    }

    /// Assert that two values are not the same allocation
    ///
    /// # Panics
    ///
    /// Panics if the values are identical.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_not_same(actual: &Value, expected: &Value) {
        assert!(
            !actual.same(expected),
            "Expected a new value, but found the same one: {actual}"
        );
    }

    /// Assert that a value deep-equals a JSON literal
    ///
    /// # Panics
    ///
    /// Panics if the contents differ.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_json(actual: &Value, expected: serde_json::Value) {
        let expected = Value::from(expected);
        assert_eq!(actual, &expected, "Expected {expected}, but found {actual}");
    }

    /// Assert that a result failed with an error of the given category
    ///
    /// # Panics
    ///
    /// Panics if the result is `Ok` or the category differs.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_category<T: std::fmt::Debug>(
        result: &Result<T, StoreError>,
        expected: ErrorCategory,
    ) {
        match result {
            Ok(value) => panic!("Expected a {expected:?} error, but got Ok({value:?})"),
            Err(error) => assert_eq!(
                error.category(),
                expected,
                "Expected a {expected:?} error, but got: {error}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{absent_on_init_reducer, counter_reducer};
    use reduxide_core::{ErrorCategory, action};

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(counter_reducer())
            .given_state(0)
            .when_action(action::new("INCREMENT"))
            .then_state(|state| {
                assert_eq!(state, &Value::from(1));
            })
            .run();
    }

    #[test]
    fn test_reducer_test_initial_state() {
        ReducerTest::new(counter_reducer())
            .given_no_state()
            .when_action(action::init())
            .then_state(|state| {
                assertions::assert_json(state, serde_json::json!(0));
            })
            .run();
    }

    #[test]
    fn test_reducer_test_error() {
        let failing = reduxide_core::reducer::from_fn(|_state, _action| {
            Err(StoreError::MissingActionType)
        });

        ReducerTest::new(failing)
            .given_no_state()
            .when_action(action::new("ANY"))
            .then_error(|error| {
                assert_eq!(error.category(), ErrorCategory::Validation);
            })
            .run();
    }

    #[test]
    #[should_panic(expected = "Reducer returned nothing")]
    fn test_reducer_test_reports_missing_state() {
        ReducerTest::new(absent_on_init_reducer())
            .given_no_state()
            .when_action(action::init())
            .run();
    }

    #[test]
    fn test_assertions_same() {
        let value = Value::record([("a", 1)]);
        assertions::assert_same(&value, &value.clone());
        assertions::assert_not_same(&value, &Value::record([("a", 1)]));
    }

    #[test]
    fn test_assertions_category() {
        let result: Result<(), StoreError> = Err(StoreError::DispatchWhileDispatching);
        assertions::assert_category(&result, ErrorCategory::InvalidOperation);
    }
}
