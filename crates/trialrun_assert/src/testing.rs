//! Equality and truth checks.
//!
//! Checks return `Result` so test bodies can chain them with `?`. Code that cannot return a `Result` can use
//! [`raise`], which unwinds with the failure as the panic payload; the runner recognizes that payload too.

use std::any::Any;
use std::fmt::Debug;

use thiserror::Error;

/// The recognized assertion failure signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a single check.
pub type AssertResult = Result<(), AssertionFailure>;

/// Assert that `actual` has the same concrete type as `expected` and compares equal to it.
///
/// Values of different types never compare equal, even when they would print the same: `assert_equals(1i32, 1i64)`
/// fails.
///
/// # Errors
///
/// Returns an [`AssertionFailure`] reading `Expected [<expected>] but got [<actual>]`.
pub fn assert_equals<A, B>(expected: A, actual: B) -> AssertResult
where
    A: PartialEq + Debug + 'static,
    B: Debug + 'static,
{
    if same_value(&expected, &actual) {
        Ok(())
    } else {
        Err(AssertionFailure::new(format!(
            "Expected [{:?}] but got [{:?}]",
            expected, actual
        )))
    }
}

/// Assert that two values are not equal under the same rules as [`assert_equals`].
///
/// # Errors
///
/// Returns an [`AssertionFailure`] when both values share a type and compare equal.
pub fn assert_not_equals<A, B>(unexpected: A, actual: B) -> AssertResult
where
    A: PartialEq + Debug + 'static,
    B: Debug + 'static,
{
    if same_value(&unexpected, &actual) {
        Err(AssertionFailure::new(format!(
            "Expected a value other than [{:?}]",
            unexpected
        )))
    } else {
        Ok(())
    }
}

/// Assert that a condition is true.
///
/// # Errors
///
/// Returns an [`AssertionFailure`] when `condition` is false.
pub fn assert_true(condition: bool) -> AssertResult {
    if condition {
        Ok(())
    } else {
        Err(AssertionFailure::new("Assertion is not true"))
    }
}

/// Assert that a condition is false.
///
/// # Errors
///
/// Returns an [`AssertionFailure`] when `condition` is true.
pub fn assert_false(condition: bool) -> AssertResult {
    if condition {
        Err(AssertionFailure::new("Assertion is not false"))
    } else {
        Ok(())
    }
}

/// Explicitly fail a test with a message.
///
/// # Errors
///
/// Always returns an [`AssertionFailure`] carrying `msg`.
pub fn fail(msg: impl Into<String>) -> AssertResult {
    Err(AssertionFailure::new(msg))
}

/// Raise an assertion failure by unwinding.
///
/// # Panics
///
/// Always panics, with `failure` as the payload.
#[cold]
#[track_caller]
pub fn raise(failure: AssertionFailure) -> ! {
    std::panic::panic_any(failure)
}

fn same_value<A, B>(expected: &A, actual: &B) -> bool
where
    A: PartialEq + 'static,
    B: 'static,
{
    (actual as &dyn Any)
        .downcast_ref::<A>()
        .is_some_and(|actual| actual == expected)
}
