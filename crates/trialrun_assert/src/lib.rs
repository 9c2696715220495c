//! Assertion helpers for trialrun test groups.
//!
//! Every helper reports a failed check as an [`AssertionFailure`]. That is the one signal the runner classifies as
//! `Failed`; anything else a test raises is classified as `Error`.
//!
//! ```rust
//! use trialrun_assert::{assert_equals, assert_true, AssertResult};
//!
//! fn checks() -> AssertResult {
//!     assert_true(1 + 1 == 2)?;
//!     assert_equals(2, 1 + 1)
//! }
//! assert!(checks().is_ok());
//! ```

#![deny(clippy::unwrap_used)]

pub mod testing;

pub use testing::{
    AssertResult, AssertionFailure, assert_equals, assert_false, assert_not_equals, assert_true, fail, raise,
};
