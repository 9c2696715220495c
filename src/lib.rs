#![forbid(unsafe_code)]
//! trialrun: a minimal test-execution engine.
//!
//! A test group declares units tagged with structural metadata. trialrun collects them, validates their shape,
//! orders the tests deterministically, runs them with suite-level and per-test hooks (a fresh instance per test)
//! and classifies each result as success, failed, error or skipped.
//!
//! ```rust
//! use trialrun::{AssertResult, OutcomeKind, assert_equals, run_tests, test_group};
//!
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! #[test_group]
//! impl Arithmetic {
//!     #[test]
//!     #[order(1)]
//!     fn adds(&self) -> AssertResult {
//!         assert_equals(4, 2 + 2)
//!     }
//!
//!     #[test]
//!     #[disabled]
//!     fn not_yet(&self) {}
//! }
//!
//! let report = run_tests::<Arithmetic>().unwrap();
//! assert_eq!(report.names(OutcomeKind::Success), ["adds"]);
//! assert_eq!(report.names(OutcomeKind::Skipped), ["not_yet"]);
//! ```
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `runner` modules
//!   enforce `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Test bodies**: panics raised by user units are caught and classified, never propagated.

// Lets `#[test_group]` expansions refer to `::trialrun` from inside this crate.
extern crate self as trialrun;

pub mod cli;
pub mod demo;
pub mod runner;

pub use runner::{
    ConstructionPolicy, ExecutionReport, GroupDecl, HookFailurePolicy, IntoUnitResult, OutcomeKind, Reason,
    RunConfig, RunListener, Runner, Signal, StructuralError, TestGroup, TestInfo, TestOutcome, UnitBody, UnitResult,
    plan, run_tests,
};

pub use trialrun_assert::{
    AssertResult, AssertionFailure, assert_equals, assert_false, assert_not_equals, assert_true, fail, raise,
};
pub use trialrun_core::{Role, Scope, Tag, TagId, tags};
pub use trialrun_derive::test_group;
