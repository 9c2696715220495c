//! Structural errors: the test group itself is malformed.
//!
//! A structural error is fatal for the whole run. It never attaches to a single test and no report is produced
//! when one is raised.

use miette::Diagnostic;
use thiserror::Error;
use trialrun_core::Role;

/// Fatal validation failure in the shape of a test group.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum StructuralError {
    #[error("`{unit}` is tagged `{role}` and must be a suite-scope function")]
    #[diagnostic(
        code(trialrun::structure::expected_suite_scope),
        help("suite hooks run without an instance; remove the `self` receiver")
    )]
    ExpectedSuiteScope { unit: String, role: Role },

    #[error("`{unit}` is tagged `{role}` and must not be a suite-scope function")]
    #[diagnostic(
        code(trialrun::structure::expected_instance_scope),
        help("tests and per-test hooks run on a fresh instance; take `&self` or `&mut self`")
    )]
    ExpectedInstanceScope { unit: String, role: Role },

    #[error("`{unit}` is tagged `disabled` but not `test`")]
    #[diagnostic(code(trialrun::structure::disabled_without_test))]
    DisabledWithoutTest { unit: String },

    #[error("`{unit}` is tagged both `{first}` and `{second}`")]
    #[diagnostic(
        code(trialrun::structure::multiple_roles),
        help("a unit plays exactly one of test, before/after each, before/after suite")
    )]
    MultipleRoles { unit: String, first: Role, second: Role },

    #[error("`{unit}` carries the `{tag}` tag more than once")]
    #[diagnostic(code(trialrun::structure::duplicate_tag))]
    DuplicateTag { unit: String, tag: &'static str },

    #[error("unable to create an instance of {group}: {reason}")]
    #[diagnostic(code(trialrun::structure::instantiation))]
    Instantiation { group: String, reason: String },
}

impl StructuralError {
    /// Name of the unit (or group, for instantiation failures) the error is about.
    pub fn subject(&self) -> &str {
        match self {
            StructuralError::ExpectedSuiteScope { unit, .. }
            | StructuralError::ExpectedInstanceScope { unit, .. }
            | StructuralError::DisabledWithoutTest { unit }
            | StructuralError::MultipleRoles { unit, .. }
            | StructuralError::DuplicateTag { unit, .. } => unit,
            StructuralError::Instantiation { group, .. } => group,
        }
    }
}
