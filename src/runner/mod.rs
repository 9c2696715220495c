//! Test execution core.
//!
//! A run flows one way: collect → order → execute → aggregate.
//!
//! - `unit` - declared units, bodies and group registration (`GroupDecl`, `TestGroup`)
//! - `collect` - role classification and structural validation (`SuiteMetadata`)
//! - `order` - deterministic test order
//! - `execute` - lifecycle orchestration (`Runner`, `RunListener`)
//! - `outcome` - outcome classification
//! - `report` - grouping of results by outcome kind
//! - `config` - run policies
//!
//! ## Errors
//!
//! A run either returns a complete [`ExecutionReport`] or a [`StructuralError`]; there is no partial report.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod collect;
pub mod config;
pub mod error;
pub mod execute;
pub mod order;
pub mod outcome;
pub mod report;
pub mod unit;

pub use collect::{HookUnit, InstanceHook, SuiteHook, SuiteMetadata, TestUnit, collect};
pub use config::{ConstructionPolicy, HookFailurePolicy, RunConfig};
pub use error::StructuralError;
pub use execute::{RunListener, Runner};
pub use order::{OrderKey, execution_sequence, order_tests, resolve_order};
pub use outcome::{OutcomeKind, PanicSignal, Reason, TestOutcome, classify};
pub use report::{EntrySummary, ExecutionReport, ReportSummary, TestInfo};
pub use unit::{DeclaredUnit, GroupDecl, IntoUnitResult, Signal, TestGroup, UnitBody, UnitResult};

/// Run `G` with the default configuration.
///
/// ## Errors
///
/// Returns a [`StructuralError`] when the group is malformed or an instance cannot be created.
pub fn run_tests<G: TestGroup>() -> Result<ExecutionReport, StructuralError> {
    Runner::new().run::<G>()
}

/// One entry of an execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub display_name: String,
    pub order: OrderKey,
    pub enabled: bool,
}

/// Collect and order `G` without invoking anything.
///
/// ## Errors
///
/// Returns the same structural errors a run would raise during collection.
pub fn plan<G: TestGroup>() -> Result<Vec<PlanEntry>, StructuralError> {
    let decl = G::declare();
    let metadata = collect(&decl)?;
    Ok(order_tests(&metadata.tests)
        .into_iter()
        .map(|test| PlanEntry {
            display_name: test.display_name.clone(),
            order: test.order_key(),
            enabled: test.enabled,
        })
        .collect())
}
