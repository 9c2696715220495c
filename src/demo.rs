//! Built-in demo group and the registry the CLI runs from.
//!
//! `CommonTest` exercises every lifecycle role: two suite hooks, two per-test hooks and five tests covering each
//! outcome kind. Its expected run order is `calculations_test`, `test_is_it_true`, `simple_test`, `errored_test`,
//! with `disabled_test` skipped.

use crate::runner::{ExecutionReport, PlanEntry, Runner, Signal, StructuralError, TestGroup, plan};
use crate::{AssertResult, assert_equals, assert_true, test_group};

#[derive(Debug, Default)]
pub struct CommonTest;

#[test_group]
impl CommonTest {
    #[before_suite]
    fn start_up_suite() {
        tracing::info!("before suite");
    }

    #[after_suite]
    fn tear_down_suite() {
        tracing::info!("after suite");
    }

    #[before_each]
    fn start_up(&mut self) {
        tracing::info!("before each");
    }

    #[after_each]
    fn tear_down(&mut self) {
        tracing::info!("after each");
    }

    #[test]
    #[order(7)]
    fn simple_test(&mut self) -> AssertResult {
        tracing::info!("third test");
        assert_equals(1, 1)
    }

    #[test]
    fn errored_test(&mut self) -> Result<(), Signal> {
        tracing::info!("last test");
        Err("This test fails".into())
    }

    #[test]
    #[disabled]
    fn disabled_test(&mut self) {
        tracing::warn!("disabled test was invoked");
    }

    #[test]
    #[order]
    fn calculations_test(&mut self) -> AssertResult {
        tracing::info!("first test");
        assert_equals(1, 2)
    }

    #[test]
    #[order(1)]
    fn test_is_it_true(&mut self) -> AssertResult {
        tracing::info!("second test");
        assert_true(true)
    }
}

// ============================================================================
// Group registry
// ============================================================================

/// A runnable group known to the CLI.
#[derive(Debug, Clone, Copy)]
pub struct GroupEntry {
    /// Name used on the command line.
    pub name: &'static str,
    /// Name of the declaring type.
    pub group: &'static str,
    pub description: &'static str,
    pub run: fn(&mut Runner<'_>) -> Result<ExecutionReport, StructuralError>,
    pub plan: fn() -> Result<Vec<PlanEntry>, StructuralError>,
}

pub static GROUPS: &[GroupEntry] = &[GroupEntry {
    name: "common",
    group: "CommonTest",
    description: "lifecycle demo covering every outcome kind",
    run: run_group::<CommonTest>,
    plan: plan::<CommonTest>,
}];

fn run_group<G: TestGroup>(runner: &mut Runner<'_>) -> Result<ExecutionReport, StructuralError> {
    runner.run::<G>()
}

/// Look up a group by its CLI name or type name, ignoring ASCII case.
pub fn find_group(name: &str) -> Option<&'static GroupEntry> {
    GROUPS
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name) || entry.group.eq_ignore_ascii_case(name))
}
