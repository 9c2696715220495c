//! Lifecycle executor.
//!
//! Drives one run over validated, ordered metadata:
//!
//! 1. `before_suite` hooks, once, without an instance.
//! 2. For each test in order: a disabled test is `Skipped` without an instance or hooks. Otherwise a brand-new
//!    instance is created, `before_each` hooks run on it, then the body, then `after_each` hooks (always, whatever
//!    the body did).
//! 3. `after_suite` hooks, once, after every test.
//!
//! Hook failures are logged and swallowed (see [`HookFailurePolicy`]). A failure inside a hook phase stops the
//! remaining hooks of that phase. Everything is sequential on the calling thread; there is no timeout, so a unit
//! that never returns blocks the run.

use std::panic::{self, AssertUnwindSafe};

use super::collect::{InstanceHook, SuiteHook, SuiteMetadata, TestUnit, collect};
use super::config::{ConstructionPolicy, HookFailurePolicy, RunConfig};
use super::error::StructuralError;
use super::order::order_tests;
use super::outcome::{Reason, TestOutcome, classify, signal_from_panic};
use super::report::{ExecutionReport, TestInfo};
use super::unit::{GroupDecl, TestGroup, UnitResult};

// ============================================================================
// Run Listener Trait
// ============================================================================

/// Observe a run as it progresses.
///
/// Every callback has a no-op default. The runner calls them synchronously between lifecycle steps.
pub trait RunListener {
    /// Called once the group has been collected and validated.
    fn on_collected(&mut self, _group: &str, _test_count: usize) {}

    /// Called before a test that will be invoked (not for skipped tests).
    fn on_test_start(&mut self, _display_name: &str) {}

    /// Called when a test has an outcome, skipped tests included.
    fn on_test_complete(&mut self, _info: &TestInfo) {}

    /// Called after the `after_suite` hooks, with the final report.
    fn on_run_complete(&mut self, _report: &ExecutionReport) {}
}

// ============================================================================
// Runner
// ============================================================================

/// Runs test groups.
#[derive(Default)]
pub struct Runner<'l> {
    config: RunConfig,
    listener: Option<&'l mut dyn RunListener>,
}

impl<'l> Runner<'l> {
    /// Create a runner with the default config and no listener.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_listener(mut self, listener: &'l mut dyn RunListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Declare, collect, order and run `G`.
    ///
    /// ## Errors
    ///
    /// Returns a [`StructuralError`] if the group is malformed, or if an instance cannot be created under
    /// [`ConstructionPolicy::Abort`]. No report is produced in that case.
    pub fn run<G: TestGroup>(&mut self) -> Result<ExecutionReport, StructuralError> {
        let decl = G::declare();
        self.run_decl(&decl)
    }

    /// Collect, order and run an explicit declaration.
    ///
    /// ## Errors
    ///
    /// See [`Runner::run`].
    #[tracing::instrument(skip_all, fields(group = decl.name()))]
    pub fn run_decl<G: 'static>(&mut self, decl: &GroupDecl<G>) -> Result<ExecutionReport, StructuralError> {
        let metadata = collect(decl)?;
        let sequence = order_tests(&metadata.tests);
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_collected(decl.name(), sequence.len());
        }

        run_suite_hooks(&metadata.before_suite);

        let mut infos = Vec::with_capacity(sequence.len());
        for test in sequence {
            let info = self.run_test(decl, &metadata, test)?;
            if let Some(listener) = self.listener.as_deref_mut() {
                listener.on_test_complete(&info);
            }
            infos.push(info);
        }

        run_suite_hooks(&metadata.after_suite);

        let report = ExecutionReport::aggregate(infos);
        tracing::info!(total = report.total(), failures = report.has_failures(), "run finished");
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_run_complete(&report);
        }
        Ok(report)
    }

    fn run_test<G: 'static>(
        &mut self,
        decl: &GroupDecl<G>,
        metadata: &SuiteMetadata<'_, G>,
        test: &TestUnit<'_, G>,
    ) -> Result<TestInfo, StructuralError> {
        let name = test.display_name.as_str();
        if !test.enabled {
            tracing::debug!(test = name, "disabled, skipping");
            return Ok(TestInfo::new(name, TestOutcome::Skipped));
        }

        let mut instance = match decl.instantiate() {
            Ok(instance) => instance,
            Err(err) => match self.config.construction_failures {
                ConstructionPolicy::Abort => {
                    tracing::error!(test = name, error = %err, "unable to create test instance, aborting run");
                    return Err(err);
                }
                ConstructionPolicy::Isolate => {
                    tracing::error!(test = name, error = %err, "unable to create test instance");
                    let reason = Reason::new(Box::new(err));
                    return Ok(TestInfo::new(name, TestOutcome::Error { reason }));
                }
            },
        };

        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_test_start(name);
        }
        tracing::debug!(test = name, "running");

        let setup_failure = run_instance_hooks(&metadata.before_each, &mut instance);
        let mut outcome = classify(guarded(|| test.invoke(&mut instance)));
        let teardown_failure = run_instance_hooks(&metadata.after_each, &mut instance);

        if self.config.hook_failures == HookFailurePolicy::Surface && matches!(outcome, TestOutcome::Success) {
            if let Some(reason) = setup_failure.or(teardown_failure) {
                outcome = TestOutcome::Error { reason };
            }
        }

        tracing::debug!(test = name, outcome = %outcome.kind(), "finished");
        Ok(TestInfo::new(name, outcome))
    }
}

/// Invoke a unit, turning a panic into a signal.
fn guarded(f: impl FnOnce() -> UnitResult) -> UnitResult {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(signal_from_panic(payload)),
    }
}

fn run_suite_hooks(hooks: &[SuiteHook<'_>]) {
    for hook in hooks {
        if let Err(signal) = guarded(|| hook.invoke()) {
            tracing::error!(
                hook = hook.ident,
                role = %hook.role,
                error = %signal,
                "unable to run support method, skipping the rest of this phase"
            );
            return;
        }
    }
}

/// Run per-test hooks on `instance`. Returns the failure that stopped the phase, if any.
fn run_instance_hooks<G>(hooks: &[InstanceHook<'_, G>], instance: &mut G) -> Option<Reason> {
    for hook in hooks {
        if let Err(signal) = guarded(|| hook.invoke(instance)) {
            tracing::error!(
                hook = hook.ident,
                role = %hook.role,
                error = %signal,
                "unable to run support method, skipping the rest of this phase"
            );
            return Some(Reason::new(signal));
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::runner::outcome::{OutcomeKind, PanicSignal};
    use trialrun_core::Tag;

    #[test]
    fn test_guarded_turns_panics_into_signals() {
        let signal = guarded(|| panic!("kaboom")).unwrap_err();
        assert_eq!(
            signal.downcast_ref::<PanicSignal>(),
            Some(&PanicSignal {
                message: "kaboom".to_string()
            })
        );
        assert!(guarded(|| Ok(())).is_ok());
    }

    #[derive(Default)]
    struct Group;

    #[test]
    fn test_failing_hook_stops_its_phase() {
        let later = Rc::new(Cell::new(false));
        let seen = Rc::clone(&later);
        let decl = GroupDecl::<Group>::new("Group")
            .factory_default()
            .instance_unit("broken", [Tag::BeforeEach], |_| Err::<(), _>("nope"))
            .instance_unit("after_broken", [Tag::BeforeEach], move |_| seen.set(true))
            .instance_unit("works", [Tag::test()], |_| ());

        let report = Runner::new().run_decl(&decl).unwrap();
        assert_eq!(report.names(OutcomeKind::Success), ["works"]);
        assert!(!later.get());
    }

    #[test]
    fn test_surface_policy_reports_teardown_failure() {
        let decl = GroupDecl::<Group>::new("Group")
            .factory_default()
            .instance_unit("teardown", [Tag::AfterEach], |_| Err::<(), _>("leaked handle"))
            .instance_unit("works", [Tag::test()], |_| ());

        let config = RunConfig::new().with_hook_failures(HookFailurePolicy::Surface);
        let report = Runner::new().with_config(config).run_decl(&decl).unwrap();
        let errors = report.get(OutcomeKind::Error).unwrap();
        assert_eq!(errors[0].display_name, "works");
        assert_eq!(errors[0].outcome.reason().unwrap().to_string(), "leaked handle");
    }
}
