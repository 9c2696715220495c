//! Run configuration.
//!
//! By default hook failures are logged and swallowed, and a group that cannot
//! be instantiated aborts the rest of the run. Both can be tightened per run.

/// What to do when a per-test hook (`before_each` / `after_each`) raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookFailurePolicy {
    /// Log the failure and carry on. The test outcome is unaffected.
    #[default]
    Swallow,
    /// Log the failure and report an otherwise successful test as `Error`, with the hook's reason.
    Surface,
}

/// What to do when a fresh instance cannot be constructed for a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructionPolicy {
    /// Abort the run with a structural error. No report is produced and `after_suite` hooks do not run.
    #[default]
    Abort,
    /// Report that test as `Error` and continue with the next one.
    Isolate,
}

/// Configuration of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub hook_failures: HookFailurePolicy,
    pub construction_failures: ConstructionPolicy,
}

impl RunConfig {
    /// Create a config with the default policies
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook_failures(mut self, policy: HookFailurePolicy) -> Self {
        self.hook_failures = policy;
        self
    }

    pub fn with_construction_failures(mut self, policy: ConstructionPolicy) -> Self {
        self.construction_failures = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_swallows_and_aborts() {
        let config = RunConfig::default();
        assert_eq!(config.hook_failures, HookFailurePolicy::Swallow);
        assert_eq!(config.construction_failures, ConstructionPolicy::Abort);
        assert_eq!(RunConfig::new(), config);
    }

    #[test]
    fn test_builder_chain() {
        let config = RunConfig::new()
            .with_hook_failures(HookFailurePolicy::Surface)
            .with_construction_failures(ConstructionPolicy::Isolate);
        assert_eq!(config.hook_failures, HookFailurePolicy::Surface);
        assert_eq!(config.construction_failures, ConstructionPolicy::Isolate);
    }

    #[test]
    fn test_builder_override() {
        let config = RunConfig::new()
            .with_hook_failures(HookFailurePolicy::Surface)
            .with_hook_failures(HookFailurePolicy::Swallow);
        assert_eq!(config.hook_failures, HookFailurePolicy::Swallow);
    }
}
