//! Report aggregation.
//!
//! Groups per-test results by outcome kind. Only kinds that occurred are present; entries keep the order in which
//! they were produced.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::outcome::{OutcomeKind, TestOutcome};

/// Result of one test unit in one run. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct TestInfo {
    pub display_name: String,
    pub outcome: TestOutcome,
}

impl TestInfo {
    pub fn new(display_name: impl Into<String>, outcome: TestOutcome) -> Self {
        Self {
            display_name: display_name.into(),
            outcome,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        self.outcome.kind()
    }
}

/// Per-test results of one run, grouped by outcome kind.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    groups: BTreeMap<OutcomeKind, Vec<TestInfo>>,
}

impl ExecutionReport {
    /// Group `infos` by outcome kind, preserving production order within each kind.
    pub fn aggregate(infos: impl IntoIterator<Item = TestInfo>) -> Self {
        let mut groups: BTreeMap<OutcomeKind, Vec<TestInfo>> = BTreeMap::new();
        for info in infos {
            groups.entry(info.kind()).or_default().push(info);
        }
        Self { groups }
    }

    /// Entries of `kind`, or `None` when no test had that outcome.
    pub fn get(&self, kind: OutcomeKind) -> Option<&[TestInfo]> {
        self.groups.get(&kind).map(Vec::as_slice)
    }

    pub fn contains(&self, kind: OutcomeKind) -> bool {
        self.groups.contains_key(&kind)
    }

    /// Display names of `kind`, empty when absent.
    pub fn names(&self, kind: OutcomeKind) -> Vec<&str> {
        self.get(kind)
            .unwrap_or_default()
            .iter()
            .map(|info| info.display_name.as_str())
            .collect()
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.get(kind).map_or(0, <[TestInfo]>::len)
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether any test failed or errored.
    pub fn has_failures(&self) -> bool {
        self.contains(OutcomeKind::Failed) || self.contains(OutcomeKind::Error)
    }

    /// Present kinds in report order (success, failed, error, skipped) with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (OutcomeKind, &[TestInfo])> {
        self.groups.iter().map(|(kind, infos)| (*kind, infos.as_slice()))
    }

    /// Serializable view of the report.
    pub fn summary(&self, group: &str) -> ReportSummary {
        let outcomes = self
            .iter()
            .map(|(kind, infos)| {
                let entries = infos
                    .iter()
                    .map(|info| EntrySummary {
                        name: info.display_name.clone(),
                        reason: info.outcome.reason().map(ToString::to_string),
                    })
                    .collect();
                (kind, entries)
            })
            .collect();
        ReportSummary {
            group: group.to_string(),
            total: self.total(),
            outcomes,
        }
    }
}

impl fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, infos) in self.iter() {
            writeln!(f, "{} ({})", kind, infos.len())?;
            for info in infos {
                match info.outcome.reason() {
                    Some(reason) => writeln!(f, "  {}: {}", info.display_name, reason)?,
                    None => writeln!(f, "  {}", info.display_name)?,
                }
            }
        }
        Ok(())
    }
}

/// Serializable report, as printed by `trialrun run --format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub group: String,
    pub total: usize,
    pub outcomes: BTreeMap<OutcomeKind, Vec<EntrySummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
