//! Console progress reporting.
//!
//! Progress goes to stderr so that the report on stdout stays machine-readable with `--format json`.

use crate::runner::{ExecutionReport, OutcomeKind, RunListener, TestInfo};

/// Default console listener.
///
/// Prints one character per test, or one line per test when verbose, and a summary line at the end.
#[derive(Debug, Default)]
pub struct ConsoleListener {
    pub verbose: bool,
}

impl ConsoleListener {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RunListener for ConsoleListener {
    fn on_collected(&mut self, group: &str, test_count: usize) {
        if test_count == 0 {
            eprintln!("No tests collected in {}", group);
        } else if self.verbose {
            eprintln!("collected {} tests in {}", test_count, group);
        }
    }

    fn on_test_start(&mut self, display_name: &str) {
        if self.verbose {
            eprint!("{} ... ", display_name);
        }
    }

    fn on_test_complete(&mut self, info: &TestInfo) {
        let kind = info.kind();
        if self.verbose {
            // Skipped tests never get an `on_test_start`.
            if kind == OutcomeKind::Skipped {
                eprint!("{} ... ", info.display_name);
            }
            eprintln!("{}{}\x1b[0m", color(kind), kind);
        } else {
            eprint!("{}{}\x1b[0m", color(kind), short(kind));
        }
    }

    fn on_run_complete(&mut self, report: &ExecutionReport) {
        if !self.verbose {
            eprintln!();
        }

        let parts: Vec<String> = report
            .iter()
            .map(|(kind, infos)| format!("{}{} {}\x1b[0m", color(kind), infos.len(), kind.as_str().to_lowercase()))
            .collect();
        eprintln!("====== {} ======", parts.join(", "));
    }
}

fn color(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Success => "\x1b[32m",
        OutcomeKind::Failed | OutcomeKind::Error => "\x1b[31m",
        OutcomeKind::Skipped => "\x1b[33m",
    }
}

fn short(kind: OutcomeKind) -> char {
    match kind {
        OutcomeKind::Success => '.',
        OutcomeKind::Failed => 'F',
        OutcomeKind::Error => 'E',
        OutcomeKind::Skipped => 's',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_markers_are_distinct() {
        let markers: std::collections::BTreeSet<char> = OutcomeKind::ALL.iter().map(|kind| short(*kind)).collect();
        assert_eq!(markers.len(), OutcomeKind::ALL.len());
    }
}
