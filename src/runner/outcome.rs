//! Outcome classification.
//!
//! Maps what a test body raised (or the absence of anything raised) to one of the four outcome kinds. Only an
//! [`AssertionFailure`] counts as `Failed`; every other signal, including panics, is an `Error`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use trialrun_assert::AssertionFailure;

use super::unit::{Signal, UnitResult};

/// Outcome kind, used as the grouping key of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Failed,
    Error,
    Skipped,
}

impl OutcomeKind {
    pub const ALL: [OutcomeKind; 4] = [
        OutcomeKind::Success,
        OutcomeKind::Failed,
        OutcomeKind::Error,
        OutcomeKind::Skipped,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "SUCCESS",
            OutcomeKind::Failed => "FAILED",
            OutcomeKind::Error => "ERROR",
            OutcomeKind::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque failure or error value attached to an outcome.
#[derive(Clone)]
pub struct Reason(Arc<dyn std::error::Error + Send + Sync + 'static>);

impl Reason {
    pub fn new(signal: Signal) -> Self {
        Self(Arc::from(signal))
    }

    /// Downcast to the concrete signal type that was raised.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn is_assertion(&self) -> bool {
        self.0.is::<AssertionFailure>()
    }
}

impl fmt::Debug for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reason").field(&self.0.to_string()).finish()
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Result of one test unit in one run.
#[derive(Debug, Clone)]
pub enum TestOutcome {
    Success,
    Skipped,
    Failed { reason: Reason },
    Error { reason: Reason },
}

impl TestOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            TestOutcome::Success => OutcomeKind::Success,
            TestOutcome::Skipped => OutcomeKind::Skipped,
            TestOutcome::Failed { .. } => OutcomeKind::Failed,
            TestOutcome::Error { .. } => OutcomeKind::Error,
        }
    }

    pub fn reason(&self) -> Option<&Reason> {
        match self {
            TestOutcome::Failed { reason } | TestOutcome::Error { reason } => Some(reason),
            TestOutcome::Success | TestOutcome::Skipped => None,
        }
    }
}

/// A panic whose payload was not an [`AssertionFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("panicked: {message}")]
pub struct PanicSignal {
    pub message: String,
}

/// Classify the result of invoking a test body.
pub fn classify(result: UnitResult) -> TestOutcome {
    match result {
        Ok(()) => TestOutcome::Success,
        Err(signal) if signal.is::<AssertionFailure>() => TestOutcome::Failed {
            reason: Reason::new(signal),
        },
        Err(signal) => TestOutcome::Error {
            reason: Reason::new(signal),
        },
    }
}

/// Turn a caught panic payload back into a signal.
///
/// An [`AssertionFailure`] payload keeps its type so it still classifies as `Failed`.
pub fn signal_from_panic(payload: Box<dyn Any + Send>) -> Signal {
    match payload.downcast::<AssertionFailure>() {
        Ok(failure) => failure,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "non-string panic payload".to_string()
            };
            Box::new(PanicSignal { message })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_is_success() {
        assert_eq!(classify(Ok(())).kind(), OutcomeKind::Success);
    }

    #[test]
    fn test_assertion_failure_is_failed() {
        let outcome = classify(Err(Box::new(AssertionFailure::new("Expected [1] but got [2]"))));
        assert_eq!(outcome.kind(), OutcomeKind::Failed);
        let reason = outcome.reason().unwrap();
        assert!(reason.is_assertion());
        assert_eq!(reason.to_string(), "Expected [1] but got [2]");
    }

    #[test]
    fn test_other_signals_are_errors() {
        let outcome = classify(Err("This test fails".into()));
        assert_eq!(outcome.kind(), OutcomeKind::Error);
        assert!(!outcome.reason().unwrap().is_assertion());

        let io = std::io::Error::other("disk full");
        let outcome = classify(Err(Box::new(io)));
        assert_eq!(outcome.kind(), OutcomeKind::Error);
        assert!(outcome.reason().unwrap().downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_panic_payloads() {
        let failure = signal_from_panic(Box::new(AssertionFailure::new("nope")));
        assert!(failure.is::<AssertionFailure>());

        let text = signal_from_panic(Box::new("boom"));
        assert_eq!(text.to_string(), "panicked: boom");

        let owned = signal_from_panic(Box::new(String::from("owned boom")));
        assert_eq!(owned.to_string(), "panicked: owned boom");

        let other = signal_from_panic(Box::new(42u8));
        assert_eq!(other.to_string(), "panicked: non-string panic payload");
    }

    #[test]
    fn test_kinds_sort_in_report_order() {
        let mut kinds = OutcomeKind::ALL;
        kinds.reverse();
        kinds.sort();
        assert_eq!(kinds, OutcomeKind::ALL);
    }
}
