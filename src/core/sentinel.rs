//! Sentinel rules over child process output
//!
//! A sentinel is an exact line of output that signals a state transition.
//! Rules are evaluated in order against each line; the first match decides
//! the gate transition. A separate exit policy covers the case where the
//! process exits before any line-based rule fires.

use crate::core::gate::{FailureReason, Outcome};

/// Exact-match rule over one line of output and the outcome it triggers.
#[derive(Debug, Clone)]
pub struct SentinelRule {
    line: String,
    outcome: Outcome,
}

impl SentinelRule {
    pub fn new(line: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            line: line.into(),
            outcome,
        }
    }

    /// Byte-exact, case-sensitive comparison against the whole line.
    pub fn matches(&self, candidate: &str) -> bool {
        self.line == candidate
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome.clone()
    }
}

/// Policy applied when the process exits while the gate is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Exit before any sentinel fired means startup was cut short.
    CancelOnExit,
    /// The exit code decides: zero succeeds, anything else fails.
    CodeDecides,
}

impl ExitPolicy {
    pub fn outcome(self, code: Option<i32>) -> Outcome {
        match self {
            ExitPolicy::CancelOnExit => Outcome::Canceled,
            ExitPolicy::CodeDecides => match code {
                Some(0) => Outcome::Succeeded,
                other => Outcome::Failed(FailureReason::Exit(other)),
            },
        }
    }
}
