//! Single-resolution readiness gate
//!
//! Converts asynchronous output and exit observations into one awaited
//! outcome. Several tasks may race to resolve the gate (a sentinel line
//! against a process exit); the first write wins and later writes are
//! ignored. A timed-out wait does not mutate the gate, so a late
//! resolution stays observable for diagnostics.

use std::fmt;
use std::time::Duration;
use tokio::sync::watch;

/// Why a watched process failed. Sentinel hits and exit observations
/// stay distinguishable so callers never have to parse message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A failure sentinel line appeared in the output.
    Sentinel(String),
    /// The process exited without success; `None` means a signal.
    Exit(Option<i32>),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Sentinel(line) => write!(f, "{line}"),
            FailureReason::Exit(Some(code)) => write!(f, "exited with code {code}"),
            FailureReason::Exit(None) => write!(f, "terminated by signal"),
        }
    }
}

/// Terminal outcome of a watched process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(FailureReason),
    Canceled,
}

/// Result of awaiting a gate with a timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateWait {
    Resolved(Outcome),
    TimedOut,
}

/// One-shot outcome container with first-write-wins semantics.
#[derive(Debug)]
pub struct ReadinessGate {
    state: watch::Sender<Option<Outcome>>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Transition out of pending. Returns whether this call performed the
    /// transition; losers of the race get `false` and change nothing.
    pub fn resolve(&self, outcome: Outcome) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_none() {
                *state = Some(outcome);
                true
            } else {
                false
            }
        })
    }

    /// The stored outcome, if the gate has resolved.
    pub fn peek(&self) -> Option<Outcome> {
        self.state.borrow().clone()
    }

    /// Block until the gate resolves or the timeout elapses. Timing out
    /// leaves the gate untouched; a second wait can still observe a late
    /// resolution.
    pub async fn wait(&self, timeout: Duration) -> GateWait {
        let mut rx = self.state.subscribe();
        // clone out of the watch borrow before `rx` goes away
        let resolved = tokio::time::timeout(timeout, rx.wait_for(Option::is_some))
            .await
            .ok()
            .and_then(Result::ok)
            .and_then(|state| state.clone());
        match resolved {
            Some(outcome) => GateWait::Resolved(outcome),
            None => GateWait::TimedOut,
        }
    }
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}
