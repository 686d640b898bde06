//! Core orchestration primitives
//!
//! Pure coordination logic with no process I/O of its own: the
//! single-resolution readiness gate, sentinel rules, and the output
//! watcher that connects a process's event stream to its gate.

pub mod gate;
pub mod sentinel;
pub mod watcher;

pub use gate::{FailureReason, GateWait, Outcome, ReadinessGate};
pub use sentinel::{ExitPolicy, SentinelRule};
pub use watcher::{OutputWatcher, ProcessEvent};
