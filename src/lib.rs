//! Run a PhantomJS script against a locally hosted IIS Express site
//!
//! The crate launches IIS Express, waits until its stdout reports
//! readiness, runs a PhantomJS script against the served site, and shuts
//! the server down again with a graceful close request followed by a
//! bounded wait and, if necessary, a forced kill. Sentinel lines in each
//! child's output drive single-resolution readiness gates; every wait in
//! the lifecycle is bounded by a timeout.

pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

pub use crate::core::{
    FailureReason, GateWait, Outcome, OutputWatcher, ProcessEvent, ReadinessGate, SentinelRule,
};
pub use error::{PhantomIisError, PhantomIisResult};
pub use orchestrator::{OrchestrationResult, Orchestrator, RunConfig};
pub use traits::{LogSink, MockLogSink, MockWindowLocator, WindowLocator, WindowRef};
