//! PhantomJS execution bounded by a completion timeout

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::core::{
    ExitPolicy, FailureReason, GateWait, Outcome, OutputWatcher, ReadinessGate, SentinelRule,
};
use crate::error::{PhantomIisError, PhantomIisResult};
use crate::services::process::{ProcessConfig, ProcessHandle};
use crate::traits::LogSink;

/// Line PhantomJS prints when it cannot reach the site.
pub const FAILURE_SENTINEL: &str = "Unable to load the address!";

// Generous enough for a slow suite, short enough that a wedged runner
// cannot stall CI forever.
const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(600);

pub struct RunnerExecutor {
    completion_timeout: Duration,
}

impl RunnerExecutor {
    pub fn new() -> Self {
        Self {
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Run the script to completion and map the outcome to an exit code:
    /// 0 on a clean exit, -1 on a nonzero one. The failure sentinel and a
    /// completion timeout are errors in their own right; both leave the
    /// process killed.
    pub async fn execute(
        &self,
        phantomjs: &Path,
        script: &Path,
        config_path: Option<&Path>,
        sink: Arc<dyn LogSink>,
    ) -> PhantomIisResult<i32> {
        let mut args = Vec::new();
        if let Some(config_path) = config_path {
            args.push(format!("--config={}", config_path.display()));
        }
        args.push(script.display().to_string());

        let config = ProcessConfig {
            program: phantomjs.to_path_buf(),
            args,
            capture_output: true,
        };

        info!("PhantomJS starting");
        let mut handle = ProcessHandle::start("PhantomJS", &config)?;

        let gate = Arc::new(ReadinessGate::new());
        let rules = vec![SentinelRule::new(
            FAILURE_SENTINEL,
            Outcome::Failed(FailureReason::Sentinel(FAILURE_SENTINEL.to_string())),
        )];
        let watcher = OutputWatcher::new(rules, ExitPolicy::CodeDecides, Arc::clone(&gate), sink);
        if let Some(events) = handle.take_events() {
            watcher.spawn(events);
        }

        let wait = gate.wait(self.completion_timeout).await;

        // the sentinel can fire while the process is still alive, and a
        // timed-out runner must not outlive the run
        handle.kill();

        match wait {
            GateWait::Resolved(Outcome::Succeeded) => {
                info!("PhantomJS finished");
                Ok(0)
            }
            GateWait::Resolved(Outcome::Failed(FailureReason::Sentinel(reason))) => {
                Err(PhantomIisError::RunnerFailure { reason })
            }
            GateWait::Resolved(Outcome::Failed(reason)) => {
                warn!(%reason, "PhantomJS failed");
                Ok(-1)
            }
            GateWait::Resolved(Outcome::Canceled) => Err(PhantomIisError::RunnerFailure {
                reason: "canceled before completion".to_string(),
            }),
            GateWait::TimedOut => Err(PhantomIisError::Timeout {
                process: "PhantomJS",
                timeout: self.completion_timeout,
            }),
        }
    }
}

impl Default for RunnerExecutor {
    fn default() -> Self {
        Self::new()
    }
}
