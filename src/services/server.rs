//! IIS Express launch and readiness detection

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::core::{ExitPolicy, GateWait, Outcome, OutputWatcher, ReadinessGate, SentinelRule};
use crate::error::{PhantomIisError, PhantomIisResult};
use crate::services::process::{ProcessConfig, ProcessHandle};
use crate::traits::LogSink;

/// Line IIS Express prints once it is serving requests.
pub const READY_SENTINEL: &str = "IIS Express is running.";

// A server that never prints the sentinel and never exits must not hang
// the launch forever.
const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ServerLauncher {
    ready_timeout: Duration,
}

impl ServerLauncher {
    pub fn new() -> Self {
        Self {
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Start the web server and return its handle once it reports
    /// readiness. The caller owns the running server and its shutdown.
    pub async fn launch(
        &self,
        iis_express: &Path,
        site_root: &Path,
        port: u16,
        sink: Arc<dyn LogSink>,
    ) -> PhantomIisResult<ProcessHandle> {
        let config = ProcessConfig {
            program: iis_express.to_path_buf(),
            args: vec![
                format!("/path:{}", site_root.display()),
                format!("/port:{port}"),
                "/systray:false".to_string(),
            ],
            capture_output: true,
        };

        info!("IIS Express starting");
        let mut handle = ProcessHandle::start("IIS Express", &config)?;

        let gate = Arc::new(ReadinessGate::new());
        let rules = vec![SentinelRule::new(READY_SENTINEL, Outcome::Succeeded)];
        let watcher = OutputWatcher::new(rules, ExitPolicy::CancelOnExit, Arc::clone(&gate), sink);
        if let Some(events) = handle.take_events() {
            watcher.spawn(events);
        }

        match gate.wait(self.ready_timeout).await {
            GateWait::Resolved(Outcome::Succeeded) => {
                info!(port, "IIS Express is serving");
                Ok(handle)
            }
            GateWait::Resolved(_) => {
                info!("IIS Express finished");
                Err(PhantomIisError::PrematureExit {
                    process: "IIS Express",
                })
            }
            GateWait::TimedOut => {
                handle.kill();
                Err(PhantomIisError::Timeout {
                    process: "IIS Express",
                    timeout: self.ready_timeout,
                })
            }
        }
    }
}

impl Default for ServerLauncher {
    fn default() -> Self {
        Self::new()
    }
}
