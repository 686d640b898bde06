//! Run sequencing: launch, execute, shutdown
//!
//! One primary context drives the stages in order. A server that never
//! started is never shut down; a server that did start is always shut
//! down, whatever the runner did.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

use crate::services::sink::{ConsoleSink, TracingSink};
use crate::services::{RunnerExecutor, ServerLauncher, ShutdownCoordinator};
use crate::traits::{LogSink, WindowLocator};

/// Validated configuration for one run. Construction is the caller's
/// problem; by the time it reaches the orchestrator the paths are taken
/// at face value.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub iis_express: PathBuf,
    pub site_root: PathBuf,
    pub port: u16,
    pub phantomjs: PathBuf,
    pub script: PathBuf,
    pub phantom_config: Option<PathBuf>,
}

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationResult {
    pub exit_code: i32,
    pub diagnostic: Option<String>,
}

impl OrchestrationResult {
    fn success(exit_code: i32) -> Self {
        Self {
            exit_code,
            diagnostic: None,
        }
    }

    fn failure(diagnostic: String) -> Self {
        Self {
            exit_code: -1,
            diagnostic: Some(diagnostic),
        }
    }
}

pub struct Orchestrator<W: WindowLocator> {
    launcher: ServerLauncher,
    executor: RunnerExecutor,
    shutdown: ShutdownCoordinator<W>,
    server_sink: Arc<dyn LogSink>,
    runner_sink: Arc<dyn LogSink>,
}

impl<W: WindowLocator> Orchestrator<W> {
    pub fn new(locator: W) -> Self {
        Self {
            launcher: ServerLauncher::new(),
            executor: RunnerExecutor::new(),
            shutdown: ShutdownCoordinator::new(locator),
            server_sink: Arc::new(TracingSink::new("iisexpress")),
            runner_sink: Arc::new(ConsoleSink),
        }
    }

    pub fn with_launcher(mut self, launcher: ServerLauncher) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_executor(mut self, executor: RunnerExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownCoordinator<W>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_runner_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.runner_sink = sink;
        self
    }

    /// Launch the server, run the script against it, shut the server
    /// down. Every stage failure becomes a diagnostic and exit code -1.
    pub async fn run(&self, config: &RunConfig) -> OrchestrationResult {
        let mut server = match self
            .launcher
            .launch(
                &config.iis_express,
                &config.site_root,
                config.port,
                Arc::clone(&self.server_sink),
            )
            .await
        {
            Ok(handle) => handle,
            Err(err) => {
                error!(%err, "server launch failed");
                return OrchestrationResult::failure(format!(
                    "An error occurred while starting IIS express. {err}"
                ));
            }
        };

        let runner_result = self
            .executor
            .execute(
                &config.phantomjs,
                &config.script,
                config.phantom_config.as_deref(),
                Arc::clone(&self.runner_sink),
            )
            .await;

        // the server started, so it always gets shut down, even when the
        // runner failed
        let state = self.shutdown.shutdown(&mut server).await;
        debug!(?state, "server shutdown complete");

        match runner_result {
            Ok(exit_code) => OrchestrationResult::success(exit_code),
            Err(err) => {
                error!(%err, "runner execution failed");
                OrchestrationResult::failure(format!(
                    "An error occurred while executing PhantomJS. {err}"
                ))
            }
        }
    }
}
