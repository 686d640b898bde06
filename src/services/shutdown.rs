//! Graceful-then-forced server shutdown
//!
//! The server is asked to close itself first (a window close request on
//! Windows, SIGTERM elsewhere) so it can run its own cleanup, then given
//! a bounded interval to comply before being killed outright. Shutdown
//! problems never fail a run; the worst case is a forced kill.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::services::process::{ProcessHandle, WaitOutcome};
use crate::traits::WindowLocator;

const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Terminal observation of the shutdown sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    /// The process was already gone; nothing was done.
    AlreadyExited,
    /// The close request was honored within the grace period.
    GracefulExit,
    /// The close request was ignored; the process was killed.
    ForcedKill,
}

pub struct ShutdownCoordinator<W: WindowLocator> {
    locator: W,
    grace_period: Duration,
}

impl<W: WindowLocator> ShutdownCoordinator<W> {
    pub fn new(locator: W) -> Self {
        Self {
            locator,
            grace_period: DEFAULT_GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Ask the server to close itself, then kill it if it will not.
    pub async fn shutdown(&self, handle: &mut ProcessHandle) -> ShutdownState {
        if handle.has_exited() {
            debug!("server already exited, shutdown is a no-op");
            return ShutdownState::AlreadyExited;
        }

        match self.locator.find_top_level_window(handle.id()) {
            Some(window) => {
                debug!(pid = handle.id(), "posting close request to server window");
                self.locator.post_close(window);
            }
            None => warn!(
                pid = handle.id(),
                "no top-level window found for server, escalating to forced kill"
            ),
        }

        match handle.wait(self.grace_period).await {
            WaitOutcome::Exited(_) => {
                info!("server exited gracefully");
                ShutdownState::GracefulExit
            }
            WaitOutcome::TimedOut => {
                warn!(
                    grace = ?self.grace_period,
                    "server ignored the close request, forcing termination"
                );
                handle.kill();
                let _ = handle.wait(self.grace_period).await;
                ShutdownState::ForcedKill
            }
        }
    }
}
