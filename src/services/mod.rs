//! Process-facing service implementations
//!
//! Everything that touches the operating system lives here: spawning and
//! reaping child processes, launching the two participants of a run, the
//! shutdown sequence, platform window location, and output sinks.

pub mod process;
pub mod runner;
pub mod server;
pub mod shutdown;
pub mod sink;
pub mod window;

pub use process::{ProcessConfig, ProcessHandle, WaitOutcome};
pub use runner::RunnerExecutor;
pub use server::ServerLauncher;
pub use shutdown::{ShutdownCoordinator, ShutdownState};
pub use sink::{ConsoleSink, TracingSink};
pub use window::NativeWindowLocator;
