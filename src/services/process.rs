//! Child process lifecycle: spawn, output pump, wait, kill
//!
//! Each started process is backed by two tasks. A supervisor owns the
//! `tokio` child, reaps it, and honors kill requests; a pump reads stdout
//! line by line and forwards everything onto one ordered event channel,
//! appending the exit event only after the stream has closed and the
//! child has been reaped. Dropping the handle while the child is still
//! running takes the child down with it, so no exit path leaks a process.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use crate::core::ProcessEvent;
use crate::error::{PhantomIisError, PhantomIisResult};

/// Immutable description of a process to start.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Capture stdout as a line stream; stderr always passes through.
    pub capture_output: bool,
}

/// Exit observation published by the supervisor task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    Running,
    /// `None` means the process was terminated by a signal.
    Exited(Option<i32>),
}

/// Result of a bounded wait for termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Exited(Option<i32>),
    TimedOut,
}

/// Owned handle to a started OS process.
#[derive(Debug)]
pub struct ProcessHandle {
    pid: u32,
    name: &'static str,
    kill_tx: Option<oneshot::Sender<()>>,
    exit_rx: watch::Receiver<ProcessExit>,
    events: Option<mpsc::UnboundedReceiver<ProcessEvent>>,
}

impl ProcessHandle {
    /// Spawn the process described by `config`.
    pub fn start(name: &'static str, config: &ProcessConfig) -> PhantomIisResult<Self> {
        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args).stdin(Stdio::null());
        cmd.stdout(if config.capture_output {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });

        let mut child = cmd
            .spawn()
            .map_err(|source| PhantomIisError::Launch {
                process: name,
                source,
            })?;
        let pid = child.id().unwrap_or(0);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = watch::channel(ProcessExit::Running);
        let (kill_tx, kill_rx) = oneshot::channel();

        match child.stdout.take() {
            Some(stdout) => {
                tokio::spawn(pump(stdout, event_tx, exit_rx.clone()));
            }
            None => {
                // nothing to stream; the channel carries only the exit event
                tokio::spawn(forward_exit(event_tx, exit_rx.clone()));
            }
        }
        tokio::spawn(supervise(child, kill_rx, exit_tx, name));

        debug!(process = name, pid, "process started");
        Ok(Self {
            pid,
            name,
            kill_tx: Some(kill_tx),
            exit_rx,
            events: Some(event_rx),
        })
    }

    /// OS process identifier.
    pub fn id(&self) -> u32 {
        self.pid
    }

    /// Whether the OS has confirmed termination.
    pub fn has_exited(&self) -> bool {
        matches!(*self.exit_rx.borrow(), ProcessExit::Exited(_))
    }

    /// Take the ordered event stream. Available exactly once; the stream
    /// is finite and not restartable.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ProcessEvent>> {
        self.events.take()
    }

    /// Block until the process exits or the timeout elapses.
    pub async fn wait(&mut self, timeout: Duration) -> WaitOutcome {
        let exited = self
            .exit_rx
            .wait_for(|state| matches!(state, ProcessExit::Exited(_)));
        match tokio::time::timeout(timeout, exited).await {
            Ok(Ok(state)) => match *state {
                ProcessExit::Exited(code) => WaitOutcome::Exited(code),
                ProcessExit::Running => WaitOutcome::TimedOut,
            },
            _ => WaitOutcome::TimedOut,
        }
    }

    /// Request forced termination. Idempotent; a no-op once the child has
    /// already exited.
    pub fn kill(&mut self) {
        if let Some(tx) = self.kill_tx.take() {
            debug!(process = self.name, pid = self.pid, "forced termination requested");
            let _ = tx.send(());
        }
    }
}

/// Owns the child: reaps it on natural exit, kills it on request. The
/// kill receiver also fires when the handle is dropped, which keeps a
/// discarded handle from leaking its process.
async fn supervise(
    mut child: Child,
    kill_rx: oneshot::Receiver<()>,
    exit_tx: watch::Sender<ProcessExit>,
    name: &'static str,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill_rx => {
            let _ = child.kill().await;
            child.wait().await
        }
    };
    let code = status.ok().and_then(|status| status.code());
    debug!(process = name, ?code, "process exited");
    let _ = exit_tx.send(ProcessExit::Exited(code));
}

/// Forwards stdout lines in emission order, then the exit event once the
/// stream has closed and the supervisor has reaped the child. Keeps
/// reading even if the receiver is gone so the child never blocks on a
/// full pipe; non-UTF-8 bytes are decoded lossily rather than ending the
/// pump early.
async fn pump(
    stdout: ChildStdout,
    event_tx: mpsc::UnboundedSender<ProcessEvent>,
    mut exit_rx: watch::Receiver<ProcessExit>,
) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                let _ = event_tx.send(ProcessEvent::Line(line));
            }
        }
    }
    drop(reader);
    if let Ok(state) = exit_rx
        .wait_for(|state| matches!(state, ProcessExit::Exited(_)))
        .await
    {
        if let ProcessExit::Exited(code) = *state {
            let _ = event_tx.send(ProcessEvent::Exited(code));
        }
    }
}

async fn forward_exit(
    event_tx: mpsc::UnboundedSender<ProcessEvent>,
    mut exit_rx: watch::Receiver<ProcessExit>,
) {
    if let Ok(state) = exit_rx
        .wait_for(|state| matches!(state, ProcessExit::Exited(_)))
        .await
    {
        if let ProcessExit::Exited(code) = *state {
            let _ = event_tx.send(ProcessEvent::Exited(code));
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(body: &'static str) -> ProcessConfig {
        ProcessConfig {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string(), body.to_string()],
            capture_output: true,
        }
    }

    async fn collect(mut events: mpsc::UnboundedReceiver<ProcessEvent>) -> Vec<ProcessEvent> {
        let mut collected = Vec::new();
        while let Some(event) = events.recv().await {
            collected.push(event);
        }
        collected
    }

    #[tokio::test]
    async fn lines_arrive_in_order_then_the_exit_event() {
        let mut handle =
            ProcessHandle::start("echoer", &shell("echo one; echo two; echo three")).unwrap();
        let events = collect(handle.take_events().unwrap()).await;

        assert_eq!(
            events,
            vec![
                ProcessEvent::Line("one".into()),
                ProcessEvent::Line("two".into()),
                ProcessEvent::Line("three".into()),
                ProcessEvent::Exited(Some(0)),
            ]
        );
        assert!(handle.has_exited());
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stall_the_pump() {
        // a 64 KiB pipe fills well before a megabyte of output; the pump
        // must keep draining past the undecodable byte or the child
        // blocks on write and never exits
        let body = "printf '\\377\\n'; i=0; while [ $i -lt 4000 ]; do printf '%0300d\\n' $i; i=$((i+1)); done";
        let mut handle = ProcessHandle::start("mojibake", &shell(body)).unwrap();

        assert_eq!(
            handle.wait(Duration::from_secs(10)).await,
            WaitOutcome::Exited(Some(0))
        );

        let events = collect(handle.take_events().unwrap()).await;
        assert_eq!(events.len(), 4002);
        assert_eq!(events[0], ProcessEvent::Line("\u{fffd}".to_string()));
        assert_eq!(events[4001], ProcessEvent::Exited(Some(0)));
    }

    #[tokio::test]
    async fn wait_times_out_on_a_long_running_process() {
        let mut handle = ProcessHandle::start("sleeper", &shell("exec sleep 30")).unwrap();

        let outcome = handle.wait(Duration::from_millis(100)).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(!handle.has_exited());

        handle.kill();
        assert!(matches!(
            handle.wait(Duration::from_secs(5)).await,
            WaitOutcome::Exited(_)
        ));
    }

    #[tokio::test]
    async fn kill_is_idempotent() {
        let mut handle = ProcessHandle::start("sleeper", &shell("exec sleep 30")).unwrap();

        handle.kill();
        handle.kill();

        assert!(matches!(
            handle.wait(Duration::from_secs(5)).await,
            WaitOutcome::Exited(_)
        ));
        // killing after exit stays a no-op
        handle.kill();
    }

    #[tokio::test]
    async fn nonzero_exit_code_is_reported() {
        let mut handle = ProcessHandle::start("failer", &shell("exit 7")).unwrap();
        let events = collect(handle.take_events().unwrap()).await;

        assert_eq!(events, vec![ProcessEvent::Exited(Some(7))]);
    }

    #[tokio::test]
    async fn take_events_is_single_use() {
        let mut handle = ProcessHandle::start("echoer", &shell("echo hi")).unwrap();

        assert!(handle.take_events().is_some());
        assert!(handle.take_events().is_none());
    }

    #[tokio::test]
    async fn spawn_failure_surfaces_a_launch_error() {
        let config = ProcessConfig {
            program: PathBuf::from("/nonexistent/binary"),
            args: vec![],
            capture_output: true,
        };
        let err = ProcessHandle::start("ghost", &config).unwrap_err();

        assert!(matches!(err, PhantomIisError::Launch { process: "ghost", .. }));
    }
}
