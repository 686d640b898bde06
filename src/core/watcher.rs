//! Output watcher: drives sentinel rules over a process event stream
//!
//! Each watched process feeds one ordered channel: every stdout line in
//! emission order, then exactly one exit event. The watcher consumes that
//! channel, resolves its gate at most once, and keeps draining afterwards
//! so the child never blocks on a full pipe.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::gate::ReadinessGate;
use crate::core::sentinel::{ExitPolicy, SentinelRule};
use crate::traits::LogSink;

/// One observation from a child process. All `Line` events precede the
/// single `Exited` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    Line(String),
    Exited(Option<i32>),
}

pub struct OutputWatcher {
    rules: Vec<SentinelRule>,
    exit_policy: ExitPolicy,
    gate: Arc<ReadinessGate>,
    sink: Arc<dyn LogSink>,
}

impl OutputWatcher {
    pub fn new(
        rules: Vec<SentinelRule>,
        exit_policy: ExitPolicy,
        gate: Arc<ReadinessGate>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            rules,
            exit_policy,
            gate,
            sink,
        }
    }

    /// Consume events until the stream closes.
    ///
    /// Sentinel evaluation happens before forwarding for each line; lines
    /// that match no rule go to the sink verbatim, in order. Resolutions
    /// after the gate is terminal are ignored by the gate itself.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<ProcessEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                ProcessEvent::Line(line) => {
                    match self.rules.iter().find(|rule| rule.matches(&line)) {
                        Some(rule) => {
                            self.gate.resolve(rule.outcome());
                        }
                        None => self.sink.forward(&line),
                    }
                }
                ProcessEvent::Exited(code) => {
                    self.gate.resolve(self.exit_policy.outcome(code));
                }
            }
        }
    }

    /// Run the watcher on its own task.
    pub fn spawn(self, events: mpsc::UnboundedReceiver<ProcessEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }
}
