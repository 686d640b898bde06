//! Log sinks for forwarded child output

use tracing::debug;

use crate::traits::LogSink;

/// Prints forwarded lines verbatim to stdout.
///
/// The runner's output is the product of the run (its test report), not
/// diagnostics, so it goes to the console untouched.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn forward(&self, line: &str) {
        println!("{line}");
    }
}

/// Routes forwarded lines to tracing at debug level.
///
/// Used for server output, which is diagnostic chatter rather than
/// something the user asked for.
#[derive(Debug)]
pub struct TracingSink {
    source: &'static str,
}

impl TracingSink {
    pub fn new(source: &'static str) -> Self {
        Self { source }
    }
}

impl LogSink for TracingSink {
    fn forward(&self, line: &str) {
        debug!(source = self.source, "{line}");
    }
}
