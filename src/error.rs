//! Error types for the orchestration lifecycle

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhantomIisError {
    #[error("failed to launch {process}: {source}")]
    Launch {
        process: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{process} exited before becoming ready")]
    PrematureExit { process: &'static str },

    #[error("{process} did not finish within {timeout:?}")]
    Timeout {
        process: &'static str,
        timeout: Duration,
    },

    #[error("runner reported failure: {reason}")]
    RunnerFailure { reason: String },
}

pub type PhantomIisResult<T> = Result<T, PhantomIisError>;
