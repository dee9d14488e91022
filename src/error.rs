//! Error types for conversation setup, handler invocation and assertions.

use std::backtrace::Backtrace;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConverseError>;

#[derive(Debug, Error)]
pub enum ConverseError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// A turn's handler invocation failed; the rest of the conversation was skipped.
    #[error("turn {turn} ({intent}) failed: {source}")]
    Handler {
        turn: usize,
        intent: String,
        #[source]
        source: HandlerError,
        trace: Arc<Backtrace>,
    },
}

impl ConverseError {
    pub(crate) fn handler(turn: usize, intent: &str, source: HandlerError) -> Self {
        Self::Handler {
            turn,
            intent: intent.to_string(),
            source,
            trace: Arc::new(Backtrace::force_capture()),
        }
    }

    /// Stack trace captured where the failure was observed.
    ///
    /// For `HandlerError::Failed` the handler's own error backtrace is
    /// preferred when the error carried one.
    #[must_use]
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            Self::Handler { source, trace, .. } => match source {
                HandlerError::Failed(err) if has_frames(err.backtrace()) => Some(err.backtrace()),
                _ => Some(trace.as_ref()),
            },
            _ => None,
        }
    }
}

fn has_frames(backtrace: &Backtrace) -> bool {
    matches!(
        backtrace.status(),
        std::backtrace::BacktraceStatus::Captured
    )
}

/// Outcome of a handler that did not succeed.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(anyhow::Error),

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error("handler dropped its completion without calling succeed or fail")]
    Abandoned,
}

/// A registered check whose expectation was not met.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AssertionFailure {}
