//! Progress events broadcast by the analyzer.

use hairscan_core::ErrorKind;

use crate::session::SessionState;

/// Events emitted while a session runs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage began.
    StageStarted { stage: SessionState, progress: u8 },
    /// Fallback data replaced an API result.
    FallbackUsed { stage: SessionState, reason: ErrorKind },
    /// The session reached `done`.
    Completed { confidence: u8, used_fallback: bool },
    /// The session moved to `error`.
    Failed {
        stage: SessionState,
        kind: ErrorKind,
        message: String,
    },
}

impl PipelineEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}
