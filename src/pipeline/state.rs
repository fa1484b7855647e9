//! Pipeline state machine and per-run outcome.
//!
//! ```text
//! Idle ──trigger──▶ Capturing ──credential ok──▶ Correcting ──▶ Done
//!                       │                             └──────▶ Failed
//!                       └── blank / no key / key as input ──▶ Idle
//! Done / Failed ──▶ Idle
//! ```

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the correction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Waiting for the shortcut.
    #[default]
    Idle,

    /// Text received; checking the credential and input guards.
    Capturing,

    /// Request sent to the correction endpoint.
    Correcting,

    /// Corrected text has been written to the clipboard.
    Done,

    /// The correction or the clipboard write failed.
    Failed,
}

impl PipelineState {
    /// Returns `true` while a run is between trigger and terminal state.
    ///
    /// ```
    /// use write_right::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Capturing.is_busy());
    /// assert!(PipelineState::Correcting.is_busy());
    /// assert!(!PipelineState::Done.is_busy());
    /// assert!(!PipelineState::Failed.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineState::Capturing | PipelineState::Correcting)
    }

    /// A short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Capturing => "Capturing",
            PipelineState::Correcting => "Correcting",
            PipelineState::Done => "Done",
            PipelineState::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// RunOutcome
// ---------------------------------------------------------------------------

/// How a single [`run`](super::CorrectionPipeline::run) ended.
///
/// The trigger ignores it; it exists for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The clipboard now holds this text.
    Corrected(String),
    /// Nothing but whitespace was captured.
    Blank,
    /// Another run was in flight; this trigger was dropped.
    Busy,
    /// No credential stored; the setup view was requested.
    SetupRequired,
    /// The captured text was the credential itself.
    CredentialInput,
    /// The correction or clipboard write failed with this message.
    Failed(String),
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Corrected(_) => "corrected",
            RunOutcome::Blank => "blank",
            RunOutcome::Busy => "busy",
            RunOutcome::SetupRequired => "setup-required",
            RunOutcome::CredentialInput => "credential-input",
            RunOutcome::Failed(_) => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
