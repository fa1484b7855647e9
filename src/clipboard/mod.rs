//! Clipboard access — the pipeline's output sink and the trigger's text source.
//!
//! # Overview
//!
//! The user copies text, presses the chord, and pastes the result:
//!
//! 1. **Capture** the clipboard text ([`TextSource`]), optionally after
//!    simulating a copy of the current selection.
//! 2. **Write** the corrected text back ([`OutputSink`]).
//! 3. Optionally **simulate** a paste into the focused window.
//!
//! [`SystemClipboard`] implements both traits over one long-lived `arboard`
//! handle on its own thread; the keystroke helpers in [`keys`] use `enigo`.

pub mod keys;
pub mod system;

pub use keys::{simulate_copy, simulate_paste};
pub use system::{ClipboardBackend, SystemClipboard};

use thiserror::Error;

// ---------------------------------------------------------------------------
// ClipboardError
// ---------------------------------------------------------------------------

/// All errors that can surface while touching the clipboard or keyboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    Access(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    Set(String),

    /// Could not simulate a key press/release event.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Destination for corrected text.
///
/// `write` must not return until the text is visible to other processes.
pub trait OutputSink: Send + Sync {
    fn write(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Where the trigger reads the text to correct from.
pub trait TextSource: Send + Sync {
    /// Current text, or `None` when the source is empty or holds non-text data.
    fn capture(&self) -> Result<Option<String>, ClipboardError>;
}
