//! Correction pipeline module.
//!
//! Wires trigger text → credential check → remote correction → clipboard, and
//! reports progress to the window through a [`StatusNotifier`].
//!
//! # Architecture
//!
//! ```text
//! trigger text (mpsc<String>)
//!        │
//!        ▼
//! PipelineOrchestrator::run()  ← async tokio task
//!        │  spawns one task per event
//!        ▼
//! CorrectionPipeline::run(text)
//!        ├─ CredentialStore::get
//!        ├─ TextCorrector::correct        (async HTTP)
//!        └─ spawn_blocking(OutputSink::write)
//!
//! UiEvent (mpsc) ───▶ egui app
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use write_right::clipboard::SystemClipboard;
//! use write_right::config::AppConfig;
//! use write_right::credential::FileCredentialStore;
//! use write_right::llm::GeminiClient;
//! use write_right::pipeline::{CorrectionPipeline, PipelineOrchestrator};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let (notifier, _ui_rx) = write_right::status::channel(32);
//!
//!     let pipeline = Arc::new(CorrectionPipeline::new(
//!         Arc::new(FileCredentialStore::new()),
//!         Arc::new(GeminiClient::from_config(&config.api)),
//!         Arc::new(SystemClipboard::start().unwrap()),
//!         notifier,
//!     ));
//!
//!     let (text_tx, text_rx) = mpsc::channel(16);
//!     tokio::spawn(PipelineOrchestrator::new(pipeline).run(text_rx));
//!
//!     // text_tx is fed by write_right::hotkey::forward_activations(...)
//!     # drop(text_tx);
//! }
//! ```
//!
//! [`StatusNotifier`]: crate::status::StatusNotifier

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{CorrectionPipeline, PipelineOrchestrator, BUSY_MESSAGE, CORRECTED_MESSAGE};
pub use state::{PipelineState, RunOutcome};
