//! Correction pipeline — capture → guard → remote correct → clipboard.
//!
//! [`CorrectionPipeline::run`] handles one trigger. [`PipelineOrchestrator`]
//! feeds it from the trigger channel.
//!
//! # Pipeline flow
//!
//! ```text
//! text event
//!   └─▶ blank?                    → Blank          (silent)
//!   └─▶ no credential?            → SetupRequired  (show setup view)
//!   └─▶ text == credential?       → CredentialInput (silent)
//!   └─▶ another run in flight?    → Busy           (info status)
//!   └─▶ corrector.correct          [Correcting]
//!         ├─ Ok  → spawn_blocking(sink.write)  [Done]   success status
//!         └─ Err → error status, sink untouched [Failed]
//! ```
//!
//! Every path ends back in `Idle`. Failures are reported, never retried.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::clipboard::{self, OutputSink};
use crate::credential::CredentialStore;
use crate::llm::TextCorrector;
use crate::status::StatusNotifier;

use super::state::{PipelineState, RunOutcome};

/// Status line shown after a successful correction.
pub const CORRECTED_MESSAGE: &str = "Text corrected and copied to clipboard";

/// Status line shown when a trigger arrives mid-correction.
pub const BUSY_MESSAGE: &str = "Correction already in progress";

/// Pause between writing the clipboard and simulating a paste.
const PASTE_DELAY: Duration = Duration::from_millis(50);

// ---------------------------------------------------------------------------
// BusyGuard / Admitted
// ---------------------------------------------------------------------------

/// Holds the single in-flight slot; releases it on drop.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(flag)))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A trigger that passed the input guards and owns the in-flight slot.
struct Admitted {
    text: String,
    credential: String,
    _slot: BusyGuard,
}

// ---------------------------------------------------------------------------
// CorrectionPipeline
// ---------------------------------------------------------------------------

/// One-shot, re-entrant correction pipeline. At most one run is in flight at
/// a time; triggers that arrive meanwhile are dropped.
pub struct CorrectionPipeline {
    store: Arc<dyn CredentialStore>,
    corrector: Arc<dyn TextCorrector>,
    sink: Arc<dyn OutputSink>,
    notifier: StatusNotifier,
    paste_result: bool,
    busy: Arc<AtomicBool>,
    state: Mutex<PipelineState>,
}

impl CorrectionPipeline {
    /// Create a new pipeline.
    ///
    /// * `store`     — where the API key is read from on every run.
    /// * `corrector` — remote correction client (e.g. `GeminiClient`).
    /// * `sink`      — receives the corrected text (e.g. `SystemClipboard`).
    /// * `notifier`  — status / setup-required channel to the window.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        corrector: Arc<dyn TextCorrector>,
        sink: Arc<dyn OutputSink>,
        notifier: StatusNotifier,
    ) -> Self {
        Self {
            store,
            corrector,
            sink,
            notifier,
            paste_result: false,
            busy: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(PipelineState::Idle),
        }
    }

    /// Simulate a paste after each successful write.
    pub fn with_paste_result(mut self, enabled: bool) -> Self {
        self.paste_result = enabled;
        self
    }

    pub fn state(&self) -> PipelineState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Process one captured text.
    pub async fn run(&self, raw_text: &str) -> RunOutcome {
        match self.admit(raw_text) {
            Ok(admitted) => self.run_admitted(admitted).await,
            Err(outcome) => outcome,
        }
    }

    /// Input guards, then the busy slot. Degenerate input is turned away
    /// before the slot is looked at, so it stays silent even mid-run.
    fn admit(&self, raw_text: &str) -> Result<Admitted, RunOutcome> {
        if raw_text.trim().is_empty() {
            log::debug!("pipeline: blank input, nothing to do");
            return Err(RunOutcome::Blank);
        }

        let Some(credential) = self.store.get() else {
            log::info!("pipeline: no API key stored, requesting setup");
            self.notifier.setup_required();
            return Err(RunOutcome::SetupRequired);
        };

        if raw_text == credential {
            log::debug!("pipeline: captured text is the API key, skipping");
            return Err(RunOutcome::CredentialInput);
        }

        let Some(slot) = BusyGuard::acquire(&self.busy) else {
            log::info!("pipeline: trigger ignored, a correction is in flight");
            self.notifier.info(BUSY_MESSAGE);
            return Err(RunOutcome::Busy);
        };

        self.set_state(PipelineState::Capturing);
        Ok(Admitted {
            text: raw_text.to_string(),
            credential,
            _slot: slot,
        })
    }

    /// Drive an admitted trigger to completion. The slot is released only
    /// after the state is back to `Idle`.
    async fn run_admitted(&self, admitted: Admitted) -> RunOutcome {
        let outcome = self
            .correct_and_write(&admitted.text, &admitted.credential)
            .await;
        self.set_state(PipelineState::Idle);
        outcome
    }

    async fn correct_and_write(&self, raw_text: &str, credential: &str) -> RunOutcome {
        // ── Correcting ───────────────────────────────────────────────────
        self.set_state(PipelineState::Correcting);
        log::debug!("pipeline: correcting (len={})", raw_text.len());

        let corrected = match self.corrector.correct(raw_text, credential).await {
            Ok(text) => text,
            Err(e) => return self.fail(e.to_string()),
        };

        // ── Output (blocking → thread pool) ──────────────────────────────
        let sink = Arc::clone(&self.sink);
        let text = corrected.clone();
        match tokio::task::spawn_blocking(move || sink.write(&text)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return self.fail(e.to_string()),
            Err(e) => return self.fail(format!("internal error: {e}")),
        }

        if self.paste_result {
            let pasted = tokio::task::spawn_blocking(|| {
                std::thread::sleep(PASTE_DELAY);
                clipboard::simulate_paste()
            })
            .await;
            match pasted {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::warn!("pipeline: paste failed: {e}"),
                Err(e) => log::warn!("pipeline: paste task panicked: {e}"),
            }
        }

        self.set_state(PipelineState::Done);
        log::info!("pipeline: correction written (len={})", corrected.len());
        self.notifier.success(CORRECTED_MESSAGE);
        RunOutcome::Corrected(corrected)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_state(&self, state: PipelineState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn fail(&self, message: String) -> RunOutcome {
        self.set_state(PipelineState::Failed);
        log::error!("pipeline error: {message}");
        self.notifier.error(message.clone());
        RunOutcome::Failed(message)
    }
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Consumes trigger events and runs the pipeline for each.
///
/// Triggers are admitted on the receiving loop in arrival order, so the
/// earlier of two near-simultaneous triggers always takes the busy slot.
/// Each admitted run is then spawned as its own task, which keeps the loop
/// free to turn later triggers away while a correction is in flight.
pub struct PipelineOrchestrator {
    pipeline: Arc<CorrectionPipeline>,
}

impl PipelineOrchestrator {
    pub fn new(pipeline: Arc<CorrectionPipeline>) -> Self {
        Self { pipeline }
    }

    /// Run until `text_rx` is closed, then wait for in-flight runs.
    pub async fn run(self, mut text_rx: mpsc::Receiver<String>) {
        let mut runs = JoinSet::new();

        while let Some(text) = text_rx.recv().await {
            let admitted = match self.pipeline.admit(&text) {
                Ok(admitted) => admitted,
                Err(outcome) => {
                    log::debug!("pipeline: trigger not admitted ({})", outcome.label());
                    continue;
                }
            };

            let pipeline = Arc::clone(&self.pipeline);
            runs.spawn(async move {
                let outcome = pipeline.run_admitted(admitted).await;
                log::debug!("pipeline: run finished ({})", outcome.label());
            });
            while runs.try_join_next().is_some() {}
        }

        log::info!("pipeline: trigger channel closed, orchestrator shutting down");
        while runs.join_next().await.is_some() {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
