//! Application entry point — WriteRight.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the credential store, Gemini client and clipboard thread.
//! 5. Create channels (`hotkey`, `text`, `ui`, `setup`).
//! 6. Spawn the orchestrator, trigger forwarder and setup loop.
//! 7. Spawn the hotkey listener thread.
//! 8. Run [`eframe::run_native`] — blocks the main thread until Quit.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use eframe::egui;
use tokio::sync::mpsc;
use write_right::{
    app::{UiModel, WriteRightApp},
    clipboard::{OutputSink, SystemClipboard, TextSource},
    config::{AppConfig, HotkeyConfig},
    credential::{CredentialStore, FileCredentialStore, SetupState},
    hotkey::{forward_activations, parse_chord, HotkeyEvent, HotkeyListener},
    llm::{GeminiClient, TextCorrector},
    pipeline::{CorrectionPipeline, PipelineOrchestrator},
    setup::{run_setup, SetupCommand, SetupService},
    status,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig, setup: SetupState) -> eframe::NativeOptions {
    let visible = !(setup.is_configured() && config.ui.start_hidden_when_configured);

    let mut vp = egui::ViewportBuilder::default()
        .with_title("WriteRight")
        .with_inner_size([380.0, 200.0])
        .with_min_inner_size([320.0, 160.0])
        .with_visible(visible);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("WriteRight starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Collaborators
    let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new());
    let corrector: Arc<dyn TextCorrector> = Arc::new(GeminiClient::from_config(&config.api));
    let clipboard = SystemClipboard::start().context("failed to start clipboard thread")?;
    let sink: Arc<dyn OutputSink> = Arc::new(clipboard.clone());
    let source: Arc<dyn TextSource> = Arc::new(clipboard);

    let stored_key = store.get();
    let setup_state = SetupState::of(store.as_ref());
    log::info!("credential state: {setup_state:?}");

    // 5. Channels
    let (hotkey_tx, hotkey_rx) = mpsc::channel::<HotkeyEvent>(16);
    let (text_tx, text_rx) = mpsc::channel::<String>(16);
    let (notifier, ui_rx) = status::channel(32);
    let (setup_tx, setup_rx) = mpsc::channel::<SetupCommand>(8);

    // 6. Background tasks
    let pipeline = CorrectionPipeline::new(
        Arc::clone(&store),
        Arc::clone(&corrector),
        sink,
        notifier.clone(),
    )
    .with_paste_result(config.hotkey.paste_result);
    rt.spawn(PipelineOrchestrator::new(Arc::new(pipeline)).run(text_rx));

    rt.spawn(forward_activations(
        hotkey_rx,
        source,
        config.hotkey.copy_selection,
        text_tx,
    ));

    let service = SetupService::new(Arc::clone(&store), corrector, notifier.clone());
    rt.spawn(run_setup(service, setup_rx));

    // 7. Hotkey listener thread
    let (chord, chord_label) = match parse_chord(&config.hotkey.trigger) {
        Some(chord) => (chord, config.hotkey.trigger.clone()),
        None => {
            let fallback = HotkeyConfig::default().trigger;
            log::warn!(
                "Unrecognised hotkey {:?}; falling back to {fallback}",
                config.hotkey.trigger
            );
            let chord = parse_chord(&fallback).context("default hotkey must parse")?;
            (chord, fallback)
        }
    };
    let _hotkey_listener = match HotkeyListener::start(chord, hotkey_tx) {
        Ok(listener) => Some(listener),
        Err(e) => {
            log::error!("Failed to start hotkey listener: {e}");
            None
        }
    };

    // 8. Window (blocks until Quit)
    let model = UiModel::new(
        setup_state,
        stored_key,
        Duration::from_secs(config.ui.status_clear_secs),
    );
    let app = WriteRightApp::new(model, ui_rx, setup_tx, chord_label);
    let options = native_options(&config, setup_state);

    eframe::run_native(
        "WriteRight",
        options,
        Box::new(move |cc| {
            notifier.attach(cc.egui_ctx.clone());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    log::info!("WriteRight shutting down");
    drop(rt);
    Ok(())
}
