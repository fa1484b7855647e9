//! Turns hotkey activations into captured text for the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::clipboard::{self, TextSource};

use super::HotkeyEvent;

/// How long to let the focused app service a simulated copy.
const COPY_SETTLE: Duration = Duration::from_millis(120);

/// Capture text for every activation and send it to the pipeline.
///
/// * `copy_selection` — simulate Ctrl+C / ⌘C first so a bare selection works.
///
/// Empty or non-text clipboards are forwarded as `""`; the pipeline's blank
/// guard discards them. Capture errors are logged and the activation dropped.
/// Returns when either channel closes.
pub async fn forward_activations(
    mut hotkey_rx: mpsc::Receiver<HotkeyEvent>,
    source: Arc<dyn TextSource>,
    copy_selection: bool,
    text_tx: mpsc::Sender<String>,
) {
    while let Some(HotkeyEvent::Activated) = hotkey_rx.recv().await {
        let source = Arc::clone(&source);
        let captured = tokio::task::spawn_blocking(move || {
            if copy_selection {
                if let Err(e) = clipboard::simulate_copy() {
                    log::warn!("trigger: copy simulation failed: {e}");
                }
                std::thread::sleep(COPY_SETTLE);
            }
            source.capture()
        })
        .await;

        let text = match captured {
            Ok(Ok(text)) => text.unwrap_or_default(),
            Ok(Err(e)) => {
                log::warn!("trigger: cannot read clipboard: {e}");
                continue;
            }
            Err(e) => {
                log::warn!("trigger: capture task panicked: {e}");
                continue;
            }
        };

        log::debug!("trigger: captured {} bytes", text.len());
        if text_tx.send(text).await.is_err() {
            break;
        }
    }

    log::info!("trigger: channel closed, forwarder shutting down");
}
