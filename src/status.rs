//! Outbound notifications from the background tasks to the window.
//!
//! The pipeline and setup flow never touch the UI directly; they push
//! [`UiEvent`]s through a [`StatusNotifier`] and the egui app drains them each
//! frame.

use std::sync::{Arc, OnceLock};

use tokio::sync::mpsc;

/// Severity of a status message; selects its colour in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Messages delivered to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Show `message` in the status line.
    Status { message: String, kind: StatusKind },
    /// No credential is stored: bring the setup view to the front.
    SetupRequired,
    /// A submitted key was not saved; `message` says why.
    SetupFailed { message: String },
    /// A credential was just saved.
    Configured,
}

/// Cheap-to-clone sender for [`UiEvent`]s.
///
/// Sending never blocks and never fails the caller: if the window has gone
/// away or its queue is full the event is dropped with a log line.
#[derive(Clone)]
pub struct StatusNotifier {
    tx: mpsc::Sender<UiEvent>,
    repaint: Arc<OnceLock<egui::Context>>,
}

impl StatusNotifier {
    pub fn new(tx: mpsc::Sender<UiEvent>) -> Self {
        Self {
            tx,
            repaint: Arc::new(OnceLock::new()),
        }
    }

    /// Register the egui context so each event wakes the UI thread.
    /// Only the first call has an effect.
    pub fn attach(&self, ctx: egui::Context) {
        let _ = self.repaint.set(ctx);
    }

    pub fn send(&self, event: UiEvent) {
        if let Err(e) = self.tx.try_send(event) {
            log::warn!("status: dropping ui event: {e}");
            return;
        }
        if let Some(ctx) = self.repaint.get() {
            ctx.request_repaint();
        }
    }

    pub fn status(&self, message: impl Into<String>, kind: StatusKind) {
        self.send(UiEvent::Status {
            message: message.into(),
            kind,
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.status(message, StatusKind::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.status(message, StatusKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.status(message, StatusKind::Error);
    }

    pub fn setup_required(&self) {
        self.send(UiEvent::SetupRequired);
    }

    pub fn setup_failed(&self, message: impl Into<String>) {
        self.send(UiEvent::SetupFailed {
            message: message.into(),
        });
    }

    pub fn configured(&self) {
        self.send(UiEvent::Configured);
    }
}

/// Notifier plus the receiving end, for tests and wiring.
pub fn channel(capacity: usize) -> (StatusNotifier, mpsc::Receiver<UiEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (StatusNotifier::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_tag_the_kind() {
        let (notifier, mut rx) = channel(8);
        notifier.info("a");
        notifier.success("b");
        notifier.error("c");
        notifier.setup_required();
        notifier.setup_failed("d");

        let kinds: Vec<UiEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(
            kinds,
            vec![
                UiEvent::Status { message: "a".into(), kind: StatusKind::Info },
                UiEvent::Status { message: "b".into(), kind: StatusKind::Success },
                UiEvent::Status { message: "c".into(), kind: StatusKind::Error },
                UiEvent::SetupRequired,
                UiEvent::SetupFailed { message: "d".into() },
            ]
        );
    }

    #[test]
    fn full_or_closed_queue_does_not_panic() {
        let (notifier, rx) = channel(1);
        notifier.info("fits");
        notifier.info("dropped");
        drop(rx);
        notifier.error("closed");
    }
}
