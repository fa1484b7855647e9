//! WriteRight window — egui/eframe application.
//!
//! # Architecture
//!
//! [`WriteRightApp`] is the top-level [`eframe::App`]. It owns:
//!
//! * `ui_rx`    — receives [`UiEvent`]s from the pipeline and setup flow.
//! * `setup_tx` — sends [`SetupCommand`]s to the setup task.
//!
//! All event handling lives in [`UiModel`] so it can be exercised without a
//! GUI context.
//!
//! # Views
//!
//! | View    | Content |
//! |---------|---------|
//! | `Setup` | masked API key field, Save (and Cancel once a key is saved), spinner while validating |
//! | `Ready` | shortcut hint, Change key / Hide / Quit |
//!
//! Closing the window hides it; the app keeps listening for the shortcut.

use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::credential::SetupState;
use crate::setup::{SetupCommand, SAVED_MESSAGE};
use crate::status::{StatusKind, UiEvent};

/// Poll interval for background events while nothing else asks for a repaint.
const IDLE_POLL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// UiModel
// ---------------------------------------------------------------------------

/// Which panel the window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Setup,
    Ready,
}

/// What the window must do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    None,
    /// Un-hide, un-minimise and focus.
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub kind: StatusKind,
    pub shown_at: Instant,
}

/// View state, independent of egui.
#[derive(Debug, Clone)]
pub struct UiModel {
    pub view: View,
    pub key_input: String,
    pub validating: bool,
    pub status: Option<StatusLine>,
    /// Key known to be in the store; `None` until one is saved.
    saved_key: Option<String>,
    /// Key sent with the last submit, adopted once it is saved.
    pending_key: Option<String>,
    status_clear: Duration,
}

impl UiModel {
    /// Initial state from the stored credential.
    pub fn new(setup: SetupState, stored_key: Option<String>, status_clear: Duration) -> Self {
        let view = match setup {
            SetupState::Configured => View::Ready,
            SetupState::Uninitialized => View::Setup,
        };
        let saved_key = stored_key.filter(|_| setup.is_configured());
        Self {
            view,
            key_input: saved_key.clone().unwrap_or_default(),
            validating: false,
            status: None,
            saved_key,
            pending_key: None,
            status_clear,
        }
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) -> WindowRequest {
        match event {
            UiEvent::Status { message, kind } => {
                self.show(message, kind, now);
                WindowRequest::None
            }
            UiEvent::SetupFailed { message } => {
                self.validating = false;
                self.pending_key = None;
                self.show(message, StatusKind::Error, now);
                WindowRequest::None
            }
            UiEvent::SetupRequired => {
                self.saved_key = None;
                self.view = View::Setup;
                WindowRequest::Reveal
            }
            UiEvent::Configured => {
                self.validating = false;
                if let Some(key) = self.pending_key.take() {
                    self.saved_key = Some(key);
                }
                self.view = View::Ready;
                WindowRequest::None
            }
        }
    }

    /// Take the key for submission; `None` while a validation is running.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.validating {
            return None;
        }
        self.validating = true;
        self.pending_key = Some(self.key_input.trim().to_string());
        Some(self.key_input.clone())
    }

    /// `true` when the setup view can go back to Ready without saving.
    pub fn can_cancel_setup(&self) -> bool {
        self.view == View::Setup && self.saved_key.is_some() && !self.validating
    }

    /// Leave the setup view and restore the saved key in the field.
    pub fn cancel_setup(&mut self) {
        if !self.can_cancel_setup() {
            return;
        }
        self.key_input = self.saved_key.clone().unwrap_or_default();
        self.view = View::Ready;
    }

    fn show(&mut self, message: String, kind: StatusKind, now: Instant) {
        self.status = Some(StatusLine {
            message,
            kind,
            shown_at: now,
        });
    }

    /// Hide success messages once they have been up long enough. The
    /// "saved" confirmation stays until replaced.
    pub fn expire_status(&mut self, now: Instant) {
        let expired = self.status.as_ref().is_some_and(|s| {
            s.kind == StatusKind::Success
                && s.message != SAVED_MESSAGE
                && now.duration_since(s.shown_at) >= self.status_clear
        });
        if expired {
            self.status = None;
        }
    }

    /// `true` while a status line is waiting to expire.
    pub fn has_timed_status(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|s| s.kind == StatusKind::Success && s.message != SAVED_MESSAGE)
    }
}

// ---------------------------------------------------------------------------
// WriteRightApp
// ---------------------------------------------------------------------------

/// eframe application — the setup / status window.
pub struct WriteRightApp {
    model: UiModel,
    ui_rx: mpsc::Receiver<UiEvent>,
    setup_tx: mpsc::Sender<SetupCommand>,
    chord_label: String,
    quitting: bool,
}

impl WriteRightApp {
    /// * `model`       — initial view state.
    /// * `ui_rx`       — receiver end of the UI event channel.
    /// * `setup_tx`    — sender end of the setup command channel.
    /// * `chord_label` — shortcut text shown in the Ready view.
    pub fn new(
        model: UiModel,
        ui_rx: mpsc::Receiver<UiEvent>,
        setup_tx: mpsc::Sender<SetupCommand>,
        chord_label: String,
    ) -> Self {
        Self {
            model,
            ui_rx,
            setup_tx,
            chord_label,
            quitting: false,
        }
    }

    fn poll_events(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        while let Ok(event) = self.ui_rx.try_recv() {
            if self.model.apply(event, now) == WindowRequest::Reveal {
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                ctx.send_viewport_cmd(egui::ViewportCommand::Minimized(false));
                ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            }
        }
        self.model.expire_status(now);
    }

    fn submit(&mut self) {
        let Some(key) = self.model.begin_submit() else {
            return;
        };
        if let Err(e) = self.setup_tx.try_send(SetupCommand::Submit(key)) {
            log::error!("app: setup task unavailable: {e}");
            self.model.apply(
                UiEvent::SetupFailed {
                    message: "Failed to save API key: setup service unavailable".into(),
                },
                Instant::now(),
            );
        }
    }

    fn draw_setup(&mut self, ui: &mut egui::Ui) {
        ui.label("Enter your Gemini API key to get started.");
        ui.add_space(6.0);

        let field = ui.add(
            egui::TextEdit::singleline(&mut self.model.key_input)
                .password(true)
                .hint_text("API key")
                .desired_width(f32::INFINITY),
        );
        let entered = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            let save = ui.add_enabled(!self.model.validating, egui::Button::new("Save"));
            if save.clicked() || entered {
                self.submit();
            }
            if self.model.can_cancel_setup() && ui.button("Cancel").clicked() {
                self.model.cancel_setup();
            }
            if self.model.validating {
                ui.spinner();
            }
        });
    }

    fn draw_ready(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.label("WriteRight is running in the background.");
        ui.add_space(4.0);
        ui.label(format!(
            "Copy some text, press {}, then paste the corrected version.",
            self.chord_label
        ));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Change key").clicked() {
                self.model.view = View::Setup;
            }
            if ui.button("Hide").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
            }
            if ui.button("Quit").clicked() {
                self.quitting = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        let Some(status) = &self.model.status else {
            return;
        };
        let color = match status.kind {
            StatusKind::Info => egui::Color32::from_rgb(68, 136, 255),
            StatusKind::Success => egui::Color32::from_rgb(80, 200, 120),
            StatusKind::Error => egui::Color32::from_rgb(255, 136, 68),
        };
        ui.separator();
        ui.label(egui::RichText::new(status.message.as_str()).color(color));
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for WriteRightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);

        // Hide instead of quitting when the user closes the window.
        if ctx.input(|i| i.viewport().close_requested()) && !self.quitting {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("WriteRight");
            ui.separator();

            match self.model.view {
                View::Setup => self.draw_setup(ui),
                View::Ready => self.draw_ready(ui, ctx),
            }

            self.draw_status(ui);
        });

        if self.model.has_timed_status() || self.model.validating {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(IDLE_POLL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("WriteRight window closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
