//! WriteRight: press a global shortcut to grammar-correct the clipboard.
//!
//! ```text
//! hotkey ─► trigger ─► pipeline ─► Gemini ─► clipboard
//!                         │
//!                         └─► status ─► app (egui window)
//! ```

pub mod app;
pub mod clipboard;
pub mod config;
pub mod credential;
pub mod hotkey;
pub mod llm;
pub mod pipeline;
pub mod setup;
pub mod status;
