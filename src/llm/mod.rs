//! Remote correction client.
//!
//! This module provides:
//! * [`TextCorrector`] — async trait for the correction endpoint.
//! * [`GeminiClient`] — `generateContent` implementation.
//! * [`prompt`] — fixed instruction templates and sampling parameters.
//! * [`wire`] — JSON request / response bodies.
//! * [`CorrectionError`] — error variants for correction calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use write_right::config::AppConfig;
//! use write_right::llm::{GeminiClient, TextCorrector};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = GeminiClient::from_config(&config.api);
//!
//!     if client.validate_credential("AIza...").await {
//!         let fixed = client.correct("i has a error", "AIza...").await.unwrap();
//!         println!("{fixed}");
//!     }
//! }
//! ```

pub mod corrector;
pub mod prompt;
pub mod wire;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use corrector::{CorrectionError, GeminiClient, TextCorrector, UNKNOWN_ERROR};
