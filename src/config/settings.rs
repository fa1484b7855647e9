//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a partially written file still
//! loads with the missing keys filled in.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// ApiConfig
// ---------------------------------------------------------------------------

/// Settings for the remote correction endpoint.
///
/// The API key itself is **not** stored here; it lives in the credential
/// store (see [`crate::credential`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme + host of the Generative Language API.
    pub base_url: String,
    /// Model name used in `/v1beta/models/{model}:generateContent`.
    pub model: String,
    /// Request timeout in seconds. `None` leaves the transport default in
    /// place.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-1.5-flash".into(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global shortcut binding and the keystrokes sent around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Chord that triggers a correction (e.g. `"Ctrl+Alt+L"`).
    pub trigger: String,
    /// Send Ctrl+C / ⌘C before reading the clipboard, so a plain selection
    /// is enough.
    pub copy_selection: bool,
    /// Send Ctrl+V / ⌘V after the corrected text lands on the clipboard.
    pub paste_result: bool,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            trigger: "Ctrl+Alt+L".into(),
            copy_selection: false,
            paste_result: false,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Keep the window above all other windows.
    pub always_on_top: bool,
    /// Start with the window hidden when an API key is already stored.
    pub start_hidden_when_configured: bool,
    /// Seconds before a success status message disappears.
    pub status_clear_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            always_on_top: false,
            start_hidden_when_configured: true,
            status_clear_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use write_right::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote endpoint settings.
    pub api: ApiConfig,
    /// Global shortcut settings.
    pub hotkey: HotkeyConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
