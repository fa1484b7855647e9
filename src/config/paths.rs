//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir holds both files):
//!
//!   Windows: %APPDATA%\write-right\
//!   macOS:   ~/Library/Application Support/write-right/
//!   Linux:   ~/.config/write-right/

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and the credential record.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `writeRight-config.json` (the persisted API key).
    pub credential_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "write-right";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);
        Self::rooted_at(&config_dir)
    }

    /// Lay the files out under an explicit directory (tests, portable installs).
    pub fn rooted_at(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            settings_file: config_dir.join("settings.toml"),
            credential_file: config_dir.join("writeRight-config.json"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths
            .credential_file
            .file_name()
            .is_some_and(|n| n == "writeRight-config.json"));
    }

    #[test]
    fn rooted_paths_share_the_directory() {
        let paths = AppPaths::rooted_at(Path::new("/tmp/wr"));
        assert_eq!(paths.settings_file.parent(), Some(Path::new("/tmp/wr")));
        assert_eq!(paths.credential_file.parent(), Some(Path::new("/tmp/wr")));
    }
}
