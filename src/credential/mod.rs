//! Local persistence of the single API credential.
//!
//! * [`CredentialStore`] — read/write seam used by the pipeline and setup flow.
//! * [`FileCredentialStore`] — JSON record under the config directory.
//! * [`MemoryCredentialStore`] — in-process store for tests and headless use.
//! * [`SetupState`] — whether a credential is present, computed on demand.

pub mod store;

pub use store::{
    CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore, CREDENTIAL_KEY,
};

// ---------------------------------------------------------------------------
// SetupState
// ---------------------------------------------------------------------------

/// Whether the application has a stored credential.
///
/// Always derived from the store at the moment of asking; nothing caches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupState {
    /// No credential stored; the setup view must be shown.
    Uninitialized,
    /// A credential is stored.
    Configured,
}

impl SetupState {
    /// Inspect `store` and report the current state.
    pub fn of(store: &dyn CredentialStore) -> Self {
        match store.get() {
            Some(_) => SetupState::Configured,
            None => SetupState::Uninitialized,
        }
    }

    pub fn is_configured(self) -> bool {
        self == SetupState::Configured
    }
}
