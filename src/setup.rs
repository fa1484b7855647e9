//! First-run / change-key flow: validate a candidate API key, then store it.
//!
//! The window sends [`SetupCommand`]s; [`run_setup`] answers through the
//! [`StatusNotifier`]. A key is only written after the endpoint accepts it.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::credential::CredentialStore;
use crate::llm::TextCorrector;
use crate::status::StatusNotifier;

pub const EMPTY_KEY_MESSAGE: &str = "Please enter a valid API key.";
pub const SAVING_MESSAGE: &str = "Saving API key...";
pub const SAVED_MESSAGE: &str = "API Key saved successfully!";
pub const INVALID_KEY_MESSAGE: &str = "Invalid API key. Please check and try again.";

/// Requests from the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupCommand {
    /// Validate and store this key.
    Submit(String),
}

/// Result of one [`SetupService::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Saved,
    Empty,
    Invalid,
    StoreFailed(String),
}

pub struct SetupService {
    store: Arc<dyn CredentialStore>,
    corrector: Arc<dyn TextCorrector>,
    notifier: StatusNotifier,
}

impl SetupService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        corrector: Arc<dyn TextCorrector>,
        notifier: StatusNotifier,
    ) -> Self {
        Self {
            store,
            corrector,
            notifier,
        }
    }

    /// Validate `candidate` (trimmed) and persist it when accepted.
    pub async fn submit(&self, candidate: &str) -> SetupOutcome {
        let key = candidate.trim();
        if key.is_empty() {
            self.notifier.setup_failed(EMPTY_KEY_MESSAGE);
            return SetupOutcome::Empty;
        }

        self.notifier.info(SAVING_MESSAGE);

        if !self.corrector.validate_credential(key).await {
            log::info!("setup: candidate key rejected");
            self.notifier.setup_failed(INVALID_KEY_MESSAGE);
            return SetupOutcome::Invalid;
        }

        let store = Arc::clone(&self.store);
        let owned = key.to_string();
        let stored = tokio::task::spawn_blocking(move || store.set(&owned))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));

        match stored {
            Ok(()) => {
                self.notifier.success(SAVED_MESSAGE);
                self.notifier.configured();
                SetupOutcome::Saved
            }
            Err(message) => {
                log::error!("setup: cannot store key: {message}");
                self.notifier
                    .setup_failed(format!("Failed to save API key: {message}"));
                SetupOutcome::StoreFailed(message)
            }
        }
    }
}

/// Serve setup commands until the window side closes.
pub async fn run_setup(service: SetupService, mut rx: mpsc::Receiver<SetupCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            SetupCommand::Submit(candidate) => {
                let outcome = service.submit(&candidate).await;
                log::debug!("setup: submit finished ({outcome:?})");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{CredentialError, MemoryCredentialStore};
    use crate::llm::CorrectionError;
    use crate::status::{self, StatusKind, UiEvent};
    use async_trait::async_trait;

    /// Accepts exactly one key.
    struct OneKey(&'static str);

    #[async_trait]
    impl TextCorrector for OneKey {
        async fn validate_credential(&self, candidate: &str) -> bool {
            candidate == self.0
        }

        async fn correct(&self, text: &str, _key: &str) -> Result<String, CorrectionError> {
            Ok(text.to_string())
        }
    }

    struct ReadOnlyStore;

    impl CredentialStore for ReadOnlyStore {
        fn get(&self) -> Option<String> {
            None
        }

        fn set(&self, _value: &str) -> Result<(), CredentialError> {
            Err(CredentialError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    fn status(message: &str, kind: StatusKind) -> UiEvent {
        UiEvent::Status {
            message: message.into(),
            kind,
        }
    }

    fn failed(message: &str) -> UiEvent {
        UiEvent::SetupFailed {
            message: message.into(),
        }
    }

    fn drain(rx: &mut mpsc::Receiver<UiEvent>) -> Vec<UiEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[tokio::test]
    async fn valid_key_is_trimmed_and_stored() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (notifier, mut rx) = status::channel(8);
        let service = SetupService::new(store.clone(), Arc::new(OneKey("AIza-good")), notifier);

        assert_eq!(service.submit("  AIza-good \n").await, SetupOutcome::Saved);

        assert_eq!(store.get().as_deref(), Some("AIza-good"));
        assert_eq!(
            drain(&mut rx),
            vec![
                status(SAVING_MESSAGE, StatusKind::Info),
                status(SAVED_MESSAGE, StatusKind::Success),
                UiEvent::Configured,
            ]
        );
    }

    #[tokio::test]
    async fn invalid_key_is_not_stored() {
        let store = Arc::new(MemoryCredentialStore::with("AIza-old"));
        let (notifier, mut rx) = status::channel(8);
        let service = SetupService::new(store.clone(), Arc::new(OneKey("AIza-good")), notifier);

        assert_eq!(service.submit("AIza-bad").await, SetupOutcome::Invalid);

        assert_eq!(store.get().as_deref(), Some("AIza-old"));
        assert_eq!(
            drain(&mut rx),
            vec![
                status(SAVING_MESSAGE, StatusKind::Info),
                failed(INVALID_KEY_MESSAGE),
            ]
        );
    }

    #[tokio::test]
    async fn empty_key_skips_validation() {
        let (notifier, mut rx) = status::channel(8);
        let service = SetupService::new(
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(OneKey("")),
            notifier,
        );

        assert_eq!(service.submit("   ").await, SetupOutcome::Empty);
        assert_eq!(drain(&mut rx), vec![failed(EMPTY_KEY_MESSAGE)]);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let (notifier, mut rx) = status::channel(8);
        let service = SetupService::new(Arc::new(ReadOnlyStore), Arc::new(OneKey("k")), notifier);

        let outcome = service.submit("k").await;

        assert!(matches!(outcome, SetupOutcome::StoreFailed(ref m) if m.contains("read-only")));
        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(UiEvent::SetupFailed { message })
                if message.starts_with("Failed to save API key:")
        ));
    }

    #[tokio::test]
    async fn run_setup_serves_until_closed() {
        let store = Arc::new(MemoryCredentialStore::new());
        let (notifier, _rx) = status::channel(8);
        let service = SetupService::new(store.clone(), Arc::new(OneKey("k")), notifier);
        let (tx, rx) = mpsc::channel(2);

        tx.send(SetupCommand::Submit("k".into())).await.unwrap();
        drop(tx);
        run_setup(service, rx).await;

        assert_eq!(store.get().as_deref(), Some("k"));
    }
}
