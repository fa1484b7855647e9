//! `arboard`-backed [`OutputSink`] / [`TextSource`].
//!
//! A single [`arboard::Clipboard`] lives on a dedicated `clipboard` thread for
//! the life of the process. On X11 the selection is served by the handle that
//! set it, so a handle dropped right after `set_text` can take the corrected
//! text with it before the user pastes. [`SystemClipboard`] is a cheap,
//! cloneable handle that sends requests to that thread and waits for the
//! reply.
//!
//! ```text
//! spawn_blocking ──Request──▶ clipboard thread (owns arboard::Clipboard)
//!        ◀──────reply───────
//! ```

use std::sync::mpsc;

use arboard::Clipboard;

use super::{ClipboardError, OutputSink, TextSource};

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// The operations the clipboard thread needs from its handle.
pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn get_text(&mut self) -> Option<String>;
}

impl ClipboardBackend for Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Clipboard::set_text(self, text).map_err(|e| ClipboardError::Set(e.to_string()))
    }

    // `get_text` errors when the clipboard is empty or holds an image; both
    // mean "nothing to correct".
    fn get_text(&mut self) -> Option<String> {
        Clipboard::get_text(self).ok()
    }
}

enum Request {
    Write(String, mpsc::Sender<Result<(), ClipboardError>>),
    Capture(mpsc::Sender<Result<Option<String>, ClipboardError>>),
}

// ---------------------------------------------------------------------------
// SystemClipboard
// ---------------------------------------------------------------------------

/// Handle to the OS clipboard thread. Clones share the same thread.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tx: mpsc::Sender<Request>,
}

impl SystemClipboard {
    /// Spawn the clipboard thread over the OS clipboard.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn start() -> std::io::Result<Self> {
        Self::start_with(|| Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string())))
    }

    /// Spawn the clipboard thread over any backend.
    ///
    /// `open` runs on the clipboard thread, so the backend does not need to be
    /// `Send`. It is called on first use and again after a failed open; once a
    /// handle is open it is kept until every [`SystemClipboard`] is dropped.
    pub fn start_with<B, F>(mut open: F) -> std::io::Result<Self>
    where
        B: ClipboardBackend + 'static,
        F: FnMut() -> Result<B, ClipboardError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Request>();

        std::thread::Builder::new()
            .name("clipboard".into())
            .spawn(move || {
                let mut handle: Option<B> = None;

                for request in rx {
                    if handle.is_none() {
                        match open() {
                            Ok(backend) => handle = Some(backend),
                            Err(e) => {
                                log::warn!("clipboard: {e}");
                                request.reject(e);
                                continue;
                            }
                        }
                    }
                    let Some(backend) = handle.as_mut() else {
                        continue;
                    };

                    match request {
                        Request::Write(text, reply) => {
                            let _ = reply.send(backend.set_text(&text));
                        }
                        Request::Capture(reply) => {
                            let _ = reply.send(Ok(backend.get_text()));
                        }
                    }
                }

                log::debug!("clipboard: all handles dropped, thread exiting");
            })?;

        Ok(Self { tx })
    }

    fn request<T>(
        &self,
        make: impl FnOnce(mpsc::Sender<Result<T, ClipboardError>>) -> Request,
    ) -> Result<T, ClipboardError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(make(reply_tx))
            .map_err(|_| ClipboardError::Access("clipboard thread has stopped".into()))?;
        reply_rx
            .recv()
            .map_err(|_| ClipboardError::Access("clipboard thread has stopped".into()))?
    }
}

impl Request {
    fn reject(self, error: ClipboardError) {
        match self {
            Request::Write(_, reply) => {
                let _ = reply.send(Err(error));
            }
            Request::Capture(reply) => {
                let _ = reply.send(Err(error));
            }
        }
    }
}

impl OutputSink for SystemClipboard {
    fn write(&self, text: &str) -> Result<(), ClipboardError> {
        self.request(|reply| Request::Write(text.to_string(), reply))
    }
}

impl TextSource for SystemClipboard {
    fn capture(&self) -> Result<Option<String>, ClipboardError> {
        self.request(Request::Capture)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-process clipboard shared with the test; counts opens and drops.
    #[derive(Default)]
    struct Shared {
        text: Mutex<Option<String>>,
        opens: AtomicUsize,
        drops: AtomicUsize,
    }

    struct FakeClipboard(Arc<Shared>);

    impl ClipboardBackend for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            *self.0.text.lock().unwrap() = Some(text.to_string());
            Ok(())
        }

        fn get_text(&mut self) -> Option<String> {
            self.0.text.lock().unwrap().clone()
        }
    }

    impl Drop for FakeClipboard {
        fn drop(&mut self) {
            self.0.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fake() -> (SystemClipboard, Arc<Shared>) {
        let shared = Arc::new(Shared::default());
        let opener = Arc::clone(&shared);
        let clipboard = SystemClipboard::start_with(move || {
            opener.opens.fetch_add(1, Ordering::SeqCst);
            Ok(FakeClipboard(Arc::clone(&opener)))
        })
        .unwrap();
        (clipboard, shared)
    }

    #[test]
    fn one_handle_outlives_every_write() {
        let (clipboard, shared) = fake();

        clipboard.write("first").unwrap();
        clipboard.clone().write("second").unwrap();
        assert_eq!(clipboard.capture().unwrap().as_deref(), Some("second"));

        assert_eq!(shared.opens.load(Ordering::SeqCst), 1);
        assert_eq!(shared.drops.load(Ordering::SeqCst), 0, "handle still owns the text");
    }

    #[test]
    fn empty_clipboard_captures_none() {
        let (clipboard, _shared) = fake();
        assert_eq!(clipboard.capture().unwrap(), None);
    }

    #[test]
    fn failed_open_is_reported_and_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let shared = Arc::new(Shared::default());
        let backend = Arc::clone(&shared);

        let clipboard = SystemClipboard::start_with(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ClipboardError::Access("no display".into()))
            } else {
                Ok(FakeClipboard(Arc::clone(&backend)))
            }
        })
        .unwrap();

        assert!(matches!(
            clipboard.write("lost"),
            Err(ClipboardError::Access(ref m)) if m.contains("no display")
        ));
        clipboard.write("kept").unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(shared.text.lock().unwrap().as_deref(), Some("kept"));
    }
}
