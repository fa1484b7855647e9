//! Global shortcut — the trigger source — backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive, so it runs on a **dedicated OS thread**
//! ([`HotkeyListener`]). A [`ChordTracker`] inside the callback turns raw key
//! events into one [`HotkeyEvent::Activated`] per chord press.
//!
//! [`forward_activations`] then captures the clipboard text for each
//! activation and hands it to the pipeline as a plain `String`. Tests can skip
//! all of this and push strings into the pipeline's channel directly.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use write_right::hotkey::{parse_chord, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let chord = parse_chord("Ctrl+Alt+L").expect("bad chord");
//! let _listener = HotkeyListener::start(chord, tx);
//!
//! // In your async loop:
//! // while let Some(ev) = rx.recv().await { ... }
//! ```

pub mod chord;
pub mod listener;
pub mod trigger;

pub use chord::{parse_chord, Chord, ChordTracker, Modifiers};
pub use listener::HotkeyListener;
pub use trigger::forward_activations;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The configured chord was pressed.
    Activated,
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a non-modifier key name into an [`rdev::Key`].
///
/// Supports F1–F12, digits, common named keys, and single ASCII letters in
/// either case. Returns `None` for unrecognised names.
///
/// ```
/// use write_right::hotkey::parse_key;
///
/// assert_eq!(parse_key("F9"),     Some(rdev::Key::F9));
/// assert_eq!(parse_key("l"),      Some(rdev::Key::KeyL));
/// assert_eq!(parse_key("7"),      Some(rdev::Key::Num7));
/// assert_eq!(parse_key("xyz"),    None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    use rdev::Key;

    let mut chars = key_str.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return single_char_key(c.to_ascii_uppercase());
    }

    let key = match key_str {
        "F1" => Key::F1,
        "F2" => Key::F2,
        "F3" => Key::F3,
        "F4" => Key::F4,
        "F5" => Key::F5,
        "F6" => Key::F6,
        "F7" => Key::F7,
        "F8" => Key::F8,
        "F9" => Key::F9,
        "F10" => Key::F10,
        "F11" => Key::F11,
        "F12" => Key::F12,
        "Space" => Key::Space,
        "Return" | "Enter" => Key::Return,
        "Tab" => Key::Tab,
        "Escape" | "Esc" => Key::Escape,
        "Insert" => Key::Insert,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "Pause" => Key::Pause,
        _ => return None,
    };
    Some(key)
}

fn single_char_key(c: char) -> Option<rdev::Key> {
    use rdev::Key;

    let key = match c {
        'A' => Key::KeyA,
        'B' => Key::KeyB,
        'C' => Key::KeyC,
        'D' => Key::KeyD,
        'E' => Key::KeyE,
        'F' => Key::KeyF,
        'G' => Key::KeyG,
        'H' => Key::KeyH,
        'I' => Key::KeyI,
        'J' => Key::KeyJ,
        'K' => Key::KeyK,
        'L' => Key::KeyL,
        'M' => Key::KeyM,
        'N' => Key::KeyN,
        'O' => Key::KeyO,
        'P' => Key::KeyP,
        'Q' => Key::KeyQ,
        'R' => Key::KeyR,
        'S' => Key::KeyS,
        'T' => Key::KeyT,
        'U' => Key::KeyU,
        'V' => Key::KeyV,
        'W' => Key::KeyW,
        'X' => Key::KeyX,
        'Y' => Key::KeyY,
        'Z' => Key::KeyZ,
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        _ => return None,
    };
    Some(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_function_keys() {
        assert_eq!(parse_key("F1"), Some(rdev::Key::F1));
        assert_eq!(parse_key("F12"), Some(rdev::Key::F12));
    }

    #[test]
    fn parse_letters_and_digits() {
        assert_eq!(parse_key("L"), Some(rdev::Key::KeyL));
        assert_eq!(parse_key("l"), Some(rdev::Key::KeyL));
        assert_eq!(parse_key("0"), Some(rdev::Key::Num0));
    }

    #[test]
    fn parse_named_keys() {
        assert_eq!(parse_key("Esc"), Some(rdev::Key::Escape));
        assert_eq!(parse_key("Enter"), Some(rdev::Key::Return));
        assert_eq!(parse_key("Space"), Some(rdev::Key::Space));
    }

    #[test]
    fn parse_unknown_key_returns_none() {
        assert_eq!(parse_key("xyz"), None);
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("?"), None);
        assert_eq!(parse_key("Ctrl"), None);
    }
}
