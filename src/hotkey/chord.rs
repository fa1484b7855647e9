//! Modifier + key chords and the press tracker that recognises them.

use rdev::{EventType, Key};

use super::parse_key;

// ---------------------------------------------------------------------------
// Modifiers / Chord
// ---------------------------------------------------------------------------

/// Which modifier families must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

/// A global shortcut: an exact modifier set plus one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub key: Key,
}

/// Parse `"Ctrl+Alt+L"`-style chords.
///
/// Modifier names (case-insensitive): `Ctrl`/`Control`, `Alt`/`Option`,
/// `Shift`, `Meta`/`Cmd`/`Command`/`Super`/`Win`, and
/// `CommandOrControl`/`CmdOrCtrl` (⌘ on macOS, Ctrl elsewhere). Exactly one
/// non-modifier key is required.
///
/// ```
/// use write_right::hotkey::parse_chord;
///
/// let chord = parse_chord("Ctrl+Alt+L").unwrap();
/// assert!(chord.modifiers.ctrl && chord.modifiers.alt);
/// assert_eq!(chord.key, rdev::Key::KeyL);
///
/// assert!(parse_chord("Ctrl+Alt").is_none());
/// assert!(parse_chord("Ctrl+A+L").is_none());
/// ```
pub fn parse_chord(input: &str) -> Option<Chord> {
    let mut modifiers = Modifiers::default();
    let mut key = None;

    for token in input.split('+').map(str::trim) {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "alt" | "option" => modifiers.alt = true,
            "shift" => modifiers.shift = true,
            "meta" | "cmd" | "command" | "super" | "win" => modifiers.meta = true,
            "commandorcontrol" | "cmdorctrl" => {
                if cfg!(target_os = "macos") {
                    modifiers.meta = true;
                } else {
                    modifiers.ctrl = true;
                }
            }
            _ => {
                if key.is_some() {
                    return None;
                }
                key = Some(parse_key(token)?);
            }
        }
    }

    key.map(|key| Chord { modifiers, key })
}

// ---------------------------------------------------------------------------
// ChordTracker
// ---------------------------------------------------------------------------

/// Feeds on raw key events and reports each press of a [`Chord`].
///
/// Left and right modifier keys are tracked separately; the chord matches
/// only when the held modifier families equal the chord's exactly. OS key
/// auto-repeat does not re-fire until the key is released.
#[derive(Debug, Clone)]
pub struct ChordTracker {
    chord: Chord,
    held: Vec<Key>,
    key_down: bool,
}

impl ChordTracker {
    pub fn new(chord: Chord) -> Self {
        Self {
            chord,
            held: Vec::with_capacity(4),
            key_down: false,
        }
    }

    /// Observe one event; `true` means the chord was just activated.
    pub fn observe(&mut self, event: &EventType) -> bool {
        match *event {
            EventType::KeyPress(k) if is_modifier(k) => {
                if !self.held.contains(&k) {
                    self.held.push(k);
                }
                false
            }
            EventType::KeyRelease(k) if is_modifier(k) => {
                self.held.retain(|h| *h != k);
                false
            }
            EventType::KeyPress(k) if k == self.chord.key => {
                if self.key_down {
                    return false;
                }
                self.key_down = true;
                self.held_modifiers() == self.chord.modifiers
            }
            EventType::KeyRelease(k) if k == self.chord.key => {
                self.key_down = false;
                false
            }
            _ => false,
        }
    }

    fn held_modifiers(&self) -> Modifiers {
        let mut m = Modifiers::default();
        for key in &self.held {
            match key {
                Key::ControlLeft | Key::ControlRight => m.ctrl = true,
                Key::Alt | Key::AltGr => m.alt = true,
                Key::ShiftLeft | Key::ShiftRight => m.shift = true,
                Key::MetaLeft | Key::MetaRight => m.meta = true,
                _ => {}
            }
        }
        m
    }
}

fn is_modifier(key: Key) -> bool {
    matches!(
        key,
        Key::ControlLeft
            | Key::ControlRight
            | Key::Alt
            | Key::AltGr
            | Key::ShiftLeft
            | Key::ShiftRight
            | Key::MetaLeft
            | Key::MetaRight
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
