//! Keyboard simulation helpers backed by the `enigo` crate.
//!
//! | Platform       | Copy | Paste |
//! |----------------|------|-------|
//! | macOS          | ⌘C   | ⌘V    |
//! | Windows, Linux | ^C   | ^V    |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::ClipboardError;

#[cfg(target_os = "macos")]
const SHORTCUT_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const SHORTCUT_MODIFIER: Key = Key::Control;

/// Send the platform copy shortcut to the focused window.
pub fn simulate_copy() -> Result<(), ClipboardError> {
    chord('c')
}

/// Send the platform paste shortcut to the focused window.
pub fn simulate_paste() -> Result<(), ClipboardError> {
    chord('v')
}

/// Modifier down, `letter` click, modifier up.
///
/// A new [`Enigo`] is created per call because it is not `Send`.
fn chord(letter: char) -> Result<(), ClipboardError> {
    let mut enigo = Enigo::new(&Settings::default())
        .map_err(|e| ClipboardError::KeySimulation(e.to_string()))?;

    enigo
        .key(SHORTCUT_MODIFIER, Direction::Press)
        .map_err(|e| ClipboardError::KeySimulation(e.to_string()))?;
    let clicked = enigo
        .key(Key::Unicode(letter), Direction::Click)
        .map_err(|e| ClipboardError::KeySimulation(e.to_string()));
    // Release the modifier even if the click failed, or it stays stuck down.
    enigo
        .key(SHORTCUT_MODIFIER, Direction::Release)
        .map_err(|e| ClipboardError::KeySimulation(e.to_string()))?;

    clicked
}
