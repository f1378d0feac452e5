//! Key event types produced by the decoder.

use bitflags::bitflags;

/// Key codes for keyboard input.
///
/// `Char` carries a raw byte (the engine is byte/column based); every
/// multi-byte escape sequence resolves to one of the named keys or to
/// `Esc` when it cannot be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A literal byte.
    Char(u8),
    /// Enter/Return key.
    Enter,
    /// Tab key.
    Tab,
    /// Backspace key (byte 127).
    Backspace,
    /// Escape key, or any unrecognized escape sequence.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Delete key.
    Delete,
}

bitflags! {
    /// Key modifiers.
    ///
    /// Raw byte streams only betray the control key (bytes 1-26), so that
    /// is the whole set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMods: u8 {
        /// Control key held.
        const CTRL = 0b0000_0001;
    }
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers held during the press.
    pub mods: KeyMods,
}

impl KeyEvent {
    /// A key press with no modifiers.
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyMods::empty(),
        }
    }

    /// A control-key press for the given letter (lowercase).
    pub const fn ctrl(letter: u8) -> Self {
        Self {
            code: KeyCode::Char(letter),
            mods: KeyMods::CTRL,
        }
    }

    /// Check whether this event is Ctrl+`letter`.
    pub fn is_ctrl(&self, letter: u8) -> bool {
        self.mods.contains(KeyMods::CTRL) && self.code == KeyCode::Char(letter)
    }
}
