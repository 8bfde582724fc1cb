//! Keyboard input vocabulary.

use bitflags::bitflags;

/// A key press as delivered by the host.
///
/// `Char` carries printable input only; control keys with editing meaning
/// have their own variants so the dispatcher never sniffs code points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character (including space).
    Char(char),
    /// The return key; inserts a line terminator.
    Return,
    /// The tab key; inserts a tab character.
    Tab,
    /// Delete backward (the classic delete key).
    Backspace,
    /// Delete forward.
    ForwardDelete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Modifier keys held during an event.
    ///
    /// `WORD` (option/alt) switches horizontal movement to word
    /// granularity; `LINE` (command) switches it to line bounds, and turns
    /// vertical movement into document start/end jumps.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0x01;
        const WORD  = 0x02;
        const LINE  = 0x04;
    }
}

impl Modifiers {
    /// Check if shift is held.
    #[must_use]
    pub fn shift(self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Check if the word-granularity modifier is held.
    #[must_use]
    pub fn word(self) -> bool {
        self.contains(Self::WORD)
    }

    /// Check if the line/document-granularity modifier is held.
    #[must_use]
    pub fn line(self) -> bool {
        self.contains(Self::LINE)
    }
}

impl Key {
    /// Check if this key mutates text (as opposed to navigating).
    #[must_use]
    pub fn is_editing(self) -> bool {
        matches!(
            self,
            Self::Char(_) | Self::Return | Self::Tab | Self::Backspace | Self::ForwardDelete
        )
    }

    /// Check if this key moves the selection.
    #[must_use]
    pub fn is_navigation(self) -> bool {
        !self.is_editing()
    }
}
