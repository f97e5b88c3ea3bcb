//! # Key Events
//!
//! Platform-neutral key event delivered by the host to the bridge.
//!
//! The host resolves the Unicode value against the current meta state before
//! handing the event over, so the bridge never consults a key map itself.

/// Sentinel meaning "no character".
///
/// A key-down without a printable character carries this value, and polling
/// an empty queue returns it as well.
pub const NO_CHAR: u32 = 0;

/// Flag set on a resolved value when the key produced a combining accent
/// (dead key) instead of a printable character.
pub const COMBINING_ACCENT: u32 = 0x8000_0000;

/// Mask that strips [`COMBINING_ACCENT`] from a resolved value.
pub const COMBINING_ACCENT_MASK: u32 = 0x7FFF_FFFF;

/// Action carried by a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// The key was pressed.
    Down,
    /// The key was released.
    Up,
    /// A repeated or multi-character event.
    Multiple,
    /// Any action code the bridge does not know about.
    Other(i32),
}

impl KeyAction {
    /// Maps a raw platform action code (`KeyEvent.ACTION_*` on Android).
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Down,
            1 => Self::Up,
            2 => Self::Multiple,
            other => Self::Other(other),
        }
    }

    /// Returns the raw platform action code.
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::Multiple => 2,
            Self::Other(raw) => raw,
        }
    }
}

/// A key event as seen by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// What happened to the key.
    pub action: KeyAction,
    /// Platform key code, kept for the host's default handling path.
    pub key_code: i32,
    /// Modifier state the Unicode value was resolved against.
    pub meta_state: u32,
    /// Resolved Unicode value, [`NO_CHAR`] when the key has none.
    pub unicode_char: u32,
}

impl KeyEvent {
    /// Creates an event with no key code or meta state.
    pub fn new(action: KeyAction, unicode_char: u32) -> Self {
        Self {
            action,
            key_code: 0,
            meta_state: 0,
            unicode_char,
        }
    }

    /// Shorthand for a key-down event.
    pub fn down(unicode_char: u32) -> Self {
        Self::new(KeyAction::Down, unicode_char)
    }

    /// Shorthand for a key-up event.
    pub fn up(unicode_char: u32) -> Self {
        Self::new(KeyAction::Up, unicode_char)
    }

    /// Sets the platform key code.
    pub fn with_key_code(mut self, key_code: i32) -> Self {
        self.key_code = key_code;
        self
    }

    /// Sets the meta state.
    pub fn with_meta_state(mut self, meta_state: u32) -> Self {
        self.meta_state = meta_state;
        self
    }

    /// Whether this is a key-down event.
    pub fn is_down(&self) -> bool {
        self.action == KeyAction::Down
    }
}

/// Whether a resolved value marks a combining accent.
pub fn is_combining_accent(code_point: u32) -> bool {
    code_point & COMBINING_ACCENT != 0
}

/// Decodes a polled value into a `char`.
///
/// Returns `None` for [`NO_CHAR`], for invalid scalar values, and for
/// combining accents, which callers should inspect with
/// [`is_combining_accent`] first.
pub fn decode_char(code_point: u32) -> Option<char> {
    if code_point == NO_CHAR || is_combining_accent(code_point) {
        return None;
    }
    char::from_u32(code_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_raw_codes() {
        assert_eq!(KeyAction::from_raw(0), KeyAction::Down);
        assert_eq!(KeyAction::from_raw(1), KeyAction::Up);
        assert_eq!(KeyAction::from_raw(2), KeyAction::Multiple);
        assert_eq!(KeyAction::from_raw(7), KeyAction::Other(7));
        assert_eq!(KeyAction::Other(-3).to_raw(), -3);
        assert_eq!(KeyAction::Up.to_raw(), 1);
    }

    #[test]
    fn test_event_builders() {
        let event = KeyEvent::down('a' as u32)
            .with_key_code(29)
            .with_meta_state(1);
        assert!(event.is_down());
        assert_eq!(event.key_code, 29);
        assert_eq!(event.meta_state, 1);
        assert!(!KeyEvent::up('a' as u32).is_down());
    }

    #[test]
    fn test_decode_char() {
        assert_eq!(decode_char('H' as u32), Some('H'));
        assert_eq!(decode_char(NO_CHAR), None);
        assert_eq!(decode_char(0xD800), None);

        let accent = COMBINING_ACCENT | 0x0301;
        assert!(is_combining_accent(accent));
        assert_eq!(decode_char(accent), None);
        assert_eq!(accent & COMBINING_ACCENT_MASK, 0x0301);
    }
}
