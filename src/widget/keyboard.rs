//! Keyboard contract of the text input.

/// Keys the widget distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// A key press on the text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Shift held. Shift+Enter inserts a line break instead of sending.
    pub shift: bool,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    #[must_use]
    pub fn with_shift(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Whether this press sends the current input.
    #[must_use]
    pub fn is_submit(&self) -> bool {
        self.key == Key::Enter && !self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_plain_enter_submits() {
        assert!(KeyPress::new(Key::Enter).is_submit());
        assert!(!KeyPress::with_shift(Key::Enter).is_submit());
        assert!(!KeyPress::new(Key::Char('a')).is_submit());
        assert!(!KeyPress::new(Key::Other).is_submit());
    }
}
