use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Numeric key code, numbered like a browser `KeyboardEvent.keyCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ESCAPE: Self = Self(27);
    pub const SPACE: Self = Self(32);
    pub const ARROW_LEFT: Self = Self(37);
    pub const ARROW_UP: Self = Self(38);
    pub const ARROW_RIGHT: Self = Self(39);
    pub const ARROW_DOWN: Self = Self(40);
    pub const A: Self = Self(65);
    pub const D: Self = Self(68);

    /// Code for an ASCII letter or digit, case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            Some(Self(c as u32))
        } else {
            None
        }
    }
}

/// Tracks which key codes are currently held.
///
/// Press and release are plain state flips: no debouncing, no history.
/// Codes that were never pressed read as not held.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    down: BTreeSet<KeyCode>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: KeyCode) {
        if self.down.insert(code) {
            tracing::trace!(code = code.0, "key pressed");
        }
    }

    pub fn release(&mut self, code: KeyCode) {
        if self.down.remove(&code) {
            tracing::trace!(code = code.0, "key released");
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.down.contains(&code)
    }

    /// Forget every held key (e.g. when the host loses focus).
    pub fn reset_all(&mut self) {
        self.down.clear();
    }

    /// Held codes in ascending order.
    pub fn held(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.down.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_is_not_held() {
        let latch = InputLatch::new();
        assert!(!latch.is_held(KeyCode(999)));
    }

    #[test]
    fn press_then_release() {
        let mut latch = InputLatch::new();
        latch.press(KeyCode::D);
        assert!(latch.is_held(KeyCode::D));
        latch.release(KeyCode::D);
        assert!(!latch.is_held(KeyCode::D));
    }

    #[test]
    fn repeated_press_needs_single_release() {
        let mut latch = InputLatch::new();
        latch.press(KeyCode::A);
        latch.press(KeyCode::A);
        latch.release(KeyCode::A);
        assert!(!latch.is_held(KeyCode::A));
    }

    #[test]
    fn release_without_press_is_harmless() {
        let mut latch = InputLatch::new();
        latch.release(KeyCode::ESCAPE);
        assert_eq!(latch.held().count(), 0);
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut latch = InputLatch::new();
        latch.press(KeyCode::A);
        latch.press(KeyCode::D);
        latch.press(KeyCode::ESCAPE);
        latch.reset_all();
        assert_eq!(latch.held().count(), 0);
        assert!(!latch.is_held(KeyCode::ESCAPE));
    }

    #[test]
    fn from_char_matches_browser_codes() {
        assert_eq!(KeyCode::from_char('a'), Some(KeyCode::A));
        assert_eq!(KeyCode::from_char('D'), Some(KeyCode::D));
        assert_eq!(KeyCode::from_char('7'), Some(KeyCode(55)));
        assert_eq!(KeyCode::from_char('-'), None);
    }
}
