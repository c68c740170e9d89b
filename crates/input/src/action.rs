use crate::latch::{InputLatch, KeyCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A semantic action the world logic understands.
///
/// The kernel consumes actions, never raw key codes, so any input device can
/// drive it once its codes are bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Walk the player left.
    MoveLeft,
    /// Walk the player right.
    MoveRight,
    /// End the game loop.
    Abort,
}

/// Read-only view of which actions are active this frame.
pub trait ActionState {
    fn is_active(&self, action: Action) -> bool;
}

/// Mapping from key codes to actions. Several codes may share one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<KeyCode, Action>,
}

impl KeyBindings {
    /// Bindings with no codes mapped.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Bind `code` to `action`, returning the action it was previously bound to.
    pub fn bind(&mut self, code: KeyCode, action: Action) -> Option<Action> {
        self.map.insert(code, action)
    }

    pub fn unbind(&mut self, code: KeyCode) -> Option<Action> {
        self.map.remove(&code)
    }

    pub fn action_for(&self, code: KeyCode) -> Option<Action> {
        self.map.get(&code).copied()
    }

    pub fn codes_for(&self, action: Action) -> impl Iterator<Item = KeyCode> + '_ {
        self.map
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(code, _)| *code)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for KeyBindings {
    /// A/D and the arrow keys walk, Escape aborts.
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind(KeyCode::A, Action::MoveLeft);
        b.bind(KeyCode::ARROW_LEFT, Action::MoveLeft);
        b.bind(KeyCode::D, Action::MoveRight);
        b.bind(KeyCode::ARROW_RIGHT, Action::MoveRight);
        b.bind(KeyCode::ESCAPE, Action::Abort);
        b
    }
}

/// A latch seen through a set of bindings.
///
/// An action is active when any code bound to it is held.
#[derive(Debug, Clone, Copy)]
pub struct BoundInput<'a> {
    pub latch: &'a InputLatch,
    pub bindings: &'a KeyBindings,
}

impl<'a> BoundInput<'a> {
    pub fn new(latch: &'a InputLatch, bindings: &'a KeyBindings) -> Self {
        Self { latch, bindings }
    }
}

impl ActionState for BoundInput<'_> {
    fn is_active(&self, action: Action) -> bool {
        self.bindings
            .codes_for(action)
            .any(|code| self.latch.is_held(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_all_actions() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for(KeyCode::D), Some(Action::MoveRight));
        assert_eq!(b.action_for(KeyCode::ARROW_LEFT), Some(Action::MoveLeft));
        assert_eq!(b.action_for(KeyCode::ESCAPE), Some(Action::Abort));
        assert_eq!(b.codes_for(Action::MoveLeft).count(), 2);
    }

    #[test]
    fn bound_input_reads_any_bound_code() {
        let b = KeyBindings::default();
        let mut latch = InputLatch::new();
        latch.press(KeyCode::ARROW_RIGHT);
        let input = BoundInput::new(&latch, &b);
        assert!(input.is_active(Action::MoveRight));
        assert!(!input.is_active(Action::MoveLeft));
        assert!(!input.is_active(Action::Abort));
    }

    #[test]
    fn unbound_code_has_no_effect() {
        let b = KeyBindings::default();
        let mut latch = InputLatch::new();
        latch.press(KeyCode::SPACE);
        let input = BoundInput::new(&latch, &b);
        assert!(!input.is_active(Action::MoveRight));
        assert!(!input.is_active(Action::MoveLeft));
    }

    #[test]
    fn rebinding_replaces_previous_action() {
        let mut b = KeyBindings::empty();
        assert_eq!(b.bind(KeyCode::SPACE, Action::MoveLeft), None);
        assert_eq!(b.bind(KeyCode::SPACE, Action::Abort), Some(Action::MoveLeft));
        assert_eq!(b.unbind(KeyCode::SPACE), Some(Action::Abort));
        assert!(b.is_empty());
    }

    #[test]
    fn bindings_round_trip_through_json() {
        let json = r#"{"27":"abort","87":"move_right"}"#;
        let b: KeyBindings = serde_json::from_str(json).unwrap();
        assert_eq!(b.action_for(KeyCode(87)), Some(Action::MoveRight));
        assert_eq!(b.action_for(KeyCode::ESCAPE), Some(Action::Abort));
    }
}
