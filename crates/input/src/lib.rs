//! Input: a latch of held key codes and the bindings that turn them into actions.
//!
//! # Invariants
//! - The latch stores only the latest pressed/released state per key code.
//! - World logic reads actions through `ActionState`, never raw key codes.

pub mod action;
pub mod latch;

pub use action::{Action, ActionState, BoundInput, KeyBindings};
pub use latch::{KeyCode, InputLatch};

pub fn crate_info() -> &'static str {
    "canvaswalk-input v0.1.0"
}
