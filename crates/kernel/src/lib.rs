//! Kernel: the entity store and the per-frame update step.
//!
//! # Invariants
//! - The update step never mutates the store it is given; it returns a new one.
//! - Store order is insertion order and survives every update.
//! - Entity ids are unique within a store.
//! - A missing player is a fatal error, never a silent skip.

pub mod entity;
pub mod error;
pub mod step;
pub mod store;

pub use entity::{Entity, SpriteOffset, speed_of, velocity_of};
pub use error::KernelError;
pub use step::{StepOutcome, Tuning, update, walk_step};
pub use store::EntityStore;

pub fn crate_info() -> &'static str {
    "canvaswalk-kernel v0.1.0"
}
