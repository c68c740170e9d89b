//! Shared value types for canvaswalk.
//!
//! # Invariants
//! - All types here are plain values: copying or cloning never aliases state.
//! - A `Position` built through its constructors always has non-negative size.

pub mod position;
pub mod types;

pub use position::{CommonError, Position};
pub use types::{Color, Direction, EntityId, Rect};

pub fn crate_info() -> &'static str {
    "canvaswalk-common v0.1.0"
}
