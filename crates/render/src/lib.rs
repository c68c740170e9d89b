//! Rendering: projects entities onto any 2D surface.
//!
//! # Invariants
//! - Rendering reads the store and never changes it.
//! - Draw order is store order; later entities cover earlier ones.
//! - A missing or unloaded sprite sheet skips the affected entity, never the frame.

mod renderer;
mod sheet;
mod surface;

pub use renderer::{Drawable, Fill, RenderStats, render};
pub use sheet::{SheetState, SpriteSheet};
pub use surface::{Cell, CellSurface, DrawCommand, RecordingSurface, SPRITE_GLYPH, Surface};

pub fn crate_info() -> &'static str {
    "canvaswalk-render v0.1.0"
}
