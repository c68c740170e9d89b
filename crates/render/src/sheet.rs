use canvaswalk_common::Rect;
use serde::{Deserialize, Serialize};

/// Load state of the sprite sheet image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetState {
    Loading,
    Loaded { width: u32, height: u32 },
}

/// The single raster image sprites are cut from.
///
/// The render step only needs to know whether the image is ready and how big
/// it is; pixel data belongs to the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub name: String,
    pub state: SheetState,
}

impl SpriteSheet {
    pub fn loading(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: SheetState::Loading,
        }
    }

    pub fn loaded(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            state: SheetState::Loaded { width, height },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SheetState::Loaded { .. })
    }

    /// Whether `src` lies inside a loaded sheet.
    pub fn contains(&self, src: &Rect) -> bool {
        match self.state {
            SheetState::Loading => false,
            SheetState::Loaded { width, height } => {
                src.x >= 0.0
                    && src.y >= 0.0
                    && src.right() <= width as f32
                    && src.bottom() <= height as f32
            }
        }
    }
}
