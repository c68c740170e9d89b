use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Errors from building value types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommonError {
    #[error("bottom-right corner {bottom_right:?} lies above or left of top-left {top_left:?}")]
    InvertedCorners { top_left: Vec2, bottom_right: Vec2 },
    #[error("size {0:?} has a negative component")]
    NegativeSize(Vec2),
}

/// Bounding box of an entity as a pair of corner points.
///
/// The pair doubles as the unit of translation: adding a position whose two
/// corners are the same vector moves the box by that vector. Serialised as
/// `[[x0, y0], [x1, y1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "[Vec2; 2]", into = "[Vec2; 2]")]
pub struct Position {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
}

impl Position {
    /// Zero-sized box at the origin.
    pub const ZERO: Self = Self {
        top_left: Vec2::ZERO,
        bottom_right: Vec2::ZERO,
    };

    /// Build a well-formed box from its corners.
    pub fn new(top_left: Vec2, bottom_right: Vec2) -> Result<Self, CommonError> {
        if !bottom_right.cmpge(top_left).all() {
            return Err(CommonError::InvertedCorners {
                top_left,
                bottom_right,
            });
        }
        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    /// Build a box from its top-left corner and size.
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Result<Self, CommonError> {
        let size = Vec2::new(w, h);
        if !size.cmpge(Vec2::ZERO).all() {
            return Err(CommonError::NegativeSize(size));
        }
        let top_left = Vec2::new(x, y);
        Ok(Self {
            top_left,
            bottom_right: top_left + size,
        })
    }

    /// Both corners set to `delta`; adding it translates by `delta`.
    pub fn splat(delta: Vec2) -> Self {
        Self {
            top_left: delta,
            bottom_right: delta,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.bottom_right.cmpge(self.top_left).all()
    }

    pub fn width(&self) -> f32 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.bottom_right.y - self.top_left.y
    }

    pub fn size(&self) -> Vec2 {
        self.bottom_right - self.top_left
    }

    pub fn origin(&self) -> Vec2 {
        self.top_left
    }

    /// Shift both corners by `delta`.
    pub fn translate(&self, delta: Vec2) -> Self {
        *self + Self::splat(delta)
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            top_left: self.top_left + rhs.top_left,
            bottom_right: self.bottom_right + rhs.bottom_right,
        }
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            top_left: self.top_left - rhs.top_left,
            bottom_right: self.bottom_right - rhs.bottom_right,
        }
    }
}

impl TryFrom<[Vec2; 2]> for Position {
    type Error = CommonError;

    fn try_from([top_left, bottom_right]: [Vec2; 2]) -> Result<Self, CommonError> {
        Self::new(top_left, bottom_right)
    }
}

impl From<Position> for [Vec2; 2] {
    fn from(p: Position) -> Self {
        [p.top_left, p.bottom_right]
    }
}
