use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fill colour by name, as a 2D canvas would accept it (`"green"`, `"red"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character of the colour name, used by character-cell surfaces.
    pub fn initial(&self) -> char {
        self.0.chars().next().unwrap_or('?')
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black")
    }
}

impl From<&str> for Color {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Horizontal facing of an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Facing implied by a horizontal displacement. Zero gives `None`.
    pub fn from_dx(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Axis-aligned pixel rectangle: origin plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display_and_eq() {
        let a = EntityId::from("player");
        let b = EntityId::new(String::from("player"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "player");
    }

    #[test]
    fn direction_defaults_right() {
        assert_eq!(Direction::default(), Direction::Right);
        assert_eq!(Direction::from_dx(0.0), None);
        assert_eq!(Direction::from_dx(-1.0), Some(Direction::Left));
        assert_eq!(Direction::from_dx(0.5), Some(Direction::Right));
    }

    #[test]
    fn color_initial() {
        assert_eq!(Color::from("green").initial(), 'g');
        assert_eq!(Color::new("").initial(), '?');
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 5.0, 8.0);
        assert_eq!(r.right(), 15.0);
        assert_eq!(r.bottom(), 28.0);
    }
}
