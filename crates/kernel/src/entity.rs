use crate::error::KernelError;
use canvaswalk_common::{Color, Direction, EntityId, Position};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Walk speed given to records that do not set one.
pub const DEFAULT_WALK_SPEED: f32 = 5.0;

fn default_walk_speed() -> f32 {
    DEFAULT_WALK_SPEED
}

/// Where an entity's image sits on the sprite sheet.
///
/// Serialised untagged: `[x, y]` for a fixed offset, or
/// `{"left": [x, y], "right": [x, y]}` for a facing-dependent one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpriteOffset {
    Fixed(Vec2),
    ByDirection { left: Vec2, right: Vec2 },
}

impl SpriteOffset {
    pub fn offset_for(&self, facing: Direction) -> Vec2 {
        match (self, facing) {
            (Self::Fixed(offset), _) => *offset,
            (Self::ByDirection { left, .. }, Direction::Left) => *left,
            (Self::ByDirection { right, .. }, Direction::Right) => *right,
        }
    }
}

/// A drawable, movable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    /// Position at the start of the last frame. Absent reads as `Position::ZERO`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_position: Option<Position>,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default)]
    pub color: Color,
    /// `None` draws a flat colour fill; `Some` blits from the sprite sheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteOffset>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            previous_position: None,
            walk_speed: DEFAULT_WALK_SPEED,
            color: Color::default(),
            sprite: None,
        }
    }

    pub fn with_walk_speed(mut self, walk_speed: f32) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    pub fn with_color(mut self, color: impl Into<Color>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteOffset) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn previous_or_zero(&self) -> Position {
        self.previous_position.unwrap_or(Position::ZERO)
    }

    /// Last-frame displacement of the top-left corner.
    pub fn velocity(&self) -> Vec2 {
        velocity_of(self)
    }

    pub fn speed(&self) -> f32 {
        speed_of(self.velocity())
    }

    /// Facing implied by the last frame's horizontal movement, if any.
    pub fn facing(&self) -> Option<Direction> {
        Direction::from_dx(self.velocity().x)
    }

    /// Copy with `previous_position` set to the current position.
    pub fn snapshot(&self) -> Self {
        Self {
            previous_position: Some(self.position),
            ..self.clone()
        }
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            position: self.position.translate(delta),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), KernelError> {
        if !self.position.is_well_formed() {
            return Err(KernelError::MalformedPosition(self.id.clone()));
        }
        if !self.walk_speed.is_finite() || self.walk_speed < 0.0 {
            return Err(KernelError::InvalidWalkSpeed {
                id: self.id.clone(),
                speed: self.walk_speed,
            });
        }
        Ok(())
    }
}

/// Top-left row of `position - previous_position`, previous defaulting to zero.
pub fn velocity_of(entity: &Entity) -> Vec2 {
    (entity.position - entity.previous_or_zero()).top_left
}

pub fn speed_of(velocity: Vec2) -> f32 {
    velocity.length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Position {
        Position::from_xywh(x, y, 40.0, 40.0).unwrap()
    }

    #[test]
    fn velocity_defaults_previous_to_origin() {
        let e = Entity::new("player", at(0.0, 0.0));
        assert_eq!(e.velocity(), Vec2::ZERO);
        assert_eq!(e.speed(), 0.0);

        let far = Entity::new("second", at(3.0, 4.0));
        assert_eq!(far.speed(), 5.0);
    }

    #[test]
    fn velocity_runs_previous_to_current() {
        let e = Entity::new("player", at(0.0, 0.0))
            .snapshot()
            .translated(Vec2::new(-2.0, 0.0));
        assert_eq!(e.velocity(), Vec2::new(-2.0, 0.0));
        assert_eq!(e.facing(), Some(Direction::Left));
        assert_eq!(e.speed(), 2.0);
    }

    #[test]
    fn snapshot_resets_velocity() {
        let e = Entity::new("player", at(0.0, 0.0))
            .snapshot()
            .translated(Vec2::new(4.0, 0.0))
            .snapshot();
        assert_eq!(e.velocity(), Vec2::ZERO);
        assert_eq!(e.facing(), None);
    }

    #[test]
    fn sprite_offset_by_direction() {
        let s = SpriteOffset::ByDirection {
            left: Vec2::new(0.0, 40.0),
            right: Vec2::new(40.0, 40.0),
        };
        assert_eq!(s.offset_for(Direction::Left), Vec2::new(0.0, 40.0));
        assert_eq!(s.offset_for(Direction::Right), Vec2::new(40.0, 40.0));
        let f = SpriteOffset::Fixed(Vec2::new(0.0, 80.0));
        assert_eq!(f.offset_for(Direction::Left), Vec2::new(0.0, 80.0));
    }

    #[test]
    fn validate_rejects_negative_walk_speed() {
        let e = Entity::new("player", at(0.0, 0.0)).with_walk_speed(-1.0);
        assert!(matches!(
            e.validate(),
            Err(KernelError::InvalidWalkSpeed { .. })
        ));
        assert!(e.with_walk_speed(0.0).validate().is_ok());
    }

    #[test]
    fn record_defaults_when_parsed() {
        let e: Entity = serde_json::from_str(
            r#"{"id":"player","position":[[0,0],[40,40]],"color":"green","sprite":[0,80]}"#,
        )
        .unwrap();
        assert_eq!(e.walk_speed, DEFAULT_WALK_SPEED);
        assert_eq!(e.previous_position, None);
        assert_eq!(e.sprite, Some(SpriteOffset::Fixed(Vec2::new(0.0, 80.0))));

        let keyed: Entity = serde_json::from_str(
            r#"{"id":"p","position":[[0,0],[1,1]],"sprite":{"left":[0,0],"right":[1,0]}}"#,
        )
        .unwrap();
        assert!(matches!(keyed.sprite, Some(SpriteOffset::ByDirection { .. })));
    }
}
