use crate::error::DriverError;
use canvaswalk_common::Position;
use canvaswalk_input::KeyBindings;
use canvaswalk_kernel::{Entity, EntityStore, SpriteOffset, Tuning};
use canvaswalk_render::SpriteSheet;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Everything needed to start a game: rate, input mapping, movement tuning,
/// sprite sheet and the initial entity records in draw order.
///
/// Missing fields fall back to the built-in two-entity demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fps: f32,
    pub bindings: KeyBindings,
    pub tuning: Tuning,
    pub sheet: Option<SpriteSheet>,
    pub entities: Vec<Entity>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            bindings: KeyBindings::default(),
            tuning: Tuning::default(),
            sheet: Some(SpriteSheet::loaded("images/spritesheet.png", 120, 120)),
            entities: demo_entities(),
        }
    }
}

fn demo_entities() -> Vec<Entity> {
    let player = Position {
        top_left: Vec2::ZERO,
        bottom_right: Vec2::new(40.0, 40.0),
    };
    let second = Position {
        top_left: Vec2::new(100.0, 100.0),
        bottom_right: Vec2::new(140.0, 140.0),
    };
    vec![
        Entity::new("player", player)
            .with_walk_speed(5.0)
            .with_color("green")
            .with_sprite(SpriteOffset::Fixed(Vec2::new(0.0, 80.0))),
        Entity::new("second", second)
            .with_walk_speed(5.0)
            .with_color("red")
            .with_sprite(SpriteOffset::Fixed(Vec2::new(0.0, 40.0))),
    ]
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, DriverError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DriverError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            entities = config.entities.len(),
            "config loaded"
        );
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, DriverError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn frame_interval(&self) -> Result<Duration, DriverError> {
        crate::timing::frame_interval(self.fps).ok_or_else(|| {
            DriverError::InvalidConfig(format!(
                "fps must be positive with a representable frame interval, got {}",
                self.fps
            ))
        })
    }

    /// Check the rate, every entity record, id uniqueness and the player.
    pub fn validate(&self) -> Result<(), DriverError> {
        self.initial_store().map(|_| ())
    }

    /// Build the starting store, validating the whole config on the way.
    pub fn initial_store(&self) -> Result<EntityStore, DriverError> {
        self.frame_interval()?;
        if !self.tuning.acceleration.is_finite() || self.tuning.acceleration < 0.0 {
            return Err(DriverError::InvalidConfig(format!(
                "acceleration must be non-negative, got {}",
                self.tuning.acceleration
            )));
        }
        let store = EntityStore::new(self.entities.iter().cloned())?;
        if store.find_by_id(&self.tuning.player_id).is_none() {
            return Err(DriverError::InvalidConfig(format!(
                "no entity with player id {:?}",
                self.tuning.player_id.as_str()
            )));
        }
        Ok(store)
    }
}
