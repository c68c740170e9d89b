use crate::entity::Entity;
use crate::error::KernelError;
use crate::store::EntityStore;
use canvaswalk_common::EntityId;
use canvaswalk_input::{Action, ActionState};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Movement constants for the update step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Speed gained per frame while walking, up to the entity's walk speed.
    pub acceleration: f32,
    /// Id of the entity the movement actions drive.
    pub player_id: EntityId,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            acceleration: 0.5,
            player_id: EntityId::from("player"),
        }
    }
}

/// Result of one update step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The loop continues with this store.
    Running(EntityStore),
    /// The abort action was active; no further frames should run.
    Halted,
}

impl StepOutcome {
    pub fn is_halted(&self) -> bool {
        matches!(self, Self::Halted)
    }
}

/// Advance the store by one frame.
///
/// `elapsed` is the frame time as a fraction of the nominal frame interval.
/// The input store is left untouched. Every entity's previous position is
/// set to its current one; the player then walks if a movement action is
/// active. With both directions held, right is applied first and left
/// overrides it.
pub fn update(
    store: &EntityStore,
    input: &impl ActionState,
    elapsed: f32,
    tuning: &Tuning,
) -> Result<StepOutcome, KernelError> {
    if input.is_active(Action::Abort) {
        tracing::info!("abort requested, halting");
        return Ok(StepOutcome::Halted);
    }

    let id = &tuning.player_id;
    let player = store
        .find_by_id(id)
        .ok_or_else(|| KernelError::PlayerNotFound(id.clone()))?;

    // Velocity must be read before the snapshot below erases it.
    let step = walk_step(player, tuning.acceleration);

    let next = store.map_entities(Entity::snapshot);
    let current = next
        .find_by_id(id)
        .ok_or_else(|| KernelError::PlayerNotFound(id.clone()))?;

    let mut walked = None;
    if input.is_active(Action::MoveRight) {
        walked = Some(current.translated(Vec2::new(step * elapsed, 0.0)));
    }
    if input.is_active(Action::MoveLeft) {
        walked = Some(current.translated(Vec2::new(-step * elapsed, 0.0)));
    }

    let Some(walked) = walked else {
        return Ok(StepOutcome::Running(next));
    };
    tracing::trace!(
        player = %id,
        step,
        x = walked.position.origin().x,
        "player walked"
    );
    Ok(StepOutcome::Running(next.replace(id, walked)?))
}

/// Distance per nominal frame: last frame's speed plus one acceleration
/// increment, never above the entity's walk speed.
pub fn walk_step(entity: &Entity, acceleration: f32) -> f32 {
    (entity.speed() + acceleration).min(entity.walk_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvaswalk_common::Position;
    use std::collections::BTreeSet;

    /// Fixed set of active actions.
    #[derive(Default)]
    struct Held(BTreeSet<Action>);

    impl Held {
        fn of(actions: &[Action]) -> Self {
            Self(actions.iter().copied().collect())
        }
    }

    impl ActionState for Held {
        fn is_active(&self, action: Action) -> bool {
            self.0.contains(&action)
        }
    }

    fn demo_store() -> EntityStore {
        EntityStore::new([
            Entity::new("player", Position::from_xywh(0.0, 0.0, 40.0, 40.0).unwrap())
                .with_walk_speed(5.0)
                .with_color("green"),
            Entity::new(
                "second",
                Position::from_xywh(100.0, 100.0, 40.0, 40.0).unwrap(),
            )
            .with_color("red"),
        ])
        .unwrap()
    }

    fn running(outcome: StepOutcome) -> EntityStore {
        match outcome {
            StepOutcome::Running(store) => store,
            StepOutcome::Halted => panic!("unexpected halt"),
        }
    }

    fn player(store: &EntityStore) -> &Entity {
        store.find_by_id(&EntityId::from("player")).unwrap()
    }

    #[test]
    fn abort_halts_regardless_of_other_keys() {
        let store = demo_store();
        let input = Held::of(&[Action::Abort, Action::MoveRight, Action::MoveLeft]);
        let outcome = update(&store, &input, 1.0, &Tuning::default()).unwrap();
        assert!(outcome.is_halted());
    }

    #[test]
    fn abort_halts_even_without_player() {
        let store = EntityStore::default();
        let outcome = update(&store, &Held::of(&[Action::Abort]), 1.0, &Tuning::default());
        assert!(outcome.unwrap().is_halted());
    }

    #[test]
    fn missing_player_is_fatal() {
        let store = EntityStore::new([Entity::new("second", Position::ZERO)]).unwrap();
        let err = update(&store, &Held::default(), 1.0, &Tuning::default()).unwrap_err();
        assert_eq!(err, KernelError::PlayerNotFound(EntityId::from("player")));
    }

    #[test]
    fn idle_frame_keeps_position_and_snapshots_previous() {
        let store = demo_store();
        let next = running(update(&store, &Held::default(), 1.0, &Tuning::default()).unwrap());
        for (before, after) in store.iter().zip(next.iter()) {
            assert_eq!(after.position, before.position);
            assert_eq!(after.previous_position, Some(before.position));
        }
        // The caller's store still has no snapshot.
        assert_eq!(player(&store).previous_position, None);
    }

    #[test]
    fn walking_right_from_rest_is_clamped() {
        let store = demo_store();
        let next = running(
            update(&store, &Held::of(&[Action::MoveRight]), 1.0, &Tuning::default()).unwrap(),
        );
        let p = player(&next);
        assert!(p.position.origin().x > 0.0);
        assert!(p.speed() <= p.walk_speed);
    }

    #[test]
    fn three_frames_accelerate_by_half_steps() {
        let mut store = demo_store();
        let right = Held::of(&[Action::MoveRight]);
        let mut xs = Vec::new();
        for _ in 0..3 {
            store = running(update(&store, &right, 1.0, &Tuning::default()).unwrap());
            xs.push(player(&store).position.origin().x);
        }
        assert_eq!(xs, [0.5, 1.5, 3.0]);
        assert_eq!(player(&store).position.width(), 40.0);
    }

    #[test]
    fn step_plateaus_at_walk_speed() {
        let mut store = demo_store();
        let right = Held::of(&[Action::MoveRight]);
        let mut last_x = 0.0;
        let mut increments = Vec::new();
        for _ in 0..15 {
            store = running(update(&store, &right, 1.0, &Tuning::default()).unwrap());
            let x = player(&store).position.origin().x;
            increments.push(x - last_x);
            last_x = x;
        }
        assert!(increments.windows(2).all(|w| w[1] >= w[0]));
        assert!(increments.iter().all(|d| *d <= 5.0));
        assert_eq!(increments[9], 5.0);
        assert_eq!(increments[14], 5.0);
    }

    #[test]
    fn walking_left_moves_negative() {
        let store = demo_store();
        let next = running(
            update(&store, &Held::of(&[Action::MoveLeft]), 1.0, &Tuning::default()).unwrap(),
        );
        assert_eq!(player(&next).position.origin().x, -0.5);
    }

    #[test]
    fn left_wins_when_both_held() {
        let store = demo_store();
        let both = Held::of(&[Action::MoveLeft, Action::MoveRight]);
        let next = running(update(&store, &both, 1.0, &Tuning::default()).unwrap());
        assert_eq!(player(&next).position.origin().x, -0.5);
    }

    #[test]
    fn elapsed_scales_displacement() {
        let store = demo_store();
        let right = Held::of(&[Action::MoveRight]);
        let next = running(update(&store, &right, 2.0, &Tuning::default()).unwrap());
        assert_eq!(player(&next).position.origin().x, 1.0);
    }

    #[test]
    fn zero_walk_speed_never_moves() {
        let store = EntityStore::new([Entity::new("player", Position::ZERO).with_walk_speed(0.0)])
            .unwrap();
        let next = running(
            update(&store, &Held::of(&[Action::MoveRight]), 1.0, &Tuning::default()).unwrap(),
        );
        assert_eq!(player(&next).position, Position::ZERO);
    }

    #[test]
    fn other_entities_are_not_moved() {
        let store = demo_store();
        let next = running(
            update(&store, &Held::of(&[Action::MoveRight]), 1.0, &Tuning::default()).unwrap(),
        );
        let second = next.find_by_id(&EntityId::from("second")).unwrap();
        assert_eq!(second.position.origin(), Vec2::new(100.0, 100.0));
        let ids: Vec<&str> = next.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["player", "second"]);
    }

    #[test]
    fn custom_player_id() {
        let store = demo_store();
        let tuning = Tuning {
            player_id: EntityId::from("second"),
            ..Tuning::default()
        };
        let next = running(update(&store, &Held::of(&[Action::MoveRight]), 1.0, &tuning).unwrap());
        let second = next.find_by_id(&EntityId::from("second")).unwrap();
        // Far from the origin with no previous position: starts at walk speed.
        assert_eq!(second.position.origin().x, 105.0);
        assert_eq!(player(&next).position.origin().x, 0.0);
    }
}
