use canvaswalk_common::EntityId;

/// Errors from store operations and the update step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// The update step requires an entity with the configured player id.
    #[error("player entity {0:?} is missing from the store")]
    PlayerNotFound(EntityId),
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
    #[error("entity id {0:?} appears more than once")]
    DuplicateId(EntityId),
    #[error("replacement for {expected:?} carries id {found:?}")]
    IdMismatch { expected: EntityId, found: EntityId },
    #[error("entity {id:?} has invalid walk speed {speed}")]
    InvalidWalkSpeed { id: EntityId, speed: f32 },
    #[error("entity {0:?} has a malformed position")]
    MalformedPosition(EntityId),
}
