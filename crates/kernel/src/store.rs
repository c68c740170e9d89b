use crate::entity::Entity;
use crate::error::KernelError;
use canvaswalk_common::EntityId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ordered, immutable-by-convention sequence of entities.
///
/// Operations that change the store return a new one. `Clone` is shallow:
/// the new sequence shares the entity allocations of the old one.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Arc<Entity>>,
}

impl EntityStore {
    /// Build a store in the given order, validating every record.
    pub fn new(entities: impl IntoIterator<Item = Entity>) -> Result<Self, KernelError> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for entity in entities {
            entity.validate()?;
            if !seen.insert(entity.id.clone()) {
                return Err(KernelError::DuplicateId(entity.id));
            }
            out.push(Arc::new(entity));
        }
        Ok(Self { entities: out })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().map(|e| e.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> + '_ {
        self.iter().map(|e| &e.id)
    }

    pub fn find_by_id(&self, id: &EntityId) -> Option<&Entity> {
        self.iter().find(|e| &e.id == id)
    }

    pub fn index_of(&self, predicate: impl Fn(&Entity) -> bool) -> Option<usize> {
        self.iter().position(predicate)
    }

    /// New store with the entity `id` swapped for `entity`.
    ///
    /// The replacement must carry the same id so ids stay unique.
    pub fn replace(&self, id: &EntityId, entity: Entity) -> Result<Self, KernelError> {
        if &entity.id != id {
            return Err(KernelError::IdMismatch {
                expected: id.clone(),
                found: entity.id,
            });
        }
        let index = self
            .index_of(|e| &e.id == id)
            .ok_or_else(|| KernelError::EntityNotFound(id.clone()))?;
        let mut next = self.clone();
        next.entities[index] = Arc::new(entity);
        Ok(next)
    }

    /// New store with `f` applied to every entity, order preserved.
    ///
    /// `f` must not change ids.
    pub fn map_entities(&self, f: impl Fn(&Entity) -> Entity) -> Self {
        Self {
            entities: self.iter().map(|e| Arc::new(f(e))).collect(),
        }
    }

    /// Whether two stores share the allocation for entity `index`.
    pub fn shares_entity(&self, other: &Self, index: usize) -> bool {
        match (self.entities.get(index), other.entities.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
