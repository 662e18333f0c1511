//! World wrapper around hecs

use glam::Vec3;
use hecs::Entity;

use crate::ai::SceneQuery;
use crate::ecs::{Name, Tag, Transform};

/// Game world containing all entities and components
pub struct World {
    /// The underlying hecs world
    pub inner: hecs::World,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn an entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a named, tagged entity at a position
    pub fn spawn_tagged(&mut self, name: &str, tag: &str, position: Vec3) -> Entity {
        self.inner.spawn((
            Name::new(name),
            Tag::new(tag),
            Transform::from_position(position),
        ))
    }

    /// Despawn an entity
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Get a reference to a component
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<hecs::RefMut<'_, T>, hecs::ComponentError> {
        self.inner.get::<&mut T>(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Get the number of entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// All entities carrying `tag`
    pub fn tagged(&self, tag: &str) -> Vec<Entity> {
        self.inner
            .query::<&Tag>()
            .iter()
            .filter(|(_, t)| t.is(tag))
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Move an entity's transform, returning `false` if it has none
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> bool {
        match self.get_mut::<Transform>(entity) {
            Ok(mut transform) => {
                transform.position = position;
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneQuery for World {
    fn find_by_tag(&self, tag: &str) -> Option<Entity> {
        self.inner
            .query::<&Tag>()
            .iter()
            .find(|(_, t)| t.is(tag))
            .map(|(entity, _)| entity)
    }

    fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.get::<Tag>(entity).is_ok_and(|t| t.is(tag))
    }

    fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.get::<Transform>(entity).ok().map(|t| t.position)
    }

    fn destroy(&mut self, entity: Entity) {
        if self.despawn(entity).is_err() {
            log::debug!("Entity {entity:?} was already gone");
        }
    }
}
