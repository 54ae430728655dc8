//! Fruit lifecycle: creating and destroying tagged fruit bodies.
//!
//! Fruits have no storage of their own. Each one is a rapier body whose
//! `user_data` carries the level, the merging flag and the creation time.

use std::time::Duration;

use rapier2d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::FruitMaterial;
use crate::error::GameError;
use crate::level::{LevelIndex, LevelTable};
use crate::physics::PhysicsWorld;
use crate::tag::{BodyTag, FruitTag};

/// Unique identifier of a fruit, assigned by the physics world on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FruitId(pub RigidBodyHandle);

/// Snapshot of a fruit read from the physics world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fruit {
    pub id: FruitId,
    pub level: LevelIndex,
    pub is_merging: bool,
    pub position: [f32; 2],
    pub created_at: Duration,
}

impl Fruit {
    fn from_body(handle: RigidBodyHandle, body: &RigidBody, tag: FruitTag) -> Self {
        let pos = body.translation();
        Self {
            id: FruitId(handle),
            level: tag.level,
            is_merging: tag.merging,
            position: [pos.x, pos.y],
            created_at: Duration::from_millis(tag.created_at_ms),
        }
    }
}

/// Creates and destroys fruit bodies with a fixed material.
#[derive(Debug, Clone, Copy)]
pub struct FruitLifecycle {
    material: FruitMaterial,
}

impl FruitLifecycle {
    pub fn new(material: FruitMaterial) -> Self {
        Self { material }
    }

    /// Inserts a new fruit body. The caller guarantees `level` is in range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn spawn(
        &self,
        world: &mut PhysicsWorld,
        levels: &LevelTable,
        level: LevelIndex,
        position: [f32; 2],
        now: Duration,
    ) -> Result<Fruit, GameError> {
        let radius = levels.radius(level)?;
        let tag = FruitTag {
            level,
            merging: false,
            created_at_ms: now.as_millis() as u64,
        };

        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(position[0], position[1]))
            .ccd_enabled(true)
            .user_data(BodyTag::Fruit(tag).encode())
            .build();
        let handle = world.add_rigid_body(rigid_body);

        let collider = ColliderBuilder::ball(radius)
            .restitution(self.material.restitution)
            .friction(self.material.friction)
            .density(self.material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        world.add_collider(collider, handle);

        Ok(Fruit {
            id: FruitId(handle),
            level,
            is_merging: false,
            position,
            created_at: Duration::from_millis(tag.created_at_ms),
        })
    }

    /// Removes a fruit from the world. Removing an absent fruit is an error.
    pub fn destroy(&self, world: &mut PhysicsWorld, id: FruitId) -> Result<Fruit, GameError> {
        let fruit = get(world, id)?;
        world
            .remove_rigid_body(id.0)
            .ok_or(GameError::FruitNotFound(id))?;
        Ok(fruit)
    }
}

/// Reads a fruit from the world.
pub fn get(world: &PhysicsWorld, id: FruitId) -> Result<Fruit, GameError> {
    let body = world
        .get_rigid_body(id.0)
        .ok_or(GameError::FruitNotFound(id))?;
    let tag = BodyTag::decode(body.user_data)
        .and_then(BodyTag::as_fruit)
        .ok_or(GameError::NotAFruit(id))?;
    Ok(Fruit::from_body(id.0, body, tag))
}

/// Reads a body as a fruit, returning `None` for walls, untagged or absent bodies.
pub fn try_get(world: &PhysicsWorld, handle: RigidBodyHandle) -> Option<Fruit> {
    get(world, FruitId(handle)).ok()
}

/// Sets the merging flag stored on a fruit body.
pub fn set_merging(world: &mut PhysicsWorld, id: FruitId, merging: bool) -> Result<(), GameError> {
    let body = world
        .get_rigid_body_mut(id.0)
        .ok_or(GameError::FruitNotFound(id))?;
    let mut tag = BodyTag::decode(body.user_data)
        .and_then(BodyTag::as_fruit)
        .ok_or(GameError::NotAFruit(id))?;
    tag.merging = merging;
    body.user_data = BodyTag::Fruit(tag).encode();
    Ok(())
}

/// All fruits currently in the world.
pub fn all(world: &PhysicsWorld) -> Vec<Fruit> {
    world
        .tagged_bodies()
        .filter_map(|(handle, body, tag)| tag.as_fruit().map(|t| Fruit::from_body(handle, body, t)))
        .collect()
}

pub fn count(world: &PhysicsWorld) -> usize {
    world
        .tagged_bodies()
        .filter(|(_, _, tag)| tag.as_fruit().is_some())
        .count()
}
