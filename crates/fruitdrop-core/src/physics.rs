//! Physics world using `Rapier2D` with deterministic behavior.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;
use rapier2d::prelude::*;

use crate::tag::BodyTag;

/// Fixed timestep for physics simulation (60Hz).
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Default gravity vector (downward, in pixels/s²).
pub fn default_gravity() -> Vector {
    Vector::new(0.0, 981.0)
}

/// Two rigid bodies that started touching during a step, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: RigidBodyHandle,
    pub b: RigidBodyHandle,
}

/// Collects collision events emitted by the pipeline during one step.
#[derive(Default)]
struct CollisionCollector {
    events: Mutex<Vec<CollisionEvent>>,
}

impl CollisionCollector {
    fn into_events(self) -> Vec<CollisionEvent> {
        self.events.into_inner()
    }
}

impl EventHandler for CollisionCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.events.lock().push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Physics world containing all `Rapier2D` components.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: Vector,
    pub frame: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .field("gravity", &self.gravity)
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    /// Creates a new physics world with default settings.
    pub fn new() -> Self {
        Self::with_gravity(default_gravity())
    }

    /// Creates a new physics world with custom gravity.
    pub fn with_gravity(gravity: Vector) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity,
            frame: 0,
        }
    }

    /// Advances the physics simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.step_with_handler(&());
    }

    /// Advances the simulation by one timestep and returns the raw collision
    /// events reported during it.
    pub fn step_with_events(&mut self) -> Vec<CollisionEvent> {
        let collector = CollisionCollector::default();
        self.step_with_handler(&collector);
        collector.into_events()
    }

    fn step_with_handler(&mut self, events: &dyn EventHandler) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            events,
        );
        self.frame += 1;
    }

    /// Steps once and returns the body pairs that started touching, with
    /// collider handles resolved to their parent bodies.
    pub fn step_collisions(&mut self) -> Vec<CollisionPair> {
        let raw = self.step_with_events();
        raw.into_iter()
            .filter_map(|event| match event {
                CollisionEvent::Started(h1, h2, _flags) => {
                    let a = self.collider_parent(h1)?;
                    let b = self.collider_parent(h2)?;
                    Some(CollisionPair { a, b })
                }
                CollisionEvent::Stopped(..) => None,
            })
            .collect()
    }

    fn collider_parent(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set.get(handle)?.parent()
    }

    /// Adds a rigid body to the world and returns its handle.
    pub fn add_rigid_body(&mut self, rigid_body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(rigid_body)
    }

    /// Adds a collider attached to a rigid body.
    pub fn add_collider(&mut self, collider: Collider, parent: RigidBodyHandle) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Removes a rigid body and its attached colliders.
    /// Returns the removed body, or `None` if it was not in the world.
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) -> Option<RigidBody> {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        )
    }

    /// Gets an immutable reference to a rigid body.
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Gets a mutable reference to a rigid body.
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Iterates over every tagged body.
    pub fn tagged_bodies(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody, BodyTag)> {
        self.rigid_body_set
            .iter()
            .filter_map(|(handle, body)| BodyTag::decode(body.user_data).map(|tag| (handle, body, tag)))
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Computes a deterministic hash of the current physics state.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.frame.hash(&mut hasher);

        for (handle, body) in self.rigid_body_set.iter() {
            let (index, generation) = handle.into_raw_parts();
            index.hash(&mut hasher);
            generation.hash(&mut hasher);
            body.user_data.hash(&mut hasher);

            let pos = body.translation();
            hash_f32(pos.x, &mut hasher);
            hash_f32(pos.y, &mut hasher);

            let rot = body.rotation().angle();
            hash_f32(rot, &mut hasher);

            let linvel = body.linvel();
            hash_f32(linvel.x, &mut hasher);
            hash_f32(linvel.y, &mut hasher);

            hash_f32(body.angvel(), &mut hasher);
        }

        hasher.finish()
    }

    /// Returns the current simulation frame number.
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    /// Drops every body and collider, keeping the gravity setting.
    pub fn reset(&mut self) {
        *self = Self::with_gravity(self.gravity);
    }
}

/// Hashes a f32 value by converting to bits.
fn hash_f32(value: f32, hasher: &mut impl Hasher) {
    value.to_bits().hash(hasher);
}
