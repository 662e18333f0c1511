//! Physics simulation using rapier3d

use std::sync::Mutex;

use glam::{Quat, Vec3};
use hecs::Entity;
use rapier3d::na::{self, UnitQuaternion};
use rapier3d::prelude::*;

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Two entities whose colliders started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: Entity,
    pub b: Entity,
}

impl Contact {
    /// The entity on the other side of a contact involving `entity`
    #[must_use]
    pub fn other(&self, entity: Entity) -> Option<Entity> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Convert glam Quat to rapier3d UnitQuaternion
fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<f32> {
    Isometry::from_parts(
        na::Translation3::new(position.x, position.y, position.z),
        quat_to_rapier(rotation),
    )
}

fn entity_from_user_data(data: u128) -> Option<Entity> {
    u64::try_from(data).ok().and_then(Entity::from_bits)
}

/// Collects collision-start events during a step.
///
/// rapier requires event handlers to be `Sync`, hence the mutex; everything
/// runs on one thread so it is never contended.
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(u128, u128)>>,
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(h1, h2, _) = event {
            let data = |h| colliders.get(h).map_or(0, |c| c.user_data);
            if let Ok(mut started) = self.started.lock() {
                started.push((data(h1), data(h2)));
            }
        }
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

/// Physics world manager
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    /// Physics pipeline
    pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase
    broad_phase: DefaultBroadPhase,
    /// Narrow phase
    narrow_phase: NarrowPhase,
    /// Rigid body set
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,
    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,
    /// CCD solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasting
    query_pipeline: QueryPipeline,
    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Collision starts from the last steps
    contacts: ContactCollector,
}

impl Physics {
    /// Create a new physics world with default gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            contacts: ContactCollector::default(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vector![self.gravity.x, self.gravity.y, self.gravity.z],
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.contacts,
        );
    }

    /// Take the contacts that started since the last call.
    ///
    /// Colliders without an attached entity are skipped.
    pub fn drain_contacts(&mut self) -> Vec<Contact> {
        let started = match self.contacts.started.get_mut() {
            Ok(started) => std::mem::take(started),
            Err(poisoned) => std::mem::take(poisoned.into_inner()),
        };

        started
            .into_iter()
            .filter_map(|(a, b)| {
                Some(Contact {
                    a: entity_from_user_data(a)?,
                    b: entity_from_user_data(b)?,
                })
            })
            .collect()
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a kinematic rigid body (controlled directly)
    pub fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .position(isometry(position, rotation))
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Add a box collider to a rigid body
    pub fn add_box_collider(&mut self, body: RigidBodyHandle, half_extents: Vec3) -> ColliderHandle {
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a sphere collider that reports collision events, including
    /// contacts with static geometry while the body is kinematic
    pub fn add_sensor_sphere(&mut self, body: RigidBodyHandle, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_collision_types(
                ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_FIXED,
            )
            .build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a ground plane collider
    pub fn add_ground_plane(&mut self, body: RigidBodyHandle) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(100.0, 0.1, 100.0).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Tag a collider with the entity it belongs to, so contacts can be
    /// reported in terms of entities
    pub fn attach_entity(&mut self, collider: ColliderHandle, entity: Entity) {
        if let Some(c) = self.collider_set.get_mut(collider.0) {
            c.user_data = u128::from(entity.to_bits().get());
        }
    }

    /// Get the position of a rigid body
    pub fn get_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body.0).map(|rb| {
            let pos = rb.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Set the position of a kinematic body
    pub fn set_kinematic_position(&mut self, body: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_next_kinematic_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Cast a ray and return the first hit
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default(),
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: Vec3::new(point.x, point.y, point.z),
                    distance,
                }
            })
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}
