//! Thin wrapper around the rapier2d simulation.
//!
//! The world runs in pixel units with a fixed step driven once per frame
//! by the compositor. Collision-start events are collected during the
//! step and drained afterwards, so everything resolves within the same
//! frame.

use std::sync::Mutex;

use rapier2d::prelude::*;

use crate::math::Vec2;

/// Stable handle to a body owned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(RigidBodyHandle);

/// Body discriminators carried in rapier's user data
const CHAR_TAG: u128 = 1;
const GROUND_TAG: u128 = 2;

/// Collects collision-start pairs during a step
#[derive(Default)]
struct CollisionChannel {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for CollisionChannel {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            if let Ok(mut started) = self.started.lock() {
                started.push((a, b));
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

/// The black-box physics service
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    events: CollisionChannel,
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: vector![0.0, gravity],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            events: CollisionChannel::default(),
        }
    }

    /// A glyph's body: starts static, freed by a tap or the shockwave
    pub fn add_char_body(&mut self, center: Vec2, w: f32, h: f32) -> BodyId {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .linear_damping(0.08)
            .angular_damping(0.08)
            .user_data(CHAR_TAG)
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(w / 2.0, h / 2.0)
            .restitution(0.5)
            .density(0.002)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyId(handle)
    }

    pub fn add_ground(&mut self, center: Vec2, w: f32, h: f32) -> BodyId {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .user_data(GROUND_TAG)
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(w / 2.0, h / 2.0).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        BodyId(handle)
    }

    /// Advance the fixed-step simulation once; called once per frame
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );
    }

    /// Char bodies whose ground contact began since the last drain
    pub fn drain_ground_contacts(&mut self) -> Vec<BodyId> {
        let started = match self.events.started.lock() {
            Ok(mut v) => std::mem::take(&mut *v),
            Err(_) => return Vec::new(),
        };
        let mut hits = Vec::new();
        for (a, b) in started {
            let pa = self.colliders.get(a).and_then(|c| c.parent());
            let pb = self.colliders.get(b).and_then(|c| c.parent());
            if let (Some(pa), Some(pb)) = (pa, pb) {
                let tag_a = self.bodies.get(pa).map(|r| r.user_data);
                let tag_b = self.bodies.get(pb).map(|r| r.user_data);
                match (tag_a, tag_b) {
                    (Some(CHAR_TAG), Some(GROUND_TAG)) => hits.push(BodyId(pa)),
                    (Some(GROUND_TAG), Some(CHAR_TAG)) => hits.push(BodyId(pb)),
                    _ => {}
                }
            }
        }
        hits
    }

    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(id.0).map(|b| {
            let t = b.translation();
            Vec2::new(t.x, t.y)
        })
    }

    pub fn angle(&self, id: BodyId) -> Option<f32> {
        self.bodies.get(id.0).map(|b| b.rotation().angle())
    }

    pub fn mass(&self, id: BodyId) -> Option<f32> {
        self.bodies.get(id.0).map(|b| b.mass())
    }

    pub fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(id.0).map(|b| {
            let v = b.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    pub fn is_static(&self, id: BodyId) -> bool {
        self.bodies.get(id.0).map(|b| b.is_fixed()).unwrap_or(false)
    }

    /// Promote a static body to dynamic; no-op for stale handles
    pub fn set_dynamic(&mut self, id: BodyId) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            if body.is_fixed() {
                body.set_body_type(RigidBodyType::Dynamic, true);
            }
        }
    }

    /// Instantaneous impulse at the body's center; no-op for stale handles
    pub fn apply_impulse(&mut self, id: BodyId, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(id.0) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    /// Detach a body (and its collider) from the simulation
    pub fn remove_body(&mut self, id: BodyId) {
        self.bodies.remove(
            id.0,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.get(id.0).is_some()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies whose colliders contain the given point
    pub fn bodies_at_point(&self, p: Vec2) -> Vec<BodyId> {
        let mut out = Vec::new();
        self.query_pipeline.intersections_with_point(
            &self.bodies,
            &self.colliders,
            &point![p.x, p.y],
            QueryFilter::default(),
            |handle| {
                if let Some(parent) = self.colliders.get(handle).and_then(|c| c.parent()) {
                    out.push(BodyId(parent));
                }
                true
            },
        );
        out
    }

    /// Stable per-body phase for the ambient sway
    pub fn phase_of(&self, id: BodyId) -> f32 {
        id.0.into_raw_parts().0 as f32
    }
}
