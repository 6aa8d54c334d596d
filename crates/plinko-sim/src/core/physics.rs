use glam::Vec2;
use nalgebra::{Isometry2, Point2, Vector2};
use rapier2d::prelude::*;

use crate::renderer::shapes::{Circle, Polygon4};

/// Solver quality constants. Fixed at construction, never caller-tunable.
const VELOCITY_ITERATIONS: usize = 6;
const POSITION_ITERATIONS: usize = 2;

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> Vector2<f32> {
    Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn vec2_to_point(v: Vec2) -> Point2<f32> {
    Point2::new(v.x, v.y)
}

fn point_to_vec2(p: Point2<f32>) -> Vec2 {
    Vec2::new(p.x, p.y)
}

fn na_iso_to_pos_rot(iso: &Isometry2<f32>) -> (Vec2, f32) {
    let pos = Vec2::new(iso.translation.x, iso.translation.y);
    let rot = iso.rotation.angle();
    (pos, rot)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Handle pair referencing Rapier internals. Generational arena indices,
/// so a stale handle after `destroy_body` is detectable, never dangling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyId {
    pub(crate) body: RigidBodyHandle,
    pub(crate) collider: ColliderHandle,
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    /// The ball material: lively bounce, moderate friction, unit density.
    fn default() -> Self {
        Self {
            restitution: 0.8,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// A body's collider shape projected into world space.
///
/// Resolved by tag, so callers never inspect engine shape types. Every
/// body in this world carries exactly one collider of one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle(Circle),
    Quad(Polygon4),
    Edge([Vec2; 2]),
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Wraps all Rapier2D boilerplate into a single, easy-to-use struct.
///
/// Owns every rigid body in the arena. Callers hold [`BodyId`]s only;
/// after [`PhysicsWorld::destroy_body`] the caller must drop the handle
/// in the same operation.
pub struct PhysicsWorld {
    gravity: Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Coordinates are Y-up world units, so arena gravity is `(0, -10)`.
    pub fn new(gravity: Vec2) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.num_solver_iterations =
            std::num::NonZeroUsize::new(VELOCITY_ITERATIONS).unwrap_or(std::num::NonZeroUsize::MIN);
        integration_parameters.num_internal_pgs_iterations = POSITION_ITERATIONS;

        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Build the arena's outer rectangle as four zero-mass edge bodies.
    pub fn create_boundary(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        self.add_edge(Vec2::new(left, top), Vec2::new(left, bottom));
        self.add_edge(Vec2::new(right, top), Vec2::new(right, bottom));
        self.add_edge(Vec2::new(left, top), Vec2::new(right, top));
        self.add_edge(Vec2::new(left, bottom), Vec2::new(right, bottom));
    }

    fn add_edge(&mut self, a: Vec2, b: Vec2) {
        let body = self.bodies.insert(RigidBodyBuilder::fixed().build());
        let collider = ColliderBuilder::segment(vec2_to_point(a), vec2_to_point(b))
            .friction(Self::STATIC_FRICTION)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies);
    }

    /// Friction of every static surface (walls, obstacles, gun). Low,
    /// so balls skid down the slopes instead of sticking to them.
    const STATIC_FRICTION: f32 = 0.2;

    /// Create a fixed, oriented rectangular obstacle. `width`/`height`
    /// are full extents; density is zero (static, mass irrelevant) and
    /// the surface is dead: no restitution of its own.
    pub fn create_obstacle(&mut self, center: Vec2, width: f32, height: f32, angle: f32) -> BodyId {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(center))
            .rotation(angle)
            .build();
        let body = self.bodies.insert(rb);

        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0)
            .density(0.0)
            .friction(Self::STATIC_FRICTION)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        BodyId { body, collider }
    }

    /// Create a dynamic ball with an initial velocity. Continuous
    /// collision detection is on so fast balls cannot tunnel through
    /// the thin obstacles. Restitution combines by average (the solver
    /// default), so contacts with the dead statics come out at half the
    /// ball's bounciness and a ball settles instead of pin-balling
    /// forever; ball-to-ball contacts keep the full value.
    pub fn create_ball(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        radius: f32,
        material: ColliderMaterial,
    ) -> BodyId {
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(position))
            .linvel(vec2_to_na(velocity))
            .ccd_enabled(true)
            .build();
        let body = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(radius)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        BodyId { body, collider }
    }

    /// Create the fixed circular gun marker. Dead static surface like
    /// the walls; balls spawn outside its rim, so it only ever acts as
    /// scenery.
    pub fn create_gun(&mut self, position: Vec2, radius: f32) -> BodyId {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(position))
            .build();
        let body = self.bodies.insert(rb);

        let collider = ColliderBuilder::ball(radius)
            .friction(Self::STATIC_FRICTION)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        BodyId { body, collider }
    }

    /// Advance the world by `dt` seconds with the fixed solver quality.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Remove a body and its collider from the simulation. The handle
    /// is invalid from here on; the caller drops it in the same step.
    pub fn destroy_body(&mut self, id: BodyId) {
        self.bodies.remove(
            id.body,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Resolve a body's single collider into a world-space shape.
    ///
    /// Panics on a stale handle or an unsupported collider kind; both
    /// indicate broken scene construction, never a runtime condition.
    pub fn body_shape(&self, id: BodyId) -> BodyShape {
        let Some(collider) = self.colliders.get(id.collider) else {
            panic!("stale collider handle {:?}", id.collider);
        };
        let iso = collider.position();
        let shape = collider.shape();

        if let Some(ball) = shape.as_ball() {
            BodyShape::Circle(Circle {
                center: point_to_vec2(iso * Point2::origin()),
                radius: ball.radius,
            })
        } else if let Some(cuboid) = shape.as_cuboid() {
            let he = cuboid.half_extents;
            // Corner order matches the engine's local winding (CCW).
            let local = [
                Point2::new(-he.x, -he.y),
                Point2::new(he.x, -he.y),
                Point2::new(he.x, he.y),
                Point2::new(-he.x, he.y),
            ];
            BodyShape::Quad(local.map(|p| point_to_vec2(iso * p)))
        } else if let Some(segment) = shape.as_segment() {
            BodyShape::Edge([point_to_vec2(iso * segment.a), point_to_vec2(iso * segment.b)])
        } else {
            panic!("unsupported collider shape on body {:?}", id.body);
        }
    }

    /// World-space circle of a ball or gun body.
    /// Panics if the body is not circular; that is a scene-construction bug.
    pub fn circle_of(&self, id: BodyId) -> Circle {
        match self.body_shape(id) {
            BodyShape::Circle(circle) => circle,
            other => panic!("expected a circle collider, found {:?}", other),
        }
    }

    /// World-space corners of an obstacle body.
    /// Panics if the body is not a quad; that is a scene-construction bug.
    pub fn polygon4_of(&self, id: BodyId) -> Polygon4 {
        match self.body_shape(id) {
            BodyShape::Quad(vertices) => vertices,
            other => panic!("expected a quad collider, found {:?}", other),
        }
    }

    /// Get the current position and rotation of a body.
    pub fn body_position(&self, id: BodyId) -> (Vec2, f32) {
        let Some(rb) = self.bodies.get(id.body) else {
            panic!("stale body handle {:?}", id.body);
        };
        na_iso_to_pos_rot(rb.position())
    }

    /// Get the current linear velocity of a body.
    pub fn body_velocity(&self, id: BodyId) -> Vec2 {
        let Some(rb) = self.bodies.get(id.body) else {
            panic!("stale body handle {:?}", id.body);
        };
        na_to_vec2(rb.linvel())
    }

    /// Number of rigid bodies in the simulation, boundary edges included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
