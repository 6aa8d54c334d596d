use std::time::Duration;

use glam::Vec2;

use crate::core::physics::{BodyId, ColliderMaterial, PhysicsWorld};
use crate::renderer::traits::DrawSink;

/// Nominal tick the external driver runs at. One `update` advances the
/// world by half of this, so simulated time flows at half driver rate.
pub const TIME_STEP: Duration = Duration::from_millis(20);

pub const BALL_RADIUS: f32 = 0.05;
pub const BALL_GUN_RADIUS: f32 = 0.4;

const LAUNCH_SPEED: f32 = 7.0;
const BALL_LIMIT: usize = 50;

/// Balls below this line are out of play. Sits above the physical floor
/// so culling always happens before a ball can rest on the bottom wall.
const KILL_LINE: f32 = -3.0 - 2.0 * BALL_RADIUS;

const GRAVITY: Vec2 = Vec2::new(0.0, -10.0);
const GUN_POSITION: Vec2 = Vec2::new(0.0, 1.0);

const ARENA_LEFT: f32 = -4.0;
const ARENA_TOP: f32 = 3.0;
const ARENA_RIGHT: f32 = 4.0;
const ARENA_BOTTOM: f32 = -3.0 - 4.0 * BALL_RADIUS;

/// The fixed obstacle course: (center, full size, angle).
const OBSTACLES: [(Vec2, Vec2, f32); 5] = [
    (Vec2::new(-1.5, -1.6), Vec2::new(5.5, 0.16), -0.35),
    (Vec2::new(2.4, -0.85), Vec2::new(3.6, 0.16), 0.436),
    (Vec2::new(0.03, -0.7), Vec2::new(1.3, 0.7), 0.733),
    (Vec2::new(2.78, 1.46), Vec2::new(0.82, 0.64), 0.0),
    (Vec2::new(-2.04, 0.27), Vec2::new(0.98, 0.8), -0.646),
];

/// The authoritative arena state: one gun, five obstacles, up to
/// [`BALL_LIMIT`] balls in flight.
///
/// All mutation goes through [`update`](Simulation::update) and
/// [`launch_ball`](Simulation::launch_ball); rendering observes through
/// `&self` only. Single-threaded by construction, the external driver
/// serializes every call.
pub struct Simulation {
    world: PhysicsWorld,
    obstacles: Vec<BodyId>,
    gun: BodyId,
    balls: Vec<BodyId>,
}

impl Simulation {
    /// Build the fixed scene: boundary edges, the obstacle course and
    /// the gun. Static bodies live as long as the simulation does.
    pub fn new() -> Self {
        let mut world = PhysicsWorld::new(GRAVITY);
        world.create_boundary(ARENA_LEFT, ARENA_TOP, ARENA_RIGHT, ARENA_BOTTOM);

        let obstacles = OBSTACLES
            .iter()
            .map(|&(center, size, angle)| world.create_obstacle(center, size.x, size.y, angle))
            .collect();
        let gun = world.create_gun(GUN_POSITION, BALL_GUN_RADIUS);

        log::info!(
            "arena built: {} bodies, gun at {:?}",
            world.body_count(),
            GUN_POSITION
        );

        Self {
            world,
            obstacles,
            gun,
            balls: Vec::new(),
        }
    }

    /// The gun's fixed world position. Pure; the gun never moves.
    pub fn ball_gun_position(&self) -> Vec2 {
        GUN_POSITION
    }

    /// Number of balls currently in flight.
    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Advance the world by half the nominal tick, then cull every ball
    /// that crossed the kill line.
    pub fn update(&mut self) {
        self.world.step(TIME_STEP.as_secs_f32() / 2.0);
        self.cull_fallen_balls();
    }

    /// Fire a ball along `azimuth` (radians, 0 = +x, counter-clockwise
    /// positive). Silently ignored once the population cap is reached.
    pub fn launch_ball(&mut self, azimuth: f32) {
        if self.balls.len() >= BALL_LIMIT {
            log::debug!("ball limit reached, launch ignored");
            return;
        }

        let dir = Vec2::from_angle(azimuth);
        // Spawn just outside the gun's rim so the ball never overlaps it.
        let position = GUN_POSITION + dir * (BALL_GUN_RADIUS + BALL_RADIUS);
        let ball = self.world.create_ball(
            position,
            dir * LAUNCH_SPEED,
            BALL_RADIUS,
            ColliderMaterial::default(),
        );
        self.balls.push(ball);
    }

    /// Push the frame's geometry into `sink`: gun first, then obstacles,
    /// then balls. The order is draw layering, nothing more.
    pub fn render(&self, sink: &mut dyn DrawSink) {
        sink.draw_ball_gun(self.world.circle_of(self.gun).center);

        for &obstacle in &self.obstacles {
            sink.draw_obstacle(&self.world.polygon4_of(obstacle));
        }

        for &ball in &self.balls {
            sink.draw_ball(self.world.circle_of(ball));
        }
    }

    /// Destroy every ball below the kill line, dropping its handle in
    /// the same pass. Survivors keep their relative order.
    fn cull_fallen_balls(&mut self) {
        let mut i = 0;
        while i < self.balls.len() {
            let (pos, _) = self.world.body_position(self.balls[i]);
            if pos.y < KILL_LINE {
                let ball = self.balls.remove(i);
                self.world.destroy_body(ball);
                log::debug!("ball culled at y={:.3}", pos.y);
            } else {
                i += 1;
            }
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::commands::{DrawCommand, DrawList};

    fn render_frame(sim: &Simulation) -> DrawList {
        let mut frame = DrawList::new();
        sim.render(&mut frame);
        frame
    }

    #[test]
    fn gun_position_is_fixed() {
        let mut sim = Simulation::new();
        assert_eq!(sim.ball_gun_position(), Vec2::new(0.0, 1.0));

        sim.launch_ball(1.0);
        for _ in 0..25 {
            sim.update();
        }
        assert_eq!(sim.ball_gun_position(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn launch_spawns_on_the_gun_rim_at_launch_speed() {
        for azimuth in [0.0f32, 0.5, std::f32::consts::FRAC_PI_2, 2.4, -1.8] {
            let mut sim = Simulation::new();
            sim.launch_ball(azimuth);
            assert_eq!(sim.ball_count(), 1);

            let ball = sim.balls[0];
            let (pos, _) = sim.world.body_position(ball);
            let offset = pos - sim.ball_gun_position();
            assert!(
                (offset.length() - (BALL_GUN_RADIUS + BALL_RADIUS)).abs() < 1e-6,
                "azimuth {}: spawn distance {}",
                azimuth,
                offset.length()
            );

            let vel = sim.world.body_velocity(ball);
            assert!(
                (vel.length() - 7.0).abs() < 1e-5,
                "azimuth {}: speed {}",
                azimuth,
                vel.length()
            );
            // Offset and velocity point the same way.
            assert!(offset.normalize().dot(vel.normalize()) > 0.9999);
            // And that way is the requested azimuth.
            let diff = (vel.y.atan2(vel.x) - azimuth).rem_euclid(std::f32::consts::TAU);
            let diff = diff.min(std::f32::consts::TAU - diff);
            assert!(diff < 1e-4, "azimuth {}: off by {}", azimuth, diff);
        }
    }

    #[test]
    fn population_is_capped_not_errored() {
        let mut sim = Simulation::new();
        for i in 0..60 {
            sim.launch_ball(i as f32 * 0.05);
        }
        assert_eq!(sim.ball_count(), 50);
    }

    #[test]
    fn survivors_stay_above_the_kill_line() {
        let mut sim = Simulation::new();
        for i in 0..10 {
            sim.launch_ball(0.3 * i as f32);
        }
        for _ in 0..200 {
            sim.update();
            for &ball in &sim.balls {
                let (pos, _) = sim.world.body_position(ball);
                assert!(pos.y >= KILL_LINE, "surviving ball at y={}", pos.y);
            }
        }
    }

    #[test]
    fn horizontal_launch_falls_out_within_ten_seconds() {
        let mut sim = Simulation::new();
        sim.launch_ball(0.0);
        assert_eq!(sim.ball_count(), 1);

        for _ in 0..500 {
            sim.update();
        }
        assert_eq!(sim.ball_count(), 0);
    }

    #[test]
    fn render_is_read_only_and_repeatable() {
        let mut sim = Simulation::new();
        sim.launch_ball(1.2);
        sim.launch_ball(2.0);
        for _ in 0..30 {
            sim.update();
        }

        let first = render_frame(&sim);
        let second = render_frame(&sim);
        assert_eq!(first, second);
    }

    #[test]
    fn static_geometry_never_changes() {
        let mut sim = Simulation::new();
        let before = render_frame(&sim);

        for i in 0..8 {
            sim.launch_ball(0.4 * i as f32);
        }
        for _ in 0..100 {
            sim.update();
        }
        let after = render_frame(&sim);

        let statics = |frame: &DrawList| -> Vec<DrawCommand> {
            frame
                .commands()
                .iter()
                .filter(|c| !matches!(c, DrawCommand::Ball(_)))
                .copied()
                .collect()
        };
        assert_eq!(statics(&before), statics(&after));
    }

    #[test]
    fn render_order_is_gun_obstacles_balls() {
        let mut sim = Simulation::new();
        sim.launch_ball(1.0);
        sim.launch_ball(2.0);

        let frame = render_frame(&sim);
        let commands = frame.commands();
        assert_eq!(commands.len(), 1 + OBSTACLES.len() + 2);
        assert!(matches!(commands[0], DrawCommand::BallGun(p) if p == Vec2::new(0.0, 1.0)));
        for command in &commands[1..=OBSTACLES.len()] {
            assert!(matches!(command, DrawCommand::Obstacle(_)));
        }
        for command in &commands[OBSTACLES.len() + 1..] {
            assert!(matches!(command, DrawCommand::Ball(_)));
        }
    }

    #[test]
    fn culling_keeps_survivor_order() {
        let mut sim = Simulation::new();
        sim.launch_ball(1.9);
        sim.launch_ball(0.0);
        sim.launch_ball(1.2);
        let launched = sim.balls.clone();

        for _ in 0..500 {
            sim.update();
        }

        // The horizontal ball is gone within ten simulated seconds, and
        // whoever survives keeps the launch order.
        assert!(sim.ball_count() < 3);
        let mut remaining = launched.iter();
        for ball in &sim.balls {
            assert!(
                remaining.any(|b| b == ball),
                "survivors out of launch order"
            );
        }
    }
}
