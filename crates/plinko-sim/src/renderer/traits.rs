//! Draw sink trait for presentation backends.
//!
//! The simulation pushes world-space geometry into this trait once per
//! frame; everything about pixels (scaling, colors, double-buffering)
//! belongs to the implementer. Coordinates are world units, not pixels.

use glam::Vec2;

use super::shapes::{Circle, Polygon4};

/// The contract a renderer fulfills to receive one frame of geometry.
///
/// Implementations must not feed anything back into the simulation;
/// `Simulation::render` takes `&self`, so a sink only ever observes.
pub trait DrawSink {
    /// A ball in flight (or at rest), already transformed to world space.
    fn draw_ball(&mut self, circle: Circle);

    /// An obstacle's four corners in world space, counter-clockwise.
    fn draw_obstacle(&mut self, vertices: &Polygon4);

    /// The gun's center. The barrel's aim direction is presentation
    /// state owned by the caller, not by the simulation.
    fn draw_ball_gun(&mut self, position: Vec2);
}
