//! Recorded draw commands.
//!
//! `DrawList` is the buffer-style alternative to implementing
//! [`DrawSink`](super::traits::DrawSink) directly: the simulation
//! records a frame into it and a presentation layer (or a test, or the
//! headless demo) consumes the commands afterwards. Serializable so a
//! frame can cross a process boundary.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shapes::{Circle, Polygon4};
use super::traits::DrawSink;

/// One recorded draw call, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Ball(Circle),
    Obstacle(Polygon4),
    BallGun(Vec2),
}

/// A frame's worth of draw commands.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawList(Vec<DrawCommand>);

impl DrawList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reset for the next frame, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl DrawSink for DrawList {
    fn draw_ball(&mut self, circle: Circle) {
        self.0.push(DrawCommand::Ball(circle));
    }

    fn draw_obstacle(&mut self, vertices: &Polygon4) {
        self.0.push(DrawCommand::Obstacle(*vertices));
    }

    fn draw_ball_gun(&mut self, position: Vec2) {
        self.0.push(DrawCommand::BallGun(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_submission_order() {
        let mut list = DrawList::new();
        list.draw_ball_gun(Vec2::new(0.0, 1.0));
        list.draw_obstacle(&[Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y]);
        list.draw_ball(Circle {
            center: Vec2::new(0.5, 0.5),
            radius: 0.05,
        });

        assert_eq!(list.len(), 3);
        assert!(matches!(list.commands()[0], DrawCommand::BallGun(_)));
        assert!(matches!(list.commands()[1], DrawCommand::Obstacle(_)));
        assert!(matches!(list.commands()[2], DrawCommand::Ball(_)));
    }

    #[test]
    fn clear_keeps_nothing() {
        let mut list = DrawList::new();
        list.draw_ball_gun(Vec2::ZERO);
        assert!(!list.is_empty());
        list.clear();
        assert!(list.is_empty());
    }
}
