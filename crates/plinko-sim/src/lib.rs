pub mod core;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use crate::core::physics::{BodyId, BodyShape, ColliderMaterial, PhysicsWorld};
pub use crate::core::sim::{Simulation, BALL_GUN_RADIUS, BALL_RADIUS, TIME_STEP};
pub use crate::core::time::TickClock;
pub use crate::renderer::commands::{DrawCommand, DrawList};
pub use crate::renderer::shapes::{Circle, Polygon4};
pub use crate::renderer::traits::DrawSink;
