pub mod commands;
pub mod shapes;
pub mod traits;

// Re-export key types for convenient access
pub use commands::{DrawCommand, DrawList};
pub use shapes::{Circle, Polygon4};
pub use traits::DrawSink;
