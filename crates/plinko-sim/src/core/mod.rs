pub mod physics;
pub mod sim;
pub mod time;
