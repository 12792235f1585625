// Shared leaf helpers used by the engine and the game

pub mod color;
pub mod math;
