// Game modules: the world, the gliders flying it, and the camera watching them

pub mod camera_man;
pub mod circuit;
pub mod clock;
pub mod cloud;
pub mod controls;
pub mod flying_dot;
pub mod glider;
pub mod glider_shape;
pub mod hill;
pub mod instruments;
pub mod jet_trail;
pub mod landscape;
pub mod movement;
pub mod sky;
pub mod tail;
pub mod thermal;
pub mod xc_game;

pub use xc_game::XcGame;
