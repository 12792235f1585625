// Software 3D scene: objects made of wires, projected through a camera

pub mod camera;
pub mod graphics;
pub mod layers;
pub mod object3d;
pub mod wire;

pub use camera::Camera;
pub use graphics::Graphics;
pub use layers::RenderQueue;
pub use object3d::{Layer, Object3d};
pub use wire::WireStyle;
