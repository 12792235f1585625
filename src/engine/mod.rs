// Engine modules: renderer, scene, input, audio and loop timing

pub mod audio;
pub mod game_loop;
pub mod input;
pub mod renderer;
pub mod scene;
