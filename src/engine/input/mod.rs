// Input handling
//
// Keyboard events are mapped to game actions through a binding table
// and queued for the game to consume once per frame.
// Mouse drags are tracked separately for orbiting the camera.
//
// ## Architecture
//
// - `action`: Game actions and default key bindings
// - `config`: Key to action bindings
// - `manager`: Turns winit key events into queued action events
// - `mouse`: Drag tracking
//
// ## Usage Example
//
// ```rust
// use engine::input::{InputManager, Action};
//
// let mut input = InputManager::new();
//
// // In the event loop
// input.process_keyboard_event(&key_event);
//
// // Once per frame
// for event in input.drain() {
//     game.handle_action(event.action, event.pressed);
// }
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod mouse;

pub use action::Action;
pub use manager::InputManager;
pub use mouse::MouseTracker;
